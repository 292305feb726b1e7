use std::collections::BTreeSet;

use crate::models::restaurant::Restaurant;

/// Ephemeral filter selections. Reset whenever a new search is issued.
///
/// Category is single-select with deselect-on-reselect; prices are a
/// multi-select set. Both only narrow the active list, they never mutate
/// the underlying results or favorites.
#[derive(Clone, Debug, Default)]
pub struct FilterState {
    selected_category: Option<String>,
    selected_prices: BTreeSet<String>,
}

impl FilterState {
    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn selected_prices(&self) -> &BTreeSet<String> {
        &self.selected_prices
    }

    /// Selecting the current category again clears it.
    pub fn toggle_category(&mut self, category: &str) {
        if self.selected_category.as_deref() == Some(category) {
            self.selected_category = None;
        } else {
            self.selected_category = Some(category.to_string());
        }
    }

    pub fn toggle_price(&mut self, price: &str) {
        if !self.selected_prices.remove(price) {
            self.selected_prices.insert(price.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.selected_category = None;
        self.selected_prices.clear();
    }

    /// Narrows `list` by the active selections. A restaurant without a
    /// price level is excluded only while a price filter is active.
    pub fn apply<'a>(&self, list: &'a [Restaurant]) -> Vec<&'a Restaurant> {
        list.iter()
            .filter(|restaurant| {
                self.selected_category
                    .as_deref()
                    .map_or(true, |category| restaurant.cuisine == category)
            })
            .filter(|restaurant| {
                self.selected_prices.is_empty()
                    || (!restaurant.price_level.is_empty()
                        && self.selected_prices.contains(&restaurant.price_level))
            })
            .collect()
    }
}

/// Distinct cuisines of the active list, lexicographically sorted.
pub fn categories(list: &[Restaurant]) -> Vec<String> {
    let distinct: BTreeSet<&str> = list
        .iter()
        .map(|restaurant| restaurant.cuisine.as_str())
        .collect();
    distinct.into_iter().map(String::from).collect()
}
