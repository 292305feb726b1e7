use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::models::restaurant::{Location, Restaurant};
use crate::models::search::{
    SearchState, ViewMode, DEFAULT_RADIUS_KM, CURRENT_LOCATION_LABEL, FAVORITE_ADDED_MESSAGE,
    FAVORITE_REMOVED_MESSAGE,
};
use crate::repositories::kv_repo::KeyValueRepo;
use crate::services::gemini_search::RestaurantSearchService;
use crate::services::geolocation::GeolocationProvider;

pub mod favorites_controller;
pub mod filter_controller;
pub mod search_controller;

use favorites_controller::{FavoriteChange, FavoritesController};
use filter_controller::FilterState;
use search_controller::SearchController;

/// Toast-style message for the embedding UI to display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
}

/// Top-level controller the presentational layer talks to.
///
/// Owns search state, favorites and the filter selections; everything the
/// UI renders is read from here, everything it does funnels through the
/// methods below. Single-threaded by construction: mutations happen
/// between awaits, never in parallel.
pub struct App {
    search: SearchController,
    filters: FilterState,
    favorites: FavoritesController,
    view_mode: ViewMode,
    selected_id: Option<String>,
    notifications: Sender<Notification>,
    notification_feed: Receiver<Notification>,
}

impl App {
    pub fn new(
        search_service: Arc<dyn RestaurantSearchService>,
        geolocation: Arc<dyn GeolocationProvider>,
        favorites_repo: Arc<dyn KeyValueRepo>,
    ) -> Self {
        let (notifications, notification_feed) = unbounded();
        Self {
            search: SearchController::new(search_service, geolocation),
            filters: FilterState::default(),
            favorites: FavoritesController::load(favorites_repo),
            view_mode: ViewMode::default(),
            selected_id: None,
            notifications,
            notification_feed,
        }
    }

    /// Feed of toast notifications. The UI drains it with `try_recv`.
    pub fn notifications(&self) -> Receiver<Notification> {
        self.notification_feed.clone()
    }

    pub fn search_state(&self) -> &SearchState {
        self.search.state()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn select(&mut self, id: Option<String>) {
        self.selected_id = id;
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn toggle_category(&mut self, category: &str) {
        self.filters.toggle_category(category);
    }

    pub fn toggle_price(&mut self, price: &str) {
        self.filters.toggle_price(price);
    }

    pub fn favorites(&self) -> &[Restaurant] {
        self.favorites.list()
    }

    pub fn favorites_count(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn toggle_favorite(&mut self, restaurant: &Restaurant) {
        let message = match self.favorites.toggle(restaurant) {
            FavoriteChange::Added => FAVORITE_ADDED_MESSAGE,
            FavoriteChange::Removed => FAVORITE_REMOVED_MESSAGE,
        };
        let _ = self.notifications.send(Notification {
            message: message.to_string(),
        });
    }

    /// Issues a new search. Filters, selection and view mode reset before
    /// the request goes out, then the orchestrator drives the state
    /// machine to Success or Failed.
    pub async fn search(
        &mut self,
        address: &str,
        radius_km: f64,
        location_override: Option<Location>,
    ) {
        self.reset_for_new_search();
        self.search.search(address, radius_km, location_override).await;
    }

    /// Best-available device location, then an automatic search around it
    /// with the default radius and the "current location" sentinel label.
    /// Geolocation failures were already written into the state when user
    /// initiated; otherwise they are dropped here on purpose.
    pub async fn locate_me(&mut self, user_initiated: bool) {
        if let Ok(location) = self.search.resolve_location(user_initiated).await {
            self.search(CURRENT_LOCATION_LABEL, DEFAULT_RADIUS_KM, Some(location))
                .await;
        }
    }

    /// The list the active view is based on, before filtering.
    pub fn active_list(&self) -> &[Restaurant] {
        match self.view_mode {
            ViewMode::Search => &self.search.state().results,
            ViewMode::Favorites => self.favorites.list(),
        }
    }

    /// Distinct cuisine categories of the active list, sorted.
    pub fn categories(&self) -> Vec<String> {
        filter_controller::categories(self.active_list())
    }

    /// The active list narrowed by the current filter selections.
    pub fn visible_restaurants(&self) -> Vec<&Restaurant> {
        self.filters.apply(self.active_list())
    }

    /// Where the map should look: the search center, except in the
    /// favorites view where the first visible favorite wins when there is
    /// one.
    pub fn map_center(&self) -> Location {
        match self.view_mode {
            ViewMode::Search => self.search.state().center,
            ViewMode::Favorites => self
                .visible_restaurants()
                .first()
                .map(|restaurant| restaurant.location())
                .unwrap_or(self.search.state().center),
        }
    }

    fn reset_for_new_search(&mut self) {
        self.filters.clear();
        self.selected_id = None;
        self.view_mode = ViewMode::Search;
    }
}
