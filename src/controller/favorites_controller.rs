use std::sync::Arc;

use tracing::warn;

use crate::error::DiscoveryError;
use crate::models::restaurant::Restaurant;
use crate::repositories::kv_repo::KeyValueRepo;

/// Storage key of the serialized favorites collection.
pub const FAVORITES_STORAGE_KEY: &str = "resto_finder_favorites";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FavoriteChange {
    Added,
    Removed,
}

/// The saved-restaurants set, keyed by id, in insertion order. Every
/// mutation re-persists the whole collection through the injected store.
pub struct FavoritesController {
    repo: Arc<dyn KeyValueRepo>,
    favorites: Vec<Restaurant>,
}

impl FavoritesController {
    /// Loads the persisted collection. A corrupt blob resets to an empty
    /// set; the error stops here and is never surfaced.
    pub fn load(repo: Arc<dyn KeyValueRepo>) -> Self {
        let favorites = match Self::read_persisted(repo.as_ref()) {
            Ok(favorites) => favorites,
            Err(e) => {
                warn!("Failed to load persisted favorites due to: {}", e);
                Vec::new()
            }
        };
        Self { repo, favorites }
    }

    fn read_persisted(repo: &dyn KeyValueRepo) -> Result<Vec<Restaurant>, DiscoveryError> {
        let Some(blob) = repo.get(FAVORITES_STORAGE_KEY) else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&blob).map_err(|_| DiscoveryError::PersistenceCorrupt)
    }

    pub fn list(&self) -> &[Restaurant] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.favorites.iter().any(|restaurant| restaurant.id == id)
    }

    /// Removes the restaurant when its id is already saved, appends it
    /// otherwise. Lookup is by id, never by list position, so toggling
    /// from a filtered view stays consistent.
    pub fn toggle(&mut self, restaurant: &Restaurant) -> FavoriteChange {
        let change = match self
            .favorites
            .iter()
            .position(|saved| saved.id == restaurant.id)
        {
            Some(index) => {
                self.favorites.remove(index);
                FavoriteChange::Removed
            }
            None => {
                self.favorites.push(restaurant.clone());
                FavoriteChange::Added
            }
        };
        self.persist();
        change
    }

    /// Full re-persist of the collection, best-effort: a failing write is
    /// logged and dropped, the in-memory set stays authoritative.
    fn persist(&self) {
        let blob = match serde_json::to_string(&self.favorites) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("Failed to serialize favorites due to: {}", e);
                return;
            }
        };
        if let Err(e) = self.repo.set(FAVORITES_STORAGE_KEY, &blob) {
            warn!("Failed to persist favorites due to: {}", e);
        }
    }
}
