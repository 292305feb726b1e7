use serde::{Deserialize, Serialize};

use crate::models::restaurant::{Location, Restaurant};

/// Map center used when neither a device location nor a result with valid
/// coordinates is available: Paris. The only hardcoded geographic default.
pub const DEFAULT_CENTER: Location = Location::new(48.8566, 2.3522);

/// Radius choices offered by the search form, in kilometers.
pub const RADIUS_CHOICES_KM: [f64; 4] = [0.5, 1.0, 2.0, 5.0];

pub const DEFAULT_RADIUS_KM: f64 = 1.0;

/// Address label standing in for device coordinates. Downstream consumers
/// see this instead of a free-text address when no geocoding happened.
pub const CURRENT_LOCATION_LABEL: &str = "Ma position actuelle";

pub const SEARCH_FAILED_MESSAGE: &str =
    "Impossible de récupérer les restaurants. Veuillez réessayer.";
pub const GEOLOCATION_FAILED_MESSAGE: &str =
    "Impossible de vous géolocaliser. Vérifiez vos permissions.";
pub const FAVORITE_ADDED_MESSAGE: &str = "Ajouté aux favoris";
pub const FAVORITE_REMOVED_MESSAGE: &str = "Retiré des favoris";

/// Top-level search state driven by the search controller.
///
/// `loading` and `error` are never both meaningfully active: starting a new
/// search clears the previous error before setting `loading`.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SearchState {
    pub address: String,
    pub radius_km: f64,
    pub loading: bool,
    pub error: Option<String>,
    pub results: Vec<Restaurant>,
    pub center: Location,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            address: String::new(),
            radius_km: DEFAULT_RADIUS_KM,
            loading: false,
            error: None,
            results: Vec::new(),
            center: DEFAULT_CENTER,
        }
    }
}

/// Active top-level display state: search results or the favorites list.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ViewMode {
    #[default]
    Search,
    Favorites,
}
