use dotenv::dotenv;

pub mod config;
pub mod controller;
pub mod error;
pub mod helpers;
pub mod models;
pub mod repositories;
pub mod services;

pub use config::Config;
pub use controller::{App, Notification};
pub use error::{DiscoveryError, GeolocationError};
pub use helpers::distance::{distance_display, format_distance, haversine_km};
pub use models::restaurant::{Location, Restaurant, Review};
pub use models::search::{SearchState, ViewMode};
pub use repositories::kv_repo::{FileKvRepo, InMemoryKvRepo, KeyValueRepo};
pub use services::gemini_search::{
    CapabilityTag, GeminiSearchService, GenerationOptions, RestaurantSearchService, SearchQuery,
};
pub use services::geolocation::{GeolocationProvider, LocationRequest, UnsupportedGeolocation};
pub use services::response_parser::{parse_search_response, SearchOutcome};

/// One-time process setup for embedding hosts: environment from `.env`,
/// tracing to stdout.
pub fn init() {
    dotenv().ok();
    tracing_subscriber::fmt::init();
}
