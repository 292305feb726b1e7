use std::sync::Arc;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{DiscoveryError, GeolocationError};
use crate::models::restaurant::Location;
use crate::models::search::{
    SearchState, CURRENT_LOCATION_LABEL, GEOLOCATION_FAILED_MESSAGE, SEARCH_FAILED_MESSAGE,
};
use crate::services::gemini_search::{RestaurantSearchService, SearchQuery};
use crate::services::geolocation::{GeolocationProvider, LocationRequest};
use crate::services::response_parser::SearchOutcome;

/// Owns the search state machine: Idle, then Searching, then Success or
/// Failed, and around again on the next request.
///
/// Every request gets a ticket from a monotonically increasing sequence.
/// A completion is applied only while its ticket is still the latest
/// issued, so a slow stale response can never overwrite a newer search.
pub struct SearchController {
    state: SearchState,
    issued: u64,
    search_service: Arc<dyn RestaurantSearchService>,
    geolocation: Arc<dyn GeolocationProvider>,
}

impl SearchController {
    pub fn new(
        search_service: Arc<dyn RestaurantSearchService>,
        geolocation: Arc<dyn GeolocationProvider>,
    ) -> Self {
        Self {
            state: SearchState::default(),
            issued: 0,
            search_service,
            geolocation,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Transition to Searching. Clears the previous error before setting
    /// `loading`, records the request parameters, returns the ticket the
    /// matching [`complete`](Self::complete) call must present.
    pub fn begin(&mut self, address: &str, radius_km: f64) -> u64 {
        self.issued += 1;
        self.state.error = None;
        self.state.loading = true;
        self.state.address = address.to_string();
        self.state.radius_km = radius_km;
        self.issued
    }

    /// Applies a finished search. Returns false when the ticket was
    /// superseded by a newer request, in which case the state is untouched.
    pub fn complete(
        &mut self,
        ticket: u64,
        outcome: Result<SearchOutcome, DiscoveryError>,
    ) -> bool {
        if ticket != self.issued {
            debug!(
                "Discarding stale search completion, ticket {} superseded by {}",
                ticket, self.issued
            );
            return false;
        }

        self.state.loading = false;
        match outcome {
            Ok(outcome) => {
                self.state.results = outcome.restaurants;
                self.state.center = outcome.center;
            }
            Err(e) => {
                // Service and parse failures collapse into one message;
                // the distinction only reaches the log.
                warn!("Search failed due to: {}", e);
                self.state.error = Some(SEARCH_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// Begin, call the service, complete. The single entry point for a
    /// host that does not manage tickets itself.
    pub async fn search(
        &mut self,
        address: &str,
        radius_km: f64,
        location_override: Option<Location>,
    ) {
        let ticket = self.begin(address, radius_km);
        let query = SearchQuery {
            address: address.to_string(),
            radius_km,
            location: location_override,
        };
        let outcome = self.search_service.search_restaurants(&query).await;
        self.complete(ticket, outcome);
    }

    /// Resolves the device location within the bounded wait. On success the
    /// state immediately reflects the sentinel address and new center.
    ///
    /// Failures end up in the state only when `user_initiated`; the caller
    /// receives the typed error either way and decides whether to drop it.
    pub async fn resolve_location(
        &mut self,
        user_initiated: bool,
    ) -> Result<Location, GeolocationError> {
        if user_initiated {
            self.state.error = None;
            self.state.loading = true;
        }

        let request = LocationRequest::default();
        let resolved = match timeout(request.timeout, self.geolocation.current_location(&request))
            .await
        {
            Ok(resolved) => resolved,
            Err(_) => Err(GeolocationError::Timeout),
        };

        match resolved {
            Ok(location) => {
                self.state.address = CURRENT_LOCATION_LABEL.to_string();
                self.state.center = location;
                Ok(location)
            }
            Err(e) => {
                self.state.loading = false;
                if user_initiated {
                    self.state.error = Some(GEOLOCATION_FAILED_MESSAGE.to_string());
                } else {
                    debug!("Silent geolocation attempt failed due to: {}", e);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::models::restaurant::Restaurant;
    use crate::models::search::DEFAULT_CENTER;
    use crate::services::geolocation::UnsupportedGeolocation;

    fn restaurant(id: &str) -> Restaurant {
        Restaurant {
            id: id.to_string(),
            name: format!("Resto {id}"),
            rating: 4.0,
            review_count: None,
            cuisine: "Italien".to_string(),
            price_level: "€€".to_string(),
            address: String::new(),
            description: String::new(),
            lat: 48.85,
            lng: 2.35,
            reviews: Vec::new(),
        }
    }

    struct FixedSearch {
        restaurants: Vec<Restaurant>,
        center: Location,
        queries: Mutex<Vec<SearchQuery>>,
    }

    impl FixedSearch {
        fn returning(restaurants: Vec<Restaurant>, center: Location) -> Self {
            Self {
                restaurants,
                center,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RestaurantSearchService for FixedSearch {
        async fn search_restaurants(
            &self,
            query: &SearchQuery,
        ) -> Result<SearchOutcome, DiscoveryError> {
            self.queries.lock().unwrap().push(query.clone());
            Ok(SearchOutcome {
                restaurants: self.restaurants.clone(),
                center: self.center,
            })
        }
    }

    struct FailingSearch;

    #[async_trait]
    impl RestaurantSearchService for FailingSearch {
        async fn search_restaurants(
            &self,
            _query: &SearchQuery,
        ) -> Result<SearchOutcome, DiscoveryError> {
            Err(DiscoveryError::MalformedResponse)
        }
    }

    struct FixedGeolocation(Location);

    #[async_trait]
    impl GeolocationProvider for FixedGeolocation {
        async fn current_location(
            &self,
            _request: &LocationRequest,
        ) -> Result<Location, GeolocationError> {
            Ok(self.0)
        }
    }

    struct TimedOutGeolocation;

    #[async_trait]
    impl GeolocationProvider for TimedOutGeolocation {
        async fn current_location(
            &self,
            _request: &LocationRequest,
        ) -> Result<Location, GeolocationError> {
            Err(GeolocationError::Timeout)
        }
    }

    fn controller(service: Arc<dyn RestaurantSearchService>) -> SearchController {
        SearchController::new(service, Arc::new(UnsupportedGeolocation))
    }

    #[tokio::test]
    async fn successful_search_stores_results_and_center() {
        let center = Location::new(48.85, 2.35);
        let service = Arc::new(FixedSearch::returning(vec![restaurant("1")], center));
        let mut search = controller(service);

        search.search("Tour Eiffel, Paris", 2.0, None).await;

        let state = search.state();
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.center, center);
        assert_eq!(state.address, "Tour Eiffel, Paris");
        assert_eq!(state.radius_km, 2.0);
    }

    #[tokio::test]
    async fn failed_search_keeps_previous_results_and_sets_the_generic_message() {
        let center = Location::new(48.85, 2.35);
        let service = Arc::new(FixedSearch::returning(vec![restaurant("1")], center));
        let mut search = controller(service);
        search.search("Paris", 1.0, None).await;

        search.search_service = Arc::new(FailingSearch);
        search.search("Lyon", 1.0, None).await;

        let state = search.state();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some(SEARCH_FAILED_MESSAGE));
        assert_eq!(state.results.len(), 1, "prior results stay untouched");
    }

    #[tokio::test]
    async fn begin_clears_the_previous_error_before_loading() {
        let mut search = controller(Arc::new(FailingSearch));
        search.search("Paris", 1.0, None).await;
        assert!(search.state().error.is_some());

        search.begin("Paris", 1.0);
        assert!(search.state().loading);
        assert_eq!(search.state().error, None);
    }

    #[tokio::test]
    async fn stale_completion_is_discarded() {
        let center = Location::new(48.85, 2.35);
        let mut search = controller(Arc::new(FixedSearch::returning(Vec::new(), center)));

        let stale = search.begin("Paris", 1.0);
        let fresh = search.begin("Lyon", 2.0);

        let applied = search.complete(
            stale,
            Ok(SearchOutcome {
                restaurants: vec![restaurant("stale")],
                center,
            }),
        );
        assert!(!applied);
        assert!(search.state().loading, "stale completion must not end loading");
        assert!(search.state().results.is_empty());

        let applied = search.complete(
            fresh,
            Ok(SearchOutcome {
                restaurants: vec![restaurant("fresh")],
                center,
            }),
        );
        assert!(applied);
        assert_eq!(search.state().results[0].id, "fresh");
    }

    #[tokio::test]
    async fn search_forwards_the_location_override_to_the_service() {
        let service = Arc::new(FixedSearch::returning(Vec::new(), DEFAULT_CENTER));
        let mut search =
            SearchController::new(service.clone(), Arc::new(UnsupportedGeolocation));

        let spot = Location::new(1.0, 2.0);
        search.search(CURRENT_LOCATION_LABEL, 1.0, Some(spot)).await;

        let queries = service.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].location, Some(spot));
        assert_eq!(queries[0].address, CURRENT_LOCATION_LABEL);
    }

    #[tokio::test]
    async fn resolve_location_sets_sentinel_address_and_center() {
        let spot = Location::new(43.29, 5.37);
        let mut search = SearchController::new(
            Arc::new(FixedSearch::returning(Vec::new(), DEFAULT_CENTER)),
            Arc::new(FixedGeolocation(spot)),
        );

        let resolved = search.resolve_location(true).await;
        assert_eq!(resolved, Ok(spot));
        assert_eq!(search.state().address, CURRENT_LOCATION_LABEL);
        assert_eq!(search.state().center, spot);
    }

    #[tokio::test]
    async fn user_initiated_denial_surfaces_the_message() {
        let mut search = SearchController::new(
            Arc::new(FixedSearch::returning(Vec::new(), DEFAULT_CENTER)),
            Arc::new(UnsupportedGeolocation),
        );

        let resolved = search.resolve_location(true).await;
        assert_eq!(resolved, Err(GeolocationError::Denied));
        assert!(!search.state().loading);
        assert_eq!(
            search.state().error.as_deref(),
            Some(GEOLOCATION_FAILED_MESSAGE)
        );
    }

    #[tokio::test]
    async fn silent_failure_leaves_no_trace_in_the_state() {
        let mut search = SearchController::new(
            Arc::new(FixedSearch::returning(Vec::new(), DEFAULT_CENTER)),
            Arc::new(TimedOutGeolocation),
        );

        let resolved = search.resolve_location(false).await;
        assert_eq!(resolved, Err(GeolocationError::Timeout));
        assert!(!search.state().loading);
        assert_eq!(search.state().error, None);
    }
}
