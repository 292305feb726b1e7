use std::time::Duration;

use async_trait::async_trait;

use crate::error::GeolocationError;
use crate::models::restaurant::Location;

/// Bounded wait applied to every location request.
pub const LOCATION_WAIT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug)]
pub struct LocationRequest {
    pub high_accuracy: bool,
    pub timeout: Duration,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: LOCATION_WAIT,
        }
    }
}

/// Port over the platform's device-location capability.
///
/// The search controller additionally fences the call with
/// `request.timeout`, so a provider that never resolves still ends in
/// [`GeolocationError::Timeout`].
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_location(
        &self,
        request: &LocationRequest,
    ) -> Result<Location, GeolocationError>;
}

/// Provider for hosts without any location capability.
pub struct UnsupportedGeolocation;

#[async_trait]
impl GeolocationProvider for UnsupportedGeolocation {
    async fn current_location(
        &self,
        _request: &LocationRequest,
    ) -> Result<Location, GeolocationError> {
        Err(GeolocationError::Denied)
    }
}
