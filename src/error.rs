use thiserror::Error;

/// Everything that can go wrong in the discovery pipeline. No variant is
/// fatal: each one degrades to an error banner or a silent no-op.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The search call itself failed (network, auth, quota).
    #[error("search service unavailable")]
    ServiceUnavailable(#[from] reqwest::Error),

    /// The call succeeded but the output held no parseable JSON payload.
    #[error("search response could not be parsed")]
    MalformedResponse,

    #[error("location permission denied or unavailable")]
    NoLocationPermission,

    #[error("location request timed out")]
    LocationTimeout,

    /// The persisted favorites blob was unreadable at startup.
    #[error("persisted favorites could not be read")]
    PersistenceCorrupt,
}

/// Typed failure of the geolocation capability. Denied also covers hosts
/// where no location capability exists at all.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("geolocation permission denied or unsupported")]
    Denied,
    #[error("geolocation request timed out")]
    Timeout,
}

impl From<GeolocationError> for DiscoveryError {
    fn from(error: GeolocationError) -> Self {
        match error {
            GeolocationError::Denied => DiscoveryError::NoLocationPermission,
            GeolocationError::Timeout => DiscoveryError::LocationTimeout,
        }
    }
}
