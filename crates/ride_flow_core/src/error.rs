//! Error types for the ride-request flow.
//!
//! None of these are fatal: the controller logs them, bumps a telemetry
//! counter and stays in its current phase.

use thiserror::Error;

/// Failure reported by a [`crate::routing::GeoRouteProvider`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteFetchError {
    /// The provider found no route between the endpoints.
    #[error("no route between endpoints")]
    NoRoute,

    /// An endpoint could not be mapped onto the routing graph.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// The provider failed for another reason.
    #[error("route provider error: {0}")]
    Provider(String),

    /// HTTP transport failure (OSRM backend).
    #[error("route request failed: {0}")]
    Http(String),
}

/// Conditions surfaced by the flow.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowError {
    /// No device fix yet; quote and route fetch are deferred.
    #[error("user location is not available yet")]
    LocationUnavailable,

    /// A picked suggestion did not resolve to a coordinate.
    #[error("could not resolve '{title}': {reason}")]
    PlaceResolutionFailed { title: String, reason: String },

    /// Route provider failed for the current destination.
    #[error(transparent)]
    RouteFetchFailed(#[from] RouteFetchError),
}

/// Errors while loading or validating [`crate::config::FlowConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
