//! Pluggable route providers: trait abstraction for routing backends.
//!
//! Implementations, selectable via [`RouteProviderKind`]:
//!
//! - **`StraightLineRouteProvider`**: two-point geometry, duration from an average speed.
//! - **`H3GridRouteProvider`**: walks the H3 grid between the endpoint cells.
//! - **`OsrmRouteProvider`** (feature `osrm`): calls a local/remote OSRM HTTP endpoint.
//!
//! Providers are synchronous; the flow treats each call as an asynchronous
//! request by routing it through the outbox (see [`crate::driver::FlowDriver`]).

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::RouteFetchError;
use crate::geo::{grid_path_cells, path_length_m, Coordinate, GeoBounds, ROUTE_RESOLUTION};

/// Default average city speed used to estimate travel time.
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 40.0;

/// Route between the user and the destination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Ordered lat/lng points along the route.
    pub geometry: Vec<Coordinate>,
    /// Expected travel time in seconds (non-negative).
    pub expected_travel_secs: f64,
}

impl RouteResult {
    /// Length of the routed path in metres.
    pub fn path_length_m(&self) -> f64 {
        path_length_m(&self.geometry)
    }

    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_points(&self.geometry)
    }

    /// True when the geometry has enough points to measure a path.
    pub fn has_path(&self) -> bool {
        self.geometry.len() >= 2
    }
}

/// Which routing backend to use.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteProviderKind {
    /// Straight line between the endpoints.
    #[default]
    StraightLine,
    /// Path along the H3 grid.
    H3Grid,
    /// OSRM HTTP endpoint (e.g. `"http://localhost:5000"`).
    #[cfg(feature = "osrm")]
    Osrm { endpoint: String },
}

/// Trait for routing backends.
pub trait GeoRouteProvider: Send + Sync {
    /// Compute a route between two coordinates.
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteResult, RouteFetchError>;
}

fn travel_secs(distance_m: f64, average_speed_kmh: f64) -> f64 {
    if distance_m > 0.0 && average_speed_kmh > 0.0 {
        (distance_m / 1000.0 / average_speed_kmh) * 3600.0
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Straight line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct StraightLineRouteProvider {
    pub average_speed_kmh: f64,
}

impl Default for StraightLineRouteProvider {
    fn default() -> Self {
        Self {
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
        }
    }
}

impl GeoRouteProvider for StraightLineRouteProvider {
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteResult, RouteFetchError> {
        let distance_m = from.distance_m(&to);
        Ok(RouteResult {
            geometry: vec![from, to],
            expected_travel_secs: travel_secs(distance_m, self.average_speed_kmh),
        })
    }
}

// ---------------------------------------------------------------------------
// H3 grid
// ---------------------------------------------------------------------------

/// Routes along the H3 hexagonal grid. Geometry is the exact start point, the
/// centres of the intermediate cells and the exact end point.
#[derive(Debug, Clone, Copy)]
pub struct H3GridRouteProvider {
    pub average_speed_kmh: f64,
}

impl Default for H3GridRouteProvider {
    fn default() -> Self {
        Self {
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
        }
    }
}

impl GeoRouteProvider for H3GridRouteProvider {
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteResult, RouteFetchError> {
        let from_cell = from
            .to_cell(ROUTE_RESOLUTION)
            .ok_or_else(|| RouteFetchError::InvalidCoordinate(from.to_string()))?;
        let to_cell = to
            .to_cell(ROUTE_RESOLUTION)
            .ok_or_else(|| RouteFetchError::InvalidCoordinate(to.to_string()))?;
        let cells = grid_path_cells(from_cell, to_cell).ok_or(RouteFetchError::NoRoute)?;

        let mut geometry = Vec::with_capacity(cells.len() + 2);
        geometry.push(from);
        if cells.len() > 2 {
            geometry.extend(cells[1..cells.len() - 1].iter().map(|c| Coordinate::from(*c)));
        }
        geometry.push(to);

        let distance_m = path_length_m(&geometry);
        Ok(RouteResult {
            geometry,
            expected_travel_secs: travel_secs(distance_m, self.average_speed_kmh),
        })
    }
}

// ---------------------------------------------------------------------------
// OSRM provider (behind `osrm` feature)
// ---------------------------------------------------------------------------

#[cfg(feature = "osrm")]
pub mod osrm {
    use super::*;
    use reqwest::blocking::Client;
    use std::time::Duration;

    /// Routes via an OSRM HTTP endpoint.
    pub struct OsrmRouteProvider {
        client: Client,
        endpoint: String,
    }

    impl OsrmRouteProvider {
        pub fn new(endpoint: &str) -> Result<Self, RouteFetchError> {
            let client = Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .map_err(|e| RouteFetchError::Http(e.to_string()))?;
            Ok(Self {
                client,
                endpoint: endpoint.trim_end_matches('/').to_string(),
            })
        }
    }

    /// Minimal OSRM JSON response structures.
    #[derive(Deserialize)]
    struct OsrmResponse {
        code: String,
        routes: Option<Vec<OsrmRoute>>,
    }

    #[derive(Deserialize)]
    struct OsrmRoute {
        duration: f64, // seconds
        geometry: OsrmGeometry,
    }

    #[derive(Deserialize)]
    struct OsrmGeometry {
        coordinates: Vec<Vec<f64>>, // [lng, lat]
    }

    impl GeoRouteProvider for OsrmRouteProvider {
        fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteResult, RouteFetchError> {
            let url = format!(
                "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
                self.endpoint, from.longitude, from.latitude, to.longitude, to.latitude,
            );

            let resp: OsrmResponse = self
                .client
                .get(&url)
                .send()
                .and_then(|r| r.json())
                .map_err(|e| RouteFetchError::Http(e.to_string()))?;

            if resp.code != "Ok" {
                return Err(RouteFetchError::Provider(resp.code));
            }

            let route = resp
                .routes
                .and_then(|routes| routes.into_iter().next())
                .ok_or(RouteFetchError::NoRoute)?;

            // OSRM returns [lng, lat]
            let geometry: Vec<Coordinate> = route
                .geometry
                .coordinates
                .iter()
                .filter_map(|c| match c.as_slice() {
                    [lng, lat, ..] => Coordinate::new(*lat, *lng),
                    _ => None,
                })
                .collect();

            Ok(RouteResult {
                geometry,
                expected_travel_secs: route.duration.max(0.0),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Caching wrapper
// ---------------------------------------------------------------------------

/// Coordinates are keyed at ~1e-6 degree precision (about 10 cm).
fn cache_key(from: Coordinate, to: Coordinate) -> (i64, i64, i64, i64) {
    let q = |v: f64| (v * 1e6).round() as i64;
    (
        q(from.latitude),
        q(from.longitude),
        q(to.latitude),
        q(to.longitude),
    )
}

/// LRU-cached wrapper around any [`GeoRouteProvider`].
///
/// On inner failure the straight-line provider is tried when
/// `fallback_to_straight_line` is set. Failures are never cached.
pub struct CachedRouteProvider {
    inner: Box<dyn GeoRouteProvider>,
    cache: Mutex<LruCache<(i64, i64, i64, i64), RouteResult>>,
    fallback: Option<StraightLineRouteProvider>,
}

impl CachedRouteProvider {
    pub fn new(
        inner: Box<dyn GeoRouteProvider>,
        capacity: usize,
        fallback_to_straight_line: Option<StraightLineRouteProvider>,
    ) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            fallback: fallback_to_straight_line,
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl GeoRouteProvider for CachedRouteProvider {
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteResult, RouteFetchError> {
        let key = cache_key(from, to);

        if let Ok(mut cache) = self.cache.lock() {
            if let Some(cached) = cache.get(&key) {
                debug!(%from, %to, "route cache hit");
                return Ok(cached.clone());
            }
        }

        let result = match self.inner.route(from, to) {
            Ok(route) => Ok(route),
            Err(err) => match &self.fallback {
                Some(fallback) => {
                    warn!(error = %err, "route provider failed; using straight-line fallback");
                    fallback.route(from, to)
                }
                None => Err(err),
            },
        };

        if let Ok(route) = &result {
            if let Ok(mut cache) = self.cache.lock() {
                cache.put(key, route.clone());
            }
        }

        result
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Construct a boxed [`GeoRouteProvider`] from a [`RouteProviderKind`].
///
/// - `StraightLine` is returned without caching.
/// - `H3Grid` and `Osrm` are wrapped in a [`CachedRouteProvider`].
pub fn build_route_provider(
    kind: &RouteProviderKind,
    average_speed_kmh: f64,
    cache_capacity: usize,
    fallback_to_straight_line: bool,
) -> Result<Box<dyn GeoRouteProvider>, RouteFetchError> {
    let straight = StraightLineRouteProvider { average_speed_kmh };
    let fallback = fallback_to_straight_line.then_some(straight);
    match kind {
        RouteProviderKind::StraightLine => Ok(Box::new(straight)),
        RouteProviderKind::H3Grid => Ok(Box::new(CachedRouteProvider::new(
            Box::new(H3GridRouteProvider { average_speed_kmh }),
            cache_capacity,
            fallback,
        ))),
        #[cfg(feature = "osrm")]
        RouteProviderKind::Osrm { endpoint } => Ok(Box::new(CachedRouteProvider::new(
            Box::new(osrm::OsrmRouteProvider::new(endpoint)?),
            cache_capacity,
            fallback,
        ))),
    }
}
