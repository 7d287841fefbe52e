//! Geographic primitives: coordinates, bounds and great-circle distance.
//!
//! This module provides:
//!
//! - **Coordinate**: validated lat/lng value type (degrees)
//! - **Distance calculations**: Haversine distance and polyline length
//! - **GeoBounds**: bounding box of a route geometry, used to fit the viewport
//! - **H3 helpers**: snapping coordinates to cells and walking grid paths
//!
//! Default H3 resolution is 9 (~240m cell size), fine enough for city trips.

use h3o::{CellIndex, LatLng, Resolution};
use serde::{Deserialize, Serialize};

/// Mean earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Resolution used when snapping coordinates onto the H3 grid.
pub const ROUTE_RESOLUTION: Resolution = Resolution::Nine;

/// A point on the globe in degrees. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        LatLng::new(latitude, longitude).ok()?;
        Some(Self {
            latitude,
            longitude,
        })
    }

    /// Great-circle distance to `other` in metres.
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        haversine_km(*self, *other) * 1000.0
    }

    /// H3 cell containing this coordinate at `resolution`.
    pub fn to_cell(&self, resolution: Resolution) -> Option<CellIndex> {
        LatLng::new(self.latitude, self.longitude)
            .ok()
            .map(|ll| ll.to_cell(resolution))
    }
}

impl From<CellIndex> for Coordinate {
    fn from(cell: CellIndex) -> Self {
        let ll: LatLng = cell.into();
        Self {
            latitude: ll.lat(),
            longitude: ll.lng(),
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lon2) = (b.latitude.to_radians(), b.longitude.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Sum of segment lengths along `points`, in metres.
pub fn path_length_m(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].distance_m(&pair[1]))
        .sum()
}

/// Lat/lng bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min: Coordinate,
    pub max: Coordinate,
}

impl GeoBounds {
    /// Smallest box containing every point. `None` for an empty slice.
    pub fn from_points(points: &[Coordinate]) -> Option<Self> {
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;
        for point in &points[1..] {
            min.latitude = min.latitude.min(point.latitude);
            min.longitude = min.longitude.min(point.longitude);
            max.latitude = max.latitude.max(point.latitude);
            max.longitude = max.longitude.max(point.longitude);
        }
        Some(Self { min, max })
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            latitude: (self.min.latitude + self.max.latitude) * 0.5,
            longitude: (self.min.longitude + self.max.longitude) * 0.5,
        }
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.min.latitude..=self.max.latitude).contains(&point.latitude)
            && (self.min.longitude..=self.max.longitude).contains(&point.longitude)
    }
}

/// Cells along the H3 grid path between two cells (inclusive).
/// Returns `None` when h3o cannot build a local IJ path (e.g. across a pentagon).
pub fn grid_path_cells(from: CellIndex, to: CellIndex) -> Option<Vec<CellIndex>> {
    from.grid_path_cells(to).ok().and_then(|path| {
        let cells: Vec<CellIndex> = path.filter_map(|cell| cell.ok()).collect();
        if cells.is_empty() {
            None
        } else {
            Some(cells)
        }
    })
}
