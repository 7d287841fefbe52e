//! Place search collaborator.

use crate::error::FlowError;
use crate::geo::Coordinate;
use crate::session::PlaceSuggestion;

pub trait PlaceSearch {
    /// Suggestions for a (debounced) query fragment, best match first.
    fn suggestions(&self, query: &str) -> Vec<PlaceSuggestion>;
    /// Coordinate of a previously returned suggestion.
    fn resolve(&self, suggestion: &PlaceSuggestion) -> Result<Coordinate, FlowError>;
}

/// A named place in [`StaticPlaceSearch`].
#[derive(Debug, Clone, PartialEq)]
pub struct KnownPlace {
    pub suggestion: PlaceSuggestion,
    pub coordinate: Coordinate,
}

/// In-memory place catalog with case-insensitive substring matching.
#[derive(Debug, Clone, Default)]
pub struct StaticPlaceSearch {
    places: Vec<KnownPlace>,
    max_results: usize,
}

impl StaticPlaceSearch {
    pub fn new(places: Vec<KnownPlace>) -> Self {
        Self {
            places,
            max_results: 10,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// A handful of New York places.
    pub fn new_york() -> Self {
        let place = |title: &str, subtitle: &str, lat: f64, lng: f64| {
            Coordinate::new(lat, lng).map(|coordinate| KnownPlace {
                suggestion: PlaceSuggestion::new(title, subtitle),
                coordinate,
            })
        };
        Self::new(
            [
                place("Starbucks", "123 Main St", 40.7306, -73.9352),
                place("Empire State Building", "20 W 34th St", 40.7484, -73.9857),
                place("Brooklyn Museum", "200 Eastern Pkwy", 40.6712, -73.9636),
                place("Central Park Zoo", "E 64th St", 40.7678, -73.9718),
                place("JFK Airport", "Queens, NY 11430", 40.6413, -73.7781),
            ]
            .into_iter()
            .flatten()
            .collect(),
        )
    }
}

impl PlaceSearch for StaticPlaceSearch {
    fn suggestions(&self, query: &str) -> Vec<PlaceSuggestion> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.places
            .iter()
            .filter(|place| {
                place.suggestion.title.to_lowercase().contains(&needle)
                    || place.suggestion.subtitle.to_lowercase().contains(&needle)
            })
            .take(self.max_results)
            .map(|place| place.suggestion.clone())
            .collect()
    }

    fn resolve(&self, suggestion: &PlaceSuggestion) -> Result<Coordinate, FlowError> {
        self.places
            .iter()
            .find(|place| &place.suggestion == suggestion)
            .map(|place| place.coordinate)
            .ok_or_else(|| FlowError::PlaceResolutionFailed {
                title: suggestion.title.clone(),
                reason: "no matching place".to_string(),
            })
    }
}
