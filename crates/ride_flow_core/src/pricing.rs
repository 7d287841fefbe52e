//! Trip quote engine: per-tier fares and pickup/dropoff estimates.
//!
//! Formula: `fare = base_fare + per_mile_rate * (distance_m / meters_per_mile)`,
//! rounded to cents.

use bevy_ecs::prelude::Resource;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Metres per statute mile.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Rounded divisor used by older fare tables. Slightly inflates prices.
pub const LEGACY_METERS_PER_MILE: f64 = 1600.0;

/// Ride product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RideTierId {
    #[default]
    #[serde(rename = "uberX")]
    UberX,
    #[serde(rename = "black")]
    Black,
    #[serde(rename = "uberXL")]
    UberXl,
}

impl RideTierId {
    pub const ALL: [RideTierId; 3] = [RideTierId::UberX, RideTierId::Black, RideTierId::UberXl];
}

/// One row of the tier catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideTier {
    pub id: RideTierId,
    pub display_name: String,
    pub image_name: String,
    /// Base fare in currency units.
    pub base_fare: f64,
    /// Rate per mile in currency units.
    pub per_mile_rate: f64,
}

impl RideTier {
    /// Reference values for a tier.
    pub fn standard(id: RideTierId) -> Self {
        let (display_name, image_name, base_fare, per_mile_rate) = match id {
            RideTierId::UberX => ("UberX", "uber-X", 5.0, 1.5),
            RideTierId::Black => ("UberBlack", "uber-black", 20.0, 2.0),
            RideTierId::UberXl => ("UberXL", "uber-X", 10.0, 1.75),
        };
        Self {
            id,
            display_name: display_name.to_string(),
            image_name: image_name.to_string(),
            base_fare,
            per_mile_rate,
        }
    }
}

/// Static tier catalog, in display order.
#[derive(Debug, Clone, PartialEq, Resource)]
pub struct RideTierCatalog {
    tiers: Vec<RideTier>,
}

impl Default for RideTierCatalog {
    fn default() -> Self {
        Self {
            tiers: RideTierId::ALL.into_iter().map(RideTier::standard).collect(),
        }
    }
}

impl RideTierCatalog {
    pub fn new(tiers: Vec<RideTier>) -> Self {
        Self { tiers }
    }

    pub fn tiers(&self) -> &[RideTier] {
        &self.tiers
    }

    pub fn get(&self, id: RideTierId) -> Option<&RideTier> {
        self.tiers.iter().find(|tier| tier.id == id)
    }

    /// Replace the fare fields of tiers present in `overrides`.
    pub fn with_overrides(mut self, overrides: &[RideTier]) -> Self {
        for tier in &mut self.tiers {
            if let Some(over) = overrides.iter().find(|o| o.id == tier.id) {
                *tier = over.clone();
            }
        }
        self
    }
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Fare for `distance_m` metres. Negative or NaN distances count as zero.
pub fn compute_price(tier: &RideTier, distance_m: f64, meters_per_mile: f64) -> f64 {
    let distance_m = if distance_m.is_nan() { 0.0 } else { distance_m.max(0.0) };
    let distance_miles = distance_m / meters_per_mile;
    round_to_cents(tier.base_fare + tier.per_mile_rate * distance_miles)
}

/// Straight-line fare between two optional endpoints; `None` when either is missing.
pub fn price_between(
    tier: &RideTier,
    from: Option<Coordinate>,
    to: Option<Coordinate>,
    meters_per_mile: f64,
) -> Option<f64> {
    let (from, to) = (from?, to?);
    Some(compute_price(tier, from.distance_m(&to), meters_per_mile))
}

/// Pickup and dropoff instants for the current trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripTimes {
    pub pickup: DateTime<Utc>,
    pub dropoff: DateTime<Utc>,
}

/// Pickup is now; dropoff is now plus the expected travel time.
/// `None` when the dropoff instant is not representable.
pub fn estimate_times(now: DateTime<Utc>, expected_travel_secs: f64) -> Option<TripTimes> {
    let secs = if expected_travel_secs.is_finite() {
        expected_travel_secs.max(0.0)
    } else {
        0.0
    };
    let travel = TimeDelta::try_milliseconds((secs * 1000.0).round() as i64)?;
    let dropoff = now.checked_add_signed(travel)?;
    Some(TripTimes {
        pickup: now,
        dropoff,
    })
}

/// Where the quoted distance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceSource {
    Routed,
    StraightLine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierPrice {
    pub tier: RideTierId,
    pub price: f64,
}

/// Computed price-and-time estimate for the current trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripQuote {
    pub distance_m: f64,
    pub distance_source: DistanceSource,
    pub prices: Vec<TierPrice>,
    /// Set once a route result with a representable travel time has been applied.
    pub times: Option<TripTimes>,
}

impl TripQuote {
    pub fn price_for(&self, tier: RideTierId) -> Option<f64> {
        self.prices
            .iter()
            .find(|entry| entry.tier == tier)
            .map(|entry| entry.price)
    }
}

/// Price every tier in catalog order.
pub fn quote_trip(
    catalog: &RideTierCatalog,
    distance_m: f64,
    distance_source: DistanceSource,
    meters_per_mile: f64,
    times: Option<TripTimes>,
) -> TripQuote {
    let prices = catalog
        .tiers()
        .iter()
        .map(|tier| TierPrice {
            tier: tier.id,
            price: compute_price(tier, distance_m, meters_per_mile),
        })
        .collect();
    TripQuote {
        distance_m,
        distance_source,
        prices,
        times,
    }
}
