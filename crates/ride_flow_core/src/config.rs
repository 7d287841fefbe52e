//! Flow configuration: pricing, map presentation, routing and display.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use std::path::Path;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::map::{EdgePadding, RegionSpan};
use crate::pricing::{RideTier, RideTierCatalog, LEGACY_METERS_PER_MILE, METERS_PER_MILE};
use crate::routing::{RouteProviderKind, DEFAULT_AVERAGE_SPEED_KMH};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub meters_per_mile: f64,
    /// Use the rounded 1600 m/mile divisor of older fare tables.
    pub legacy_mile_divisor: bool,
    /// Replacements for catalog rows, matched by tier id.
    pub tier_overrides: Vec<RideTier>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            meters_per_mile: METERS_PER_MILE,
            legacy_mile_divisor: false,
            tier_overrides: Vec::new(),
        }
    }
}

impl PricingConfig {
    pub fn effective_meters_per_mile(&self) -> f64 {
        if self.legacy_mile_divisor {
            LEGACY_METERS_PER_MILE
        } else {
            self.meters_per_mile
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Span of the region shown when recentering on the user.
    pub recenter_span_degrees: f64,
    pub route_edge_padding: EdgePadding,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            recenter_span_degrees: 0.05,
            route_edge_padding: EdgePadding::default(),
        }
    }
}

/// Slowest accepted average speed; anything lower yields meaningless travel times.
pub const MIN_AVERAGE_SPEED_KMH: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub provider: RouteProviderKind,
    pub average_speed_kmh: f64,
    pub cache_capacity: usize,
    pub fallback_to_straight_line: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            provider: RouteProviderKind::default(),
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
            cache_capacity: 256,
            fallback_to_straight_line: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Offset applied when rendering clock times.
    pub utc_offset_minutes: i32,
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            currency_symbol: "$".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub pricing: PricingConfig,
    pub map: MapConfig,
    pub routing: RoutingConfig,
    pub display: DisplayConfig,
}

impl FlowConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: FlowConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.pricing.meters_per_mile.is_finite() && self.pricing.meters_per_mile > 0.0) {
            return Err(ConfigError::Invalid(
                "pricing.meters_per_mile must be positive".to_string(),
            ));
        }
        for tier in &self.pricing.tier_overrides {
            if tier.base_fare < 0.0 || tier.per_mile_rate < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "tier {:?} has a negative fare component",
                    tier.id
                )));
            }
        }
        if !(self.map.recenter_span_degrees > 0.0 && self.map.recenter_span_degrees <= 180.0) {
            return Err(ConfigError::Invalid(
                "map.recenter_span_degrees must be in (0, 180]".to_string(),
            ));
        }
        let speed = self.routing.average_speed_kmh;
        if !(speed.is_finite() && speed >= MIN_AVERAGE_SPEED_KMH) {
            return Err(ConfigError::Invalid(format!(
                "routing.average_speed_kmh must be at least {MIN_AVERAGE_SPEED_KMH}"
            )));
        }
        if self.display.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(ConfigError::Invalid(
                "display.utc_offset_minutes must be within one day".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_legacy_mile_divisor(mut self, legacy: bool) -> Self {
        self.pricing.legacy_mile_divisor = legacy;
        self
    }

    pub fn with_route_provider(mut self, provider: RouteProviderKind) -> Self {
        self.routing.provider = provider;
        self
    }

    pub fn with_average_speed_kmh(mut self, speed: f64) -> Self {
        self.routing.average_speed_kmh = speed;
        self
    }

    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.display.utc_offset_minutes = minutes;
        self
    }

    pub fn catalog(&self) -> RideTierCatalog {
        RideTierCatalog::default().with_overrides(&self.pricing.tier_overrides)
    }

    pub fn settings(&self) -> FlowSettings {
        FlowSettings {
            meters_per_mile: self.pricing.effective_meters_per_mile(),
            recenter_span: RegionSpan::square(self.map.recenter_span_degrees),
            route_edge_padding: self.map.route_edge_padding,
        }
    }
}

/// Runtime settings read by the flow systems.
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct FlowSettings {
    pub meters_per_mile: f64,
    pub recenter_span: RegionSpan,
    pub route_edge_padding: EdgePadding,
}

impl Default for FlowSettings {
    fn default() -> Self {
        FlowConfig::default().settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::RideTierId;

    #[test]
    fn empty_json_yields_defaults() {
        let config = FlowConfig::from_json_str("{}").expect("config");
        assert_eq!(config, FlowConfig::default());
        assert_eq!(config.settings().meters_per_mile, METERS_PER_MILE);
        assert_eq!(config.settings().recenter_span, RegionSpan::square(0.05));
    }

    #[test]
    fn legacy_divisor_switches_meters_per_mile() {
        let config = FlowConfig::default().with_legacy_mile_divisor(true);
        assert_eq!(config.settings().meters_per_mile, LEGACY_METERS_PER_MILE);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = FlowConfig::from_json_str(
            r#"{"routing": {"provider": {"kind": "h3_grid"}}, "display": {"utc_offset_minutes": -300}}"#,
        )
        .expect("config");
        assert_eq!(config.routing.provider, RouteProviderKind::H3Grid);
        assert_eq!(config.routing.average_speed_kmh, DEFAULT_AVERAGE_SPEED_KMH);
        assert_eq!(config.display.utc_offset_minutes, -300);
        assert_eq!(config.display.currency_symbol, "$");
    }

    #[test]
    fn tier_overrides_flow_into_catalog() {
        let config = FlowConfig::from_json_str(
            r#"{"pricing": {"tier_overrides": [{"id": "black", "display_name": "Black",
                "image_name": "uber-black", "base_fare": 25.0, "per_mile_rate": 2.5}]}}"#,
        )
        .expect("config");
        let catalog = config.catalog();
        assert_eq!(catalog.get(RideTierId::Black).map(|t| t.base_fare), Some(25.0));
        assert_eq!(catalog.tiers().len(), 3);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = FlowConfig::from_json_str(r#"{"pricing": {"meters_per_mile": 0}}"#)
            .expect_err("zero divisor");
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = FlowConfig::from_json_str(r#"{"routing": {"average_speed_kmh": -1}}"#)
            .expect_err("negative speed");
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = FlowConfig::default()
            .with_average_speed_kmh(1e-9)
            .validate()
            .expect_err("crawling speed");
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = FlowConfig::from_json_str("not json").expect_err("parse");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
