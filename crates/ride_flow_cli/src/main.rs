use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use ride_flow_core::config::FlowConfig;
use ride_flow_core::controller::MapFlowController;
use ride_flow_core::driver::FlowDriver;
use ride_flow_core::events::UserAction;
use ride_flow_core::format::{DefaultQuoteFormatter, QuoteFormatter};
use ride_flow_core::geo::Coordinate;
use ride_flow_core::location::ScriptedLocationSource;
use ride_flow_core::map::TracingMapSurface;
use ride_flow_core::pricing::{DistanceSource, RideTierId};
use ride_flow_core::routing::{build_route_provider, RouteProviderKind};
use ride_flow_core::search::StaticPlaceSearch;
use ride_flow_core::session::FlowPhase;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "ride-flow",
    about = "Walk through the ride request flow and print trip quotes",
    long_about = "Searches the built-in place catalog, selects a destination,\n\
                  fetches a route and prints the price of every ride tier."
)]
struct Cli {
    /// Destination search text
    #[arg(long, default_value = "Starbucks")]
    query: String,
    /// Index of the suggestion to pick
    #[arg(long, default_value_t = 0)]
    pick: usize,
    /// Pickup latitude
    #[arg(long, default_value_t = 40.7128, allow_negative_numbers = true)]
    lat: f64,
    /// Pickup longitude
    #[arg(long, default_value_t = -74.0060, allow_negative_numbers = true)]
    lng: f64,
    /// Routing backend (overrides the config file)
    #[arg(long, value_enum)]
    provider: Option<ProviderArg>,
    /// OSRM endpoint, used with `--provider osrm`
    #[arg(long, env = "RIDE_FLOW_OSRM_ENDPOINT")]
    osrm_endpoint: Option<String>,
    /// Price with the rounded 1600 m/mile divisor
    #[arg(long)]
    legacy_miles: bool,
    /// Tier to highlight in the output
    #[arg(long, value_enum, default_value_t = TierArg::UberX)]
    tier: TierArg,
    /// JSON configuration file
    #[arg(long, env = "RIDE_FLOW_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderArg {
    #[value(name = "straight-line")]
    StraightLine,
    #[value(name = "h3-grid")]
    H3Grid,
    Osrm,
}

#[derive(Clone, Copy, ValueEnum)]
enum TierArg {
    #[value(name = "uberx")]
    UberX,
    Black,
    #[value(name = "uberxl")]
    UberXl,
}

impl From<TierArg> for RideTierId {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::UberX => RideTierId::UberX,
            TierArg::Black => RideTierId::Black,
            TierArg::UberXl => RideTierId::UberXl,
        }
    }
}

fn provider_kind(arg: ProviderArg, endpoint: Option<String>) -> Result<RouteProviderKind> {
    match arg {
        ProviderArg::StraightLine => Ok(RouteProviderKind::StraightLine),
        ProviderArg::H3Grid => Ok(RouteProviderKind::H3Grid),
        #[cfg(feature = "osrm")]
        ProviderArg::Osrm => Ok(RouteProviderKind::Osrm {
            endpoint: endpoint.unwrap_or_else(|| "http://localhost:5000".to_string()),
        }),
        #[cfg(not(feature = "osrm"))]
        ProviderArg::Osrm => {
            let _ = endpoint;
            bail!("built without the `osrm` feature")
        }
    }
}

fn load_config(cli: &Cli) -> Result<FlowConfig> {
    let mut config = match &cli.config {
        Some(path) => FlowConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => FlowConfig::default(),
    };
    if cli.legacy_miles {
        config = config.with_legacy_mile_divisor(true);
    }
    if let Some(provider) = cli.provider {
        config = config.with_route_provider(provider_kind(provider, cli.osrm_endpoint.clone())?);
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let pickup = Coordinate::new(cli.lat, cli.lng)
        .with_context(|| format!("invalid pickup coordinate {}, {}", cli.lat, cli.lng))?;

    info!(provider = ?config.routing.provider, %pickup, "starting ride flow");
    let routes = build_route_provider(
        &config.routing.provider,
        config.routing.average_speed_kmh,
        config.routing.cache_capacity,
        config.routing.fallback_to_straight_line,
    )?;
    let controller = MapFlowController::new(&config, TracingMapSurface);
    let mut driver = FlowDriver::new(
        controller,
        routes,
        Box::new(StaticPlaceSearch::new_york()),
        ScriptedLocationSource::new([Some(pickup)]),
    );

    driver.pump();
    driver.act(UserAction::TapSearch);
    driver.act(UserAction::UpdateQuery(cli.query.clone()));

    let results = driver.controller().session().search.results.clone();
    let Some(choice) = results.get(cli.pick).cloned() else {
        bail!("no suggestion #{} for '{}' ({} found)", cli.pick, cli.query, results.len());
    };
    driver.act(UserAction::SelectSuggestion(choice.clone()));
    driver.act(UserAction::SelectRideTier(cli.tier.into()));

    let controller = driver.controller();
    if controller.phase() == FlowPhase::Searching {
        bail!("'{}' could not be resolved", choice.title);
    }

    let formatter = DefaultQuoteFormatter::from_config(&config.display);
    let session = controller.session();
    let Some(quote) = controller.quote() else {
        bail!("no quote available");
    };

    println!("Destination: {} ({})", choice.title, choice.subtitle);
    println!(
        "Distance:    {:.2} mi ({:?})",
        quote.distance_m / config.settings().meters_per_mile,
        quote.distance_source
    );
    if let Some(times) = quote.times {
        println!(
            "Pickup:      {}   Dropoff: {}",
            formatter.format_clock_time(times.pickup),
            formatter.format_clock_time(times.dropoff)
        );
    } else if quote.distance_source == DistanceSource::StraightLine {
        println!("Route unavailable; prices use straight-line distance");
    } else {
        println!("Arrival time unavailable");
    }
    println!();
    for tier in controller.catalog().tiers() {
        let marker = if tier.id == session.selected_tier { ">" } else { " " };
        let price = quote
            .price_for(tier.id)
            .map(|p| formatter.format_currency(p))
            .unwrap_or_else(|| "unavailable".to_string());
        println!("{marker} {:<10} {price:>10}", tier.display_name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn negative_longitude_and_flags_parse() {
        let cli = Cli::try_parse_from([
            "ride-flow",
            "--lng",
            "-73.99",
            "--provider",
            "h3-grid",
            "--tier",
            "uberxl",
            "--legacy-miles",
        ])
        .expect("parse");
        assert_eq!(cli.lng, -73.99);
        assert!(cli.legacy_miles);
        assert_eq!(RideTierId::from(cli.tier), RideTierId::UberXl);

        let config = load_config(&cli).expect("config");
        assert_eq!(config.routing.provider, RouteProviderKind::H3Grid);
        assert!(config.pricing.legacy_mile_divisor);
    }
}
