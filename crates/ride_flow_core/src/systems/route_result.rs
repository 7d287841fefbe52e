//! RouteFetchSucceeded / RouteFetchFailed systems.
//!
//! Results are applied only when their token matches the destination still
//! awaiting a route; anything else is a superseded fetch and is dropped.

use bevy_ecs::prelude::{Res, ResMut};
use tracing::{debug, warn};

use crate::clock::SessionClock;
use crate::config::FlowSettings;
use crate::error::{FlowError, RouteFetchError};
use crate::events::{CurrentEvent, FlowEvent};
use crate::map::{MapCommand, MapCommands};
use crate::pricing::estimate_times;
use crate::session::{FlowPhase, RouteFetchStatus, TripSession};
use crate::telemetry::FlowTelemetry;

pub fn route_fetch_succeeded_system(
    event: Res<CurrentEvent>,
    settings: Res<FlowSettings>,
    clock: Res<SessionClock>,
    mut session: ResMut<TripSession>,
    mut map: ResMut<MapCommands>,
    mut telemetry: ResMut<FlowTelemetry>,
) {
    let FlowEvent::RouteFetchSucceeded(token, route) = &event.0.event else {
        return;
    };
    if !session.is_current_destination(*token) {
        debug!(?token, phase = ?session.phase(), "dropping stale route result");
        telemetry.stale_route_results += 1;
        return;
    }

    let times = estimate_times(clock.now(), route.expected_travel_secs);
    if times.is_none() {
        warn!(
            secs = route.expected_travel_secs,
            "travel time out of range; omitting pickup/dropoff"
        );
    }
    if !route.geometry.is_empty() {
        map.push(MapCommand::AddRouteOverlay(route.geometry.clone()));
    }
    if let Some(bounds) = route.bounds() {
        map.push(MapCommand::FitViewport {
            bounds,
            padding: settings.route_edge_padding,
        });
    }
    session.apply_route(route.clone(), times);
    telemetry.record_transition(event.0.seq, FlowPhase::DestinationSelected, FlowPhase::RouteReady);
}

pub fn route_fetch_failed_system(
    event: Res<CurrentEvent>,
    mut session: ResMut<TripSession>,
    mut telemetry: ResMut<FlowTelemetry>,
) {
    let FlowEvent::RouteFetchFailed(token, reason) = &event.0.event else {
        return;
    };
    if !session.is_current_destination(*token) {
        debug!(?token, "dropping stale route failure");
        telemetry.stale_route_results += 1;
        return;
    }

    let err = FlowError::RouteFetchFailed(RouteFetchError::Provider(reason.clone()));
    warn!(error = %err, ?token, "route fetch failed; staying on destination");
    session.route_fetch = RouteFetchStatus::Failed;
    telemetry.failed_route_fetches += 1;
}
