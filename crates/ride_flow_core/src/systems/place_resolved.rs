//! PlaceResolved / PlaceResolutionFailed systems: turn a suggestion pick into a destination.

use bevy_ecs::prelude::{Res, ResMut};
use tracing::{debug, info, warn};

use crate::events::{CurrentEvent, FlowEvent};
use crate::error::FlowError;
use crate::map::{MapCommand, MapCommands};
use crate::session::{FlowPhase, ResolutionToken, TripSession};
use crate::telemetry::FlowTelemetry;

fn is_pending(session: &TripSession, token: ResolutionToken) -> bool {
    session.phase() == FlowPhase::Searching
        && session.search.pending_resolution.as_ref().map(|(t, _)| *t) == Some(token)
}

pub fn place_resolved_system(
    event: Res<CurrentEvent>,
    mut session: ResMut<TripSession>,
    mut map: ResMut<MapCommands>,
    mut telemetry: ResMut<FlowTelemetry>,
) {
    let FlowEvent::PlaceResolved {
        token,
        title,
        coordinate,
    } = &event.0.event
    else {
        return;
    };
    if !is_pending(&session, *token) {
        debug!(?token, "dropping stale place resolution");
        telemetry.stale_resolutions += 1;
        return;
    }

    let destination_token = session.select_destination(title.clone(), *coordinate);
    info!(%coordinate, title = %title, ?destination_token, "destination selected");
    map.place_annotation(*coordinate);
    map.push(MapCommand::ClearOverlays);
    telemetry.record_transition(event.0.seq, FlowPhase::Searching, FlowPhase::DestinationSelected);
}

pub fn place_resolution_failed_system(
    event: Res<CurrentEvent>,
    mut session: ResMut<TripSession>,
    mut telemetry: ResMut<FlowTelemetry>,
) {
    let FlowEvent::PlaceResolutionFailed { token, reason } = &event.0.event else {
        return;
    };
    if !is_pending(&session, *token) {
        debug!(?token, "dropping stale place resolution failure");
        telemetry.stale_resolutions += 1;
        return;
    }

    let title = session
        .search
        .pending_resolution
        .take()
        .map(|(_, suggestion)| suggestion.title)
        .unwrap_or_default();
    let err = FlowError::PlaceResolutionFailed {
        title,
        reason: reason.clone(),
    };
    warn!(error = %err, "place resolution failed; staying in search");
    telemetry.failed_resolutions += 1;
}
