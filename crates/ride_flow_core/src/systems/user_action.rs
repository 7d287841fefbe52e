//! UserAction system: search activation, query edits, suggestion picks, back, tier choice.

use bevy_ecs::prelude::{Res, ResMut};
use tracing::debug;

use crate::config::FlowSettings;
use crate::events::{CurrentEvent, FlowEvent, UserAction};
use crate::map::MapCommands;
use crate::outbox::{FlowOutbox, ResolutionRequest};
use crate::pricing::RideTierCatalog;
use crate::session::{FlowPhase, TripSession};
use crate::systems::recenter_on_user;
use crate::telemetry::FlowTelemetry;

pub fn user_action_system(
    event: Res<CurrentEvent>,
    settings: Res<FlowSettings>,
    catalog: Res<RideTierCatalog>,
    mut session: ResMut<TripSession>,
    mut map: ResMut<MapCommands>,
    mut outbox: ResMut<FlowOutbox>,
    mut telemetry: ResMut<FlowTelemetry>,
) {
    let FlowEvent::UserAction(action) = &event.0.event else {
        return;
    };
    let seq = event.0.seq;
    let phase = session.phase();

    match (phase, action) {
        (FlowPhase::Idle, UserAction::TapSearch) => {
            session.begin_search();
            telemetry.record_transition(seq, phase, FlowPhase::Searching);
        }
        (FlowPhase::Searching, UserAction::UpdateQuery(text)) => {
            session.search.query_fragment = text.clone();
            outbox.suggestion_queries.push(text.clone());
        }
        (FlowPhase::Searching, UserAction::SelectSuggestion(suggestion)) => {
            let token = session.mint_resolution_token();
            session.search.pending_resolution = Some((token, suggestion.clone()));
            outbox.resolution_requests.push(ResolutionRequest {
                token,
                suggestion: suggestion.clone(),
            });
        }
        (
            FlowPhase::Searching | FlowPhase::DestinationSelected | FlowPhase::RouteReady,
            UserAction::Back,
        ) => {
            map.clear_all();
            session.reset_to_idle();
            recenter_on_user(&session, &settings, &mut map);
            telemetry.record_transition(seq, phase, FlowPhase::Idle);
        }
        (
            FlowPhase::DestinationSelected | FlowPhase::RouteReady,
            UserAction::SelectRideTier(id),
        ) => {
            if catalog.get(*id).is_some() {
                session.selected_tier = *id;
            } else {
                debug!(tier = ?id, "ignoring unknown ride tier");
            }
        }
        (phase, action) => {
            debug!(?phase, ?action, "user action has no effect in this phase");
        }
    }
}
