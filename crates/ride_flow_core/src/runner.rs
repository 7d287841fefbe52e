//! Flow runner: routes inbox events into the ECS.
//!
//! Each step pops the next event from [FlowInbox], inserts it as
//! [CurrentEvent], then runs the schedule. Event systems are gated by run
//! conditions; the route-request and quote systems run after every event.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::clock::SessionClock;
use crate::config::FlowSettings;
use crate::events::{CurrentEvent, EventKind, FlowInbox, InboundEvent};
use crate::map::MapCommands;
use crate::outbox::FlowOutbox;
use crate::pricing::RideTierCatalog;
use crate::session::TripSession;
use crate::systems::{
    location_updated::location_updated_system,
    place_resolved::{place_resolution_failed_system, place_resolved_system},
    quote::quote_system,
    route_request::route_request_system,
    route_result::{route_fetch_failed_system, route_fetch_succeeded_system},
    suggestions_updated::suggestions_updated_system,
    user_action::user_action_system,
};
use crate::telemetry::FlowTelemetry;

fn is_event(event: Option<Res<CurrentEvent>>, kind: EventKind) -> bool {
    event.map(|e| e.kind() == kind).unwrap_or(false)
}

fn is_user_action(event: Option<Res<CurrentEvent>>) -> bool {
    is_event(event, EventKind::UserAction)
}

fn is_location_updated(event: Option<Res<CurrentEvent>>) -> bool {
    is_event(event, EventKind::LocationUpdated)
}

fn is_suggestions_updated(event: Option<Res<CurrentEvent>>) -> bool {
    is_event(event, EventKind::SuggestionsUpdated)
}

fn is_place_resolved(event: Option<Res<CurrentEvent>>) -> bool {
    is_event(event, EventKind::PlaceResolved)
}

fn is_place_resolution_failed(event: Option<Res<CurrentEvent>>) -> bool {
    is_event(event, EventKind::PlaceResolutionFailed)
}

fn is_route_fetch_succeeded(event: Option<Res<CurrentEvent>>) -> bool {
    is_event(event, EventKind::RouteFetchSucceeded)
}

fn is_route_fetch_failed(event: Option<Res<CurrentEvent>>) -> bool {
    is_event(event, EventKind::RouteFetchFailed)
}

/// Insert every resource the flow systems read or write.
pub fn initialize_flow(
    world: &mut World,
    settings: FlowSettings,
    catalog: RideTierCatalog,
    clock: SessionClock,
) {
    world.insert_resource(settings);
    world.insert_resource(catalog);
    world.insert_resource(clock);
    world.insert_resource(TripSession::default());
    world.insert_resource(FlowInbox::default());
    world.insert_resource(FlowOutbox::default());
    world.insert_resource(MapCommands::default());
    world.insert_resource(FlowTelemetry::default());
}

/// Builds the flow schedule. Systems are chained so the route-request and
/// quote systems always observe the state left by the event system.
pub fn flow_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            user_action_system.run_if(is_user_action),
            location_updated_system.run_if(is_location_updated),
            suggestions_updated_system.run_if(is_suggestions_updated),
            place_resolved_system.run_if(is_place_resolved),
            place_resolution_failed_system.run_if(is_place_resolution_failed),
            route_fetch_succeeded_system.run_if(is_route_fetch_succeeded),
            route_fetch_failed_system.run_if(is_route_fetch_failed),
            route_request_system,
            quote_system,
        )
            .chain(),
    );
    schedule
}

/// Runs one step. Returns the processed event, or `None` if the inbox was empty.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> Option<InboundEvent> {
    let event = world.resource_mut::<FlowInbox>().pop_next()?;
    world.insert_resource(CurrentEvent(event.clone()));
    schedule.run(world);
    Some(event)
}

/// Runs steps until the inbox is empty or `max_steps` is reached.
/// Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule).is_some() {
        steps += 1;
    }
    steps
}
