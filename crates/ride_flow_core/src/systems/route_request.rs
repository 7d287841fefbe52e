//! RouteRequest system: issue exactly one route fetch per destination selection.
//!
//! Runs after every event. While the user location is unknown the request is
//! deferred; it goes out on the first step that has both endpoints.

use bevy_ecs::prelude::ResMut;
use tracing::{debug, info};

use crate::error::FlowError;
use crate::outbox::{FlowOutbox, RouteRequest};
use crate::session::{FlowPhase, RouteFetchStatus, TripSession};
use crate::telemetry::FlowTelemetry;

pub fn route_request_system(
    mut session: ResMut<TripSession>,
    mut outbox: ResMut<FlowOutbox>,
    mut telemetry: ResMut<FlowTelemetry>,
) {
    if session.phase() != FlowPhase::DestinationSelected
        || session.route_fetch != RouteFetchStatus::NotRequested
    {
        return;
    }
    let Some(destination) = session.selected_destination().cloned() else {
        return;
    };
    let Some(from) = session.user_location else {
        debug!(error = %FlowError::LocationUnavailable, "deferring route fetch");
        return;
    };

    info!(token = ?destination.token, "requesting route");
    outbox.route_requests.push(RouteRequest {
        token: destination.token,
        from,
        to: destination.coordinate,
    });
    session.route_fetch = RouteFetchStatus::InFlight;
    telemetry.route_requests_issued += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{create_test_world, test_destination, test_user_location};
    use bevy_ecs::prelude::Schedule;

    #[test]
    fn route_fetch_waits_for_user_location_then_fires_once() {
        let mut world = create_test_world();
        {
            let mut session = world.resource_mut::<TripSession>();
            session.begin_search();
            session.select_destination("Brooklyn".to_string(), test_destination());
        }
        let mut schedule = Schedule::default();
        schedule.add_systems(route_request_system);

        schedule.run(&mut world);
        assert!(world.resource::<FlowOutbox>().route_requests.is_empty());
        assert_eq!(
            world.resource::<TripSession>().route_fetch,
            RouteFetchStatus::NotRequested
        );

        world.resource_mut::<TripSession>().user_location = Some(test_user_location());
        schedule.run(&mut world);
        schedule.run(&mut world);

        let requests = world.resource_mut::<FlowOutbox>().take_route_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].from, test_user_location());
        assert_eq!(requests[0].to, test_destination());
        assert_eq!(world.resource::<FlowTelemetry>().route_requests_issued, 1);
        assert_eq!(
            world.resource::<TripSession>().route_fetch,
            RouteFetchStatus::InFlight
        );
    }

    #[test]
    fn no_route_fetch_outside_destination_selected() {
        let mut world = create_test_world();
        world.resource_mut::<TripSession>().user_location = Some(test_user_location());
        let mut schedule = Schedule::default();
        schedule.add_systems(route_request_system);
        schedule.run(&mut world);
        assert!(world.resource::<FlowOutbox>().is_empty());
    }
}
