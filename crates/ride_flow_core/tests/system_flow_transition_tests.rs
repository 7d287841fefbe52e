mod support;

use ride_flow_core::events::{FlowEvent, UserAction};
use ride_flow_core::map::MapCommand;
use ride_flow_core::pricing::RideTierId;
use ride_flow_core::session::{ActionButton, FlowPhase, RouteFetchStatus};
use ride_flow_core::test_helpers::{test_destination, test_other_destination, test_user_location};
use support::flow::{
    controller, deliver_route, select_destination, set_location, single_route_request,
    straight_route,
};

#[test]
fn suggestion_pick_places_exactly_one_annotation() {
    let mut controller = controller();
    set_location(&mut controller, test_user_location());

    select_destination(&mut controller, "Starbucks", test_destination());

    assert_eq!(controller.phase(), FlowPhase::DestinationSelected);
    assert_eq!(controller.map_surface().annotations(), &[test_destination()]);
    assert_eq!(controller.session().action_button(), ActionButton::Back);
}

#[test]
fn route_result_moves_to_route_ready_and_fits_viewport() {
    let mut controller = controller();
    set_location(&mut controller, test_user_location());
    let token = select_destination(&mut controller, "Starbucks", test_destination());
    let request = single_route_request(&mut controller);
    assert_eq!(request.token, token);

    deliver_route(&mut controller, token, straight_route(&request, 600.0));

    assert_eq!(controller.phase(), FlowPhase::RouteReady);
    let map = controller.map_surface();
    assert_eq!(map.overlays().len(), 1);
    let (bounds, padding) = map.viewport().expect("viewport fitted");
    assert!(bounds.contains(&test_destination()));
    assert_eq!((padding.top, padding.bottom), (64.0, 500.0));

    let quote = controller.quote().expect("quote");
    let times = quote.times.expect("times");
    assert_eq!((times.dropoff - times.pickup).num_seconds(), 600);
}

#[test]
fn back_out_with_fetch_in_flight_returns_to_idle() {
    let mut controller = controller();
    set_location(&mut controller, test_user_location());
    let token = select_destination(&mut controller, "Starbucks", test_destination());
    let request = single_route_request(&mut controller);

    controller.dispatch(UserAction::Back);
    controller.process_pending();
    assert_eq!(controller.phase(), FlowPhase::Idle);

    // The fetch resolves after the user already left.
    deliver_route(&mut controller, token, straight_route(&request, 600.0));

    let session = controller.session();
    assert_eq!(session.phase(), FlowPhase::Idle);
    assert!(session.selected_destination().is_none());
    assert!(session.route_result().is_none());
    assert!(session.quote.is_none());
    assert!(controller.map_surface().annotations().is_empty());
    assert!(controller.map_surface().overlays().is_empty());
    assert_eq!(controller.telemetry().stale_route_results, 1);
}

#[test]
fn back_from_route_ready_clears_map_and_recenters() {
    let mut controller = controller();
    set_location(&mut controller, test_user_location());
    let token = select_destination(&mut controller, "Starbucks", test_destination());
    let request = single_route_request(&mut controller);
    deliver_route(&mut controller, token, straight_route(&request, 600.0));

    controller.dispatch(UserAction::Back);
    controller.process_pending();

    let map = controller.map_surface();
    assert!(map.annotations().is_empty());
    assert!(map.overlays().is_empty());
    assert_eq!(map.region().map(|(center, _)| center), Some(test_user_location()));
    assert!(controller.session().route_result().is_none());
    assert_eq!(controller.session().action_button(), ActionButton::Menu);
}

#[test]
fn overlapping_fetches_only_apply_the_latest_destination() {
    let mut controller = controller();
    set_location(&mut controller, test_user_location());

    let first = select_destination(&mut controller, "Starbucks", test_destination());
    let first_request = single_route_request(&mut controller);
    controller.dispatch(UserAction::Back);
    controller.process_pending();

    let second = select_destination(&mut controller, "Empire State", test_other_destination());
    let second_request = single_route_request(&mut controller);
    assert_ne!(first, second);

    // The older fetch lands while the newer one is still pending.
    deliver_route(&mut controller, first, straight_route(&first_request, 300.0));
    assert_eq!(controller.phase(), FlowPhase::DestinationSelected);
    assert!(controller.session().route_result().is_none());
    assert!(controller.map_surface().overlays().is_empty());

    deliver_route(&mut controller, second, straight_route(&second_request, 900.0));
    let session = controller.session();
    assert_eq!(session.phase(), FlowPhase::RouteReady);
    let route = session.route_result().expect("route");
    assert_eq!(route.geometry.last(), Some(&test_other_destination()));
    assert_eq!(route.expected_travel_secs, 900.0);
    assert_eq!(controller.telemetry().stale_route_results, 1);
}

#[test]
fn route_ready_is_only_reached_from_destination_selected() {
    let mut controller = controller();
    set_location(&mut controller, test_user_location());

    // A route result with no destination selected must not move the phase.
    let token = select_destination(&mut controller, "Starbucks", test_destination());
    let request = single_route_request(&mut controller);
    controller.dispatch(UserAction::Back);
    controller.dispatch(UserAction::TapSearch);
    controller.process_pending();
    deliver_route(&mut controller, token, straight_route(&request, 60.0));
    assert_eq!(controller.phase(), FlowPhase::Searching);

    controller.dispatch(UserAction::Back);
    controller.process_pending();
    let token = select_destination(&mut controller, "Starbucks", test_destination());
    let request = single_route_request(&mut controller);
    deliver_route(&mut controller, token, straight_route(&request, 60.0));

    for transition in &controller.telemetry().transitions {
        if transition.to == FlowPhase::RouteReady {
            assert_eq!(transition.from, FlowPhase::DestinationSelected);
        }
    }
    assert_eq!(controller.phase(), FlowPhase::RouteReady);
}

#[test]
fn no_location_means_no_price_and_no_fetch_until_fix_arrives() {
    let mut controller = controller();
    select_destination(&mut controller, "Starbucks", test_destination());

    for tier in RideTierId::ALL {
        assert!(controller.price_for(tier).is_none());
    }
    assert!(controller.take_route_requests().is_empty());
    assert_eq!(
        controller.session().route_fetch,
        RouteFetchStatus::NotRequested
    );

    set_location(&mut controller, test_user_location());

    let request = single_route_request(&mut controller);
    assert_eq!(request.from, test_user_location());
    assert_eq!(controller.phase(), FlowPhase::DestinationSelected);
    assert!(controller.price_for(RideTierId::UberX).is_some());
    // The fix arrived outside Idle, so the map was not recentered.
    assert!(controller.map_surface().region().is_none());
}

#[test]
fn route_failure_keeps_destination_and_reselect_retries() {
    let mut controller = controller();
    set_location(&mut controller, test_user_location());
    let token = select_destination(&mut controller, "Starbucks", test_destination());
    single_route_request(&mut controller);

    controller.submit(FlowEvent::RouteFetchFailed(token, "network down".to_string()));
    controller.process_pending();

    assert_eq!(controller.phase(), FlowPhase::DestinationSelected);
    assert_eq!(controller.session().route_fetch, RouteFetchStatus::Failed);
    assert!(controller.map_surface().overlays().is_empty());
    assert!(controller.map_surface().viewport().is_none());
    assert!(controller.take_route_requests().is_empty(), "no automatic retry");

    controller.dispatch(UserAction::Back);
    controller.process_pending();
    let retry = select_destination(&mut controller, "Starbucks", test_destination());
    let request = single_route_request(&mut controller);
    assert_eq!(request.token, retry);
    assert_eq!(controller.telemetry().failed_route_fetches, 1);
}

#[test]
fn idle_location_updates_recenter_without_phase_change() {
    let mut controller = controller();
    set_location(&mut controller, test_user_location());

    assert_eq!(controller.phase(), FlowPhase::Idle);
    let commands = &controller.map_surface().commands;
    assert!(matches!(
        commands.as_slice(),
        [MapCommand::SetRegion { center, .. }] if *center == test_user_location()
    ));
}

#[test]
fn tier_selection_is_kept_until_the_flow_resets() {
    let mut controller = controller();
    set_location(&mut controller, test_user_location());
    select_destination(&mut controller, "Starbucks", test_destination());

    controller.dispatch(UserAction::SelectRideTier(RideTierId::UberXl));
    controller.process_pending();
    assert_eq!(controller.session().selected_tier, RideTierId::UberXl);

    controller.dispatch(UserAction::Back);
    controller.process_pending();
    assert_eq!(controller.session().selected_tier, RideTierId::UberX);
}

#[test]
fn huge_travel_time_keeps_the_route_and_drops_arrival_times() {
    let mut controller = controller();
    set_location(&mut controller, test_user_location());
    let token = select_destination(&mut controller, "Starbucks", test_destination());
    let request = single_route_request(&mut controller);

    deliver_route(&mut controller, token, straight_route(&request, 1.0e13));

    assert_eq!(controller.phase(), FlowPhase::RouteReady);
    assert_eq!(controller.map_surface().overlays().len(), 1);
    let quote = controller.quote().expect("quote");
    assert!(quote.times.is_none());
    assert!(quote.price_for(RideTierId::UberX).is_some());
}
