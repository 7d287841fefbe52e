use ride_flow_core::clock::FixedTimeSource;
use ride_flow_core::config::FlowConfig;
use ride_flow_core::controller::MapFlowController;
use ride_flow_core::events::{FlowEvent, UserAction};
use ride_flow_core::geo::Coordinate;
use ride_flow_core::map::RecordingMapSurface;
use ride_flow_core::outbox::RouteRequest;
use ride_flow_core::routing::RouteResult;
use ride_flow_core::session::{DestinationToken, PlaceSuggestion};
use ride_flow_core::test_helpers::test_now;

pub type TestController = MapFlowController<RecordingMapSurface>;

/// Controller with a fixed clock and a recording map surface.
pub fn controller_with(config: &FlowConfig) -> TestController {
    MapFlowController::with_time_source(
        config,
        RecordingMapSurface::default(),
        Box::new(FixedTimeSource(test_now())),
    )
}

pub fn controller() -> TestController {
    controller_with(&FlowConfig::default())
}

pub fn set_location(controller: &mut TestController, coordinate: Coordinate) {
    controller.submit(FlowEvent::LocationUpdated(coordinate));
    controller.process_pending();
}

/// Drive Idle -> Searching -> DestinationSelected for `title` at `coordinate`.
/// Returns the destination token now held by the session.
pub fn select_destination(
    controller: &mut TestController,
    title: &str,
    coordinate: Coordinate,
) -> DestinationToken {
    controller.dispatch(UserAction::TapSearch);
    controller.dispatch(UserAction::SelectSuggestion(PlaceSuggestion::new(
        title,
        "somewhere",
    )));
    controller.process_pending();
    let request = controller
        .take_resolution_requests()
        .pop()
        .expect("resolution request");
    controller.submit(FlowEvent::PlaceResolved {
        token: request.token,
        title: title.to_string(),
        coordinate,
    });
    controller.process_pending();
    controller
        .session()
        .selected_destination()
        .expect("destination selected")
        .token
}

/// The single route request issued so far.
pub fn single_route_request(controller: &mut TestController) -> RouteRequest {
    let mut requests = controller.take_route_requests();
    assert_eq!(requests.len(), 1, "expected exactly one route request");
    requests.remove(0)
}

pub fn straight_route(request: &RouteRequest, secs: f64) -> RouteResult {
    RouteResult {
        geometry: vec![request.from, request.to],
        expected_travel_secs: secs,
    }
}

pub fn deliver_route(controller: &mut TestController, token: DestinationToken, route: RouteResult) {
    controller.submit(FlowEvent::RouteFetchSucceeded(token, route));
    controller.process_pending();
}
