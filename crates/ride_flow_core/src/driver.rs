//! FlowDriver: connects the controller's outbox to real collaborators.
//!
//! Collaborator calls are executed synchronously and their results fed back
//! through the inbox, so the controller sees exactly the event sequence an
//! asynchronous host would deliver.

use tracing::{debug, warn};

use crate::controller::MapFlowController;
use crate::events::{FlowEvent, UserAction};
use crate::location::{LocationSource, LocationSubscription};
use crate::map::MapSurface;
use crate::routing::GeoRouteProvider;
use crate::search::PlaceSearch;

/// Upper bound on pump rounds; each round needs at least one new event.
const MAX_PUMP_ROUNDS: usize = 64;

pub struct FlowDriver<M: MapSurface, L: LocationSource> {
    controller: MapFlowController<M>,
    routes: Box<dyn GeoRouteProvider>,
    places: Box<dyn PlaceSearch>,
    location: LocationSubscription<L>,
}

impl<M: MapSurface, L: LocationSource> FlowDriver<M, L> {
    pub fn new(
        controller: MapFlowController<M>,
        routes: Box<dyn GeoRouteProvider>,
        places: Box<dyn PlaceSearch>,
        location: L,
    ) -> Self {
        Self {
            controller,
            routes,
            places,
            location: LocationSubscription::new(location),
        }
    }

    pub fn controller(&self) -> &MapFlowController<M> {
        &self.controller
    }

    /// Queue a user action and run the flow until it settles.
    pub fn act(&mut self, action: UserAction) -> usize {
        self.controller.dispatch(action);
        self.pump()
    }

    /// Run events and collaborator requests until nothing is left to do.
    /// Returns the number of events processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        for _ in 0..MAX_PUMP_ROUNDS {
            if let Some(fix) = self.location.poll() {
                self.controller.submit(FlowEvent::LocationUpdated(fix));
            }
            processed += self.controller.process_pending();
            if self.serve_requests() == 0 {
                return processed;
            }
        }
        warn!(rounds = MAX_PUMP_ROUNDS, "flow did not settle");
        processed
    }

    /// Execute outbound requests; returns how many result events were queued.
    fn serve_requests(&mut self) -> usize {
        let mut queued = 0;

        // Only the latest query matters once the host has debounced input.
        if let Some(query) = self.controller.take_suggestion_queries().pop() {
            let results = self.places.suggestions(&query);
            debug!(query = %query, count = results.len(), "suggestions updated");
            self.controller.submit(FlowEvent::SuggestionsUpdated(results));
            queued += 1;
        }

        for request in self.controller.take_resolution_requests() {
            let event = match self.places.resolve(&request.suggestion) {
                Ok(coordinate) => FlowEvent::PlaceResolved {
                    token: request.token,
                    title: request.suggestion.title.clone(),
                    coordinate,
                },
                Err(err) => FlowEvent::PlaceResolutionFailed {
                    token: request.token,
                    reason: err.to_string(),
                },
            };
            self.controller.submit(event);
            queued += 1;
        }

        for request in self.controller.take_route_requests() {
            let event = match self.routes.route(request.from, request.to) {
                Ok(route) => FlowEvent::RouteFetchSucceeded(request.token, route),
                Err(err) => FlowEvent::RouteFetchFailed(request.token, err.to_string()),
            };
            self.controller.submit(event);
            queued += 1;
        }

        queued
    }
}
