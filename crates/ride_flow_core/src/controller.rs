//! MapFlowController: owns the flow world and forwards map commands.
//!
//! The controller is the single writer for the session. Callers submit
//! [`FlowEvent`]s, call [`MapFlowController::process_pending`], then pick up
//! outbound collaborator requests with the `take_*` methods.

use bevy_ecs::prelude::{Schedule, World};

use crate::clock::{SessionClock, SystemTimeSource, TimeSource};
use crate::config::FlowConfig;
use crate::events::{FlowEvent, FlowInbox, UserAction};
use crate::map::{MapCommands, MapSurface};
use crate::outbox::{FlowOutbox, ResolutionRequest, RouteRequest};
use crate::pricing::{RideTierCatalog, RideTierId, TripQuote};
use crate::runner::{flow_schedule, initialize_flow, run_next_event};
use crate::session::{FlowPhase, TripSession};
use crate::telemetry::FlowTelemetry;

pub struct MapFlowController<M: MapSurface> {
    world: World,
    schedule: Schedule,
    map: M,
}

impl<M: MapSurface> MapFlowController<M> {
    pub fn new(config: &FlowConfig, map: M) -> Self {
        Self::with_time_source(config, map, Box::new(SystemTimeSource))
    }

    pub fn with_time_source(config: &FlowConfig, map: M, time: Box<dyn TimeSource>) -> Self {
        let mut world = World::new();
        initialize_flow(
            &mut world,
            config.settings(),
            config.catalog(),
            SessionClock(time),
        );
        Self {
            world,
            schedule: flow_schedule(),
            map,
        }
    }

    /// Queue an event; returns its arrival sequence number.
    pub fn submit(&mut self, event: FlowEvent) -> u64 {
        self.world.resource_mut::<FlowInbox>().push(event)
    }

    pub fn dispatch(&mut self, action: UserAction) -> u64 {
        self.submit(FlowEvent::UserAction(action))
    }

    /// Process every queued event in arrival order. Returns the number processed.
    pub fn process_pending(&mut self) -> usize {
        let mut steps = 0;
        while run_next_event(&mut self.world, &mut self.schedule).is_some() {
            steps += 1;
            self.flush_map_commands();
        }
        steps
    }

    fn flush_map_commands(&mut self) {
        let commands = self.world.resource_mut::<MapCommands>().drain();
        for command in commands {
            self.map.apply(command);
        }
    }

    pub fn take_route_requests(&mut self) -> Vec<RouteRequest> {
        self.world.resource_mut::<FlowOutbox>().take_route_requests()
    }

    pub fn take_resolution_requests(&mut self) -> Vec<ResolutionRequest> {
        self.world
            .resource_mut::<FlowOutbox>()
            .take_resolution_requests()
    }

    pub fn take_suggestion_queries(&mut self) -> Vec<String> {
        self.world
            .resource_mut::<FlowOutbox>()
            .take_suggestion_queries()
    }

    /// True while events or outbound requests are waiting.
    pub fn has_pending_work(&self) -> bool {
        !self.world.resource::<FlowInbox>().is_empty()
            || !self.world.resource::<FlowOutbox>().is_empty()
    }

    pub fn session(&self) -> &TripSession {
        self.world.resource::<TripSession>()
    }

    pub fn phase(&self) -> FlowPhase {
        self.session().phase()
    }

    pub fn quote(&self) -> Option<&TripQuote> {
        self.session().quote.as_ref()
    }

    /// Price for `tier`, or `None` while the quote is unavailable.
    pub fn price_for(&self, tier: RideTierId) -> Option<f64> {
        self.quote().and_then(|q| q.price_for(tier))
    }

    pub fn catalog(&self) -> &RideTierCatalog {
        self.world.resource::<RideTierCatalog>()
    }

    pub fn telemetry(&self) -> &FlowTelemetry {
        self.world.resource::<FlowTelemetry>()
    }

    pub fn map_surface(&self) -> &M {
        &self.map
    }
}
