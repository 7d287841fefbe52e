//! Requests to asynchronous collaborators.
//!
//! Systems never call collaborators directly. They record a request here;
//! whoever owns the collaborators executes it and feeds the result back as a
//! [`crate::events::FlowEvent`] carrying the same token.

use bevy_ecs::prelude::Resource;

use crate::geo::Coordinate;
use crate::session::{DestinationToken, PlaceSuggestion, ResolutionToken};

#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub token: DestinationToken,
    pub from: Coordinate,
    pub to: Coordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionRequest {
    pub token: ResolutionToken,
    pub suggestion: PlaceSuggestion,
}

#[derive(Debug, Default, Resource)]
pub struct FlowOutbox {
    pub route_requests: Vec<RouteRequest>,
    pub resolution_requests: Vec<ResolutionRequest>,
    /// Latest query fragments to send to the place search collaborator.
    pub suggestion_queries: Vec<String>,
}

impl FlowOutbox {
    pub fn is_empty(&self) -> bool {
        self.route_requests.is_empty()
            && self.resolution_requests.is_empty()
            && self.suggestion_queries.is_empty()
    }

    pub fn take_route_requests(&mut self) -> Vec<RouteRequest> {
        std::mem::take(&mut self.route_requests)
    }

    pub fn take_resolution_requests(&mut self) -> Vec<ResolutionRequest> {
        std::mem::take(&mut self.resolution_requests)
    }

    pub fn take_suggestion_queries(&mut self) -> Vec<String> {
        std::mem::take(&mut self.suggestion_queries)
    }
}
