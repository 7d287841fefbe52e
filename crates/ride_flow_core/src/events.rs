//! Inbound events and the arrival-ordered inbox.
//!
//! Every user action and collaborator result enters the flow as a
//! [`FlowEvent`]. The runner pops events in arrival order and exposes the one
//! being processed as [`CurrentEvent`].

use std::collections::VecDeque;

use bevy_ecs::prelude::Resource;

use crate::geo::Coordinate;
use crate::pricing::RideTierId;
use crate::routing::RouteResult;
use crate::session::{DestinationToken, PlaceSuggestion, ResolutionToken};

#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    /// Tap on the "Where to?" affordance.
    TapSearch,
    /// Edit of the destination query text.
    UpdateQuery(String),
    SelectSuggestion(PlaceSuggestion),
    /// Tap on the map action button while it shows the back arrow.
    Back,
    SelectRideTier(RideTierId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    UserAction(UserAction),
    LocationUpdated(Coordinate),
    SuggestionsUpdated(Vec<PlaceSuggestion>),
    PlaceResolved {
        token: ResolutionToken,
        title: String,
        coordinate: Coordinate,
    },
    PlaceResolutionFailed {
        token: ResolutionToken,
        reason: String,
    },
    RouteFetchSucceeded(DestinationToken, RouteResult),
    RouteFetchFailed(DestinationToken, String),
}

/// Discriminant used by run conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    UserAction,
    LocationUpdated,
    SuggestionsUpdated,
    PlaceResolved,
    PlaceResolutionFailed,
    RouteFetchSucceeded,
    RouteFetchFailed,
}

impl FlowEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            FlowEvent::UserAction(_) => EventKind::UserAction,
            FlowEvent::LocationUpdated(_) => EventKind::LocationUpdated,
            FlowEvent::SuggestionsUpdated(_) => EventKind::SuggestionsUpdated,
            FlowEvent::PlaceResolved { .. } => EventKind::PlaceResolved,
            FlowEvent::PlaceResolutionFailed { .. } => EventKind::PlaceResolutionFailed,
            FlowEvent::RouteFetchSucceeded(..) => EventKind::RouteFetchSucceeded,
            FlowEvent::RouteFetchFailed(..) => EventKind::RouteFetchFailed,
        }
    }
}

/// An event stamped with its arrival sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub seq: u64,
    pub event: FlowEvent,
}

/// Event currently being processed by the schedule.
#[derive(Debug, Clone, Resource)]
pub struct CurrentEvent(pub InboundEvent);

impl CurrentEvent {
    pub fn kind(&self) -> EventKind {
        self.0.event.kind()
    }
}

/// FIFO of events not yet processed.
#[derive(Debug, Default, Resource)]
pub struct FlowInbox {
    next_seq: u64,
    events: VecDeque<InboundEvent>,
}

impl FlowInbox {
    pub fn push(&mut self, event: FlowEvent) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push_back(InboundEvent { seq, event });
        seq
    }

    pub fn pop_next(&mut self) -> Option<InboundEvent> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbox_pops_events_in_arrival_order() {
        let mut inbox = FlowInbox::default();
        inbox.push(FlowEvent::UserAction(UserAction::TapSearch));
        inbox.push(FlowEvent::UserAction(UserAction::Back));
        inbox.push(FlowEvent::SuggestionsUpdated(Vec::new()));

        let first = inbox.pop_next().expect("first event");
        assert_eq!(first.seq, 0);
        assert_eq!(first.event, FlowEvent::UserAction(UserAction::TapSearch));

        let second = inbox.pop_next().expect("second event");
        assert_eq!(second.seq, 1);
        assert_eq!(second.event.kind(), EventKind::UserAction);

        let third = inbox.pop_next().expect("third event");
        assert_eq!(third.event.kind(), EventKind::SuggestionsUpdated);

        assert!(inbox.pop_next().is_none());
        assert!(inbox.is_empty());
    }
}
