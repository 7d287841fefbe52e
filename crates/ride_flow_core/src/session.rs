//! Session state for one ride-request screen.
//!
//! [`TripSession`] is the single ECS resource the flow systems mutate. Its
//! mutators keep the phase invariants: a destination exists only in
//! `DestinationSelected`/`RouteReady`, and a route only in `RouteReady`.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::pricing::{RideTierId, TripQuote, TripTimes};
use crate::routing::RouteResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlowPhase {
    #[default]
    Idle,
    Searching,
    DestinationSelected,
    RouteReady,
}

impl FlowPhase {
    /// Phases in which the trip summary panel is shown.
    pub fn has_destination(self) -> bool {
        matches!(self, FlowPhase::DestinationSelected | FlowPhase::RouteReady)
    }
}

/// Ties a route result to the destination selection that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DestinationToken(pub u64);

/// Ties a place resolution to the suggestion pick that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolutionToken(pub u64);

/// A search suggestion from the place search collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub title: String,
    pub subtitle: String,
}

impl PlaceSuggestion {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedDestination {
    pub title: String,
    pub coordinate: Coordinate,
    pub token: DestinationToken,
}

/// Route fetch progress for the current destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteFetchStatus {
    #[default]
    NotRequested,
    InFlight,
    Failed,
    Completed,
}

/// Query text and the latest suggestions shown while searching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query_fragment: String,
    pub results: Vec<PlaceSuggestion>,
    /// Latest suggestion pick awaiting resolution.
    pub pending_resolution: Option<(ResolutionToken, PlaceSuggestion)>,
}

/// Icon of the floating map action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionButton {
    Menu,
    Back,
}

#[derive(Debug, Default, Resource)]
pub struct TripSession {
    phase: FlowPhase,
    pub user_location: Option<Coordinate>,
    destination: Option<SelectedDestination>,
    route: Option<RouteResult>,
    pub route_fetch: RouteFetchStatus,
    pub trip_times: Option<TripTimes>,
    pub quote: Option<TripQuote>,
    pub selected_tier: RideTierId,
    pub search: SearchState,
    next_destination_token: u64,
    next_resolution_token: u64,
}

impl TripSession {
    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    pub fn selected_destination(&self) -> Option<&SelectedDestination> {
        self.destination.as_ref()
    }

    pub fn route_result(&self) -> Option<&RouteResult> {
        self.route.as_ref()
    }

    pub fn action_button(&self) -> ActionButton {
        match self.phase {
            FlowPhase::Idle => ActionButton::Menu,
            _ => ActionButton::Back,
        }
    }

    /// True when `token` belongs to the destination currently awaiting a route.
    pub fn is_current_destination(&self, token: DestinationToken) -> bool {
        self.phase == FlowPhase::DestinationSelected
            && self.destination.as_ref().map(|d| d.token) == Some(token)
    }

    pub(crate) fn begin_search(&mut self) {
        self.phase = FlowPhase::Searching;
        self.search = SearchState::default();
    }

    pub(crate) fn mint_resolution_token(&mut self) -> ResolutionToken {
        self.next_resolution_token += 1;
        ResolutionToken(self.next_resolution_token)
    }

    /// Enter `DestinationSelected` with a fresh token; any previous route is dropped.
    pub(crate) fn select_destination(
        &mut self,
        title: String,
        coordinate: Coordinate,
    ) -> DestinationToken {
        self.next_destination_token += 1;
        let token = DestinationToken(self.next_destination_token);
        self.destination = Some(SelectedDestination {
            title,
            coordinate,
            token,
        });
        self.route = None;
        self.trip_times = None;
        self.route_fetch = RouteFetchStatus::NotRequested;
        self.search.pending_resolution = None;
        self.phase = FlowPhase::DestinationSelected;
        token
    }

    pub(crate) fn apply_route(&mut self, route: RouteResult, times: Option<TripTimes>) {
        self.route = Some(route);
        self.trip_times = times;
        self.route_fetch = RouteFetchStatus::Completed;
        self.phase = FlowPhase::RouteReady;
    }

    /// Return to `Idle`, dropping destination, route and derived data.
    /// The user location survives.
    pub(crate) fn reset_to_idle(&mut self) {
        self.phase = FlowPhase::Idle;
        self.destination = None;
        self.route = None;
        self.trip_times = None;
        self.quote = None;
        self.route_fetch = RouteFetchStatus::NotRequested;
        self.selected_tier = RideTierId::default();
        self.search = SearchState::default();
    }
}
