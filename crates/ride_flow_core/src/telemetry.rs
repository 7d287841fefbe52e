//! Telemetry: phase transitions and failure counters for the session.

use bevy_ecs::prelude::Resource;
use tracing::info;

use crate::session::FlowPhase;

/// One phase change, stamped with the sequence number of the event that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub event_seq: u64,
    pub from: FlowPhase,
    pub to: FlowPhase,
}

#[derive(Debug, Default, Resource)]
pub struct FlowTelemetry {
    pub transitions: Vec<PhaseTransition>,
    pub route_requests_issued: u32,
    /// Route results dropped because their destination was superseded.
    pub stale_route_results: u32,
    pub failed_route_fetches: u32,
    pub stale_resolutions: u32,
    pub failed_resolutions: u32,
}

impl FlowTelemetry {
    pub fn record_transition(&mut self, event_seq: u64, from: FlowPhase, to: FlowPhase) {
        if from == to {
            return;
        }
        info!(?from, ?to, event_seq, "phase transition");
        self.transitions.push(PhaseTransition {
            event_seq,
            from,
            to,
        });
    }

    /// Phases visited, starting with the first `from`.
    pub fn phase_path(&self) -> Vec<FlowPhase> {
        let mut path: Vec<FlowPhase> =
            self.transitions.first().map(|t| t.from).into_iter().collect();
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_self_transitions() {
        let mut telemetry = FlowTelemetry::default();
        telemetry.record_transition(0, FlowPhase::Idle, FlowPhase::Idle);
        assert!(telemetry.transitions.is_empty());
        assert!(telemetry.phase_path().is_empty());
    }

    #[test]
    fn phase_path_lists_visited_phases() {
        let mut telemetry = FlowTelemetry::default();
        telemetry.record_transition(0, FlowPhase::Idle, FlowPhase::Searching);
        telemetry.record_transition(2, FlowPhase::Searching, FlowPhase::DestinationSelected);
        assert_eq!(
            telemetry.phase_path(),
            vec![
                FlowPhase::Idle,
                FlowPhase::Searching,
                FlowPhase::DestinationSelected
            ]
        );
    }
}
