//! SuggestionsUpdated system: keep the latest search results while searching.

use bevy_ecs::prelude::{Res, ResMut};
use tracing::debug;

use crate::events::{CurrentEvent, FlowEvent};
use crate::session::{FlowPhase, TripSession};

pub fn suggestions_updated_system(event: Res<CurrentEvent>, mut session: ResMut<TripSession>) {
    let FlowEvent::SuggestionsUpdated(results) = &event.0.event else {
        return;
    };
    if session.phase() != FlowPhase::Searching {
        debug!(count = results.len(), "dropping suggestions outside search");
        return;
    }
    session.search.results = results.clone();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PlaceSuggestion;
    use crate::test_helpers::{create_test_world, set_current_event};
    use bevy_ecs::prelude::Schedule;

    #[test]
    fn results_are_kept_only_while_searching() {
        let mut world = create_test_world();
        let results = vec![
            PlaceSuggestion::new("Starbucks", "123 Main St"),
            PlaceSuggestion::new("Starbucks Reserve", "61 9th Ave"),
        ];
        let mut schedule = Schedule::default();
        schedule.add_systems(suggestions_updated_system);

        set_current_event(&mut world, FlowEvent::SuggestionsUpdated(results.clone()));
        schedule.run(&mut world);
        assert!(world.resource::<TripSession>().search.results.is_empty());

        world.resource_mut::<TripSession>().begin_search();
        set_current_event(&mut world, FlowEvent::SuggestionsUpdated(results.clone()));
        schedule.run(&mut world);
        assert_eq!(world.resource::<TripSession>().search.results, results);
    }
}
