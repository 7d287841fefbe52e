//! LocationUpdated system: store the device fix; recenter while idle.

use bevy_ecs::prelude::{Res, ResMut};

use crate::config::FlowSettings;
use crate::events::{CurrentEvent, FlowEvent};
use crate::map::MapCommands;
use crate::session::{FlowPhase, TripSession};
use crate::systems::recenter_on_user;

pub fn location_updated_system(
    event: Res<CurrentEvent>,
    settings: Res<FlowSettings>,
    mut session: ResMut<TripSession>,
    mut map: ResMut<MapCommands>,
) {
    let FlowEvent::LocationUpdated(coordinate) = &event.0.event else {
        return;
    };
    session.user_location = Some(*coordinate);
    if session.phase() == FlowPhase::Idle {
        recenter_on_user(&session, &settings, &mut map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MapCommand, RegionSpan};
    use crate::test_helpers::{create_test_world, set_current_event, test_user_location};
    use bevy_ecs::prelude::{Schedule, World};

    fn run_location(world: &mut World) {
        set_current_event(world, FlowEvent::LocationUpdated(test_user_location()));
        let mut schedule = Schedule::default();
        schedule.add_systems(location_updated_system);
        schedule.run(world);
    }

    #[test]
    fn idle_location_update_recenters_map() {
        let mut world = create_test_world();
        run_location(&mut world);

        assert_eq!(
            world.resource::<TripSession>().user_location,
            Some(test_user_location())
        );
        assert_eq!(
            world.resource_mut::<MapCommands>().drain(),
            vec![MapCommand::SetRegion {
                center: test_user_location(),
                span: RegionSpan::square(0.05),
            }]
        );
    }

    #[test]
    fn location_update_while_searching_keeps_map_and_phase() {
        let mut world = create_test_world();
        world.resource_mut::<TripSession>().begin_search();
        run_location(&mut world);

        let session = world.resource::<TripSession>();
        assert_eq!(session.phase(), FlowPhase::Searching);
        assert_eq!(session.user_location, Some(test_user_location()));
        assert!(world.resource::<MapCommands>().is_empty());
    }
}
