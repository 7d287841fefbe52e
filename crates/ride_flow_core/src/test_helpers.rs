//! Test helpers for common test setup and utilities.
//!
//! Shared fixtures so every test reuses the same geography and clock.

use bevy_ecs::prelude::World;
use chrono::{DateTime, TimeZone, Utc};

use crate::clock::{FixedTimeSource, SessionClock};
use crate::config::FlowSettings;
use crate::events::{CurrentEvent, FlowEvent, FlowInbox};
use crate::geo::Coordinate;
use crate::pricing::RideTierCatalog;
use crate::runner::initialize_flow;

/// Lower Manhattan.
pub fn test_user_location() -> Coordinate {
    Coordinate {
        latitude: 40.7128,
        longitude: -74.0060,
    }
}

/// Williamsburg, about 6.3 km from [`test_user_location`].
pub fn test_destination() -> Coordinate {
    Coordinate {
        latitude: 40.7306,
        longitude: -73.9352,
    }
}

/// Midtown, used as a second, distinct destination.
pub fn test_other_destination() -> Coordinate {
    Coordinate {
        latitude: 40.7484,
        longitude: -73.9857,
    }
}

/// Fixed "now" for pickup/dropoff estimates: 2024-05-23 14:05:00 UTC.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 23, 14, 5, 0)
        .single()
        .unwrap_or_default()
}

/// Create a world with every flow resource and a fixed clock.
pub fn create_test_world() -> World {
    let mut world = World::new();
    initialize_flow(
        &mut world,
        FlowSettings::default(),
        RideTierCatalog::default(),
        SessionClock(Box::new(FixedTimeSource(test_now()))),
    );
    world
}

/// Queue `event` and make it the [`CurrentEvent`], as the runner would.
pub fn set_current_event(world: &mut World, event: FlowEvent) {
    world.resource_mut::<FlowInbox>().push(event);
    if let Some(inbound) = world.resource_mut::<FlowInbox>().pop_next() {
        world.insert_resource(CurrentEvent(inbound));
    }
}
