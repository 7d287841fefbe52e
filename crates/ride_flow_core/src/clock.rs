//! Wall-clock access for pickup/dropoff estimates.

use bevy_ecs::prelude::Resource;
use chrono::{DateTime, Utc};

pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(pub DateTime<Utc>);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// ECS resource wrapping the session's time source.
#[derive(Resource)]
pub struct SessionClock(pub Box<dyn TimeSource>);

impl Default for SessionClock {
    fn default() -> Self {
        Self(Box::new(SystemTimeSource))
    }
}

impl SessionClock {
    pub fn now(&self) -> DateTime<Utc> {
        self.0.now()
    }
}
