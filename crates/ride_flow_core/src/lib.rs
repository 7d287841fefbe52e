pub mod clock;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod events;
pub mod format;
pub mod geo;
pub mod location;
pub mod map;
pub mod outbox;
pub mod pricing;
pub mod routing;
pub mod runner;
pub mod search;
pub mod session;
pub mod systems;
pub mod telemetry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
