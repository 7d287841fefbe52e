//! Device location collaborator.
//!
//! The flow needs a single fix per screen. [`LocationSubscription`] forwards
//! the first fix a source reports and then pauses the source.

use std::collections::VecDeque;

use tracing::info;

use crate::geo::Coordinate;

/// Push-style location source, polled by the driver.
pub trait LocationSource {
    /// Next fix, if the device has produced one since the last poll.
    fn next_fix(&mut self) -> Option<Coordinate>;
    /// Stop acquiring fixes.
    fn pause(&mut self);
}

/// Single-fix-then-pause wrapper around a [`LocationSource`].
#[derive(Debug)]
pub struct LocationSubscription<S: LocationSource> {
    source: S,
    delivered: bool,
}

impl<S: LocationSource> LocationSubscription<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            delivered: false,
        }
    }

    /// Returns the first fix exactly once; later polls return `None`.
    pub fn poll(&mut self) -> Option<Coordinate> {
        if self.delivered {
            return None;
        }
        let fix = self.source.next_fix()?;
        self.delivered = true;
        self.source.pause();
        info!(%fix, "first location fix received; pausing updates");
        Some(fix)
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

/// Replays a fixed list of fixes; used by the CLI and tests.
#[derive(Debug, Default)]
pub struct ScriptedLocationSource {
    fixes: VecDeque<Option<Coordinate>>,
    paused: bool,
}

impl ScriptedLocationSource {
    /// Each entry is one poll result; `None` models "no fix yet".
    pub fn new(fixes: impl IntoIterator<Item = Option<Coordinate>>) -> Self {
        Self {
            fixes: fixes.into_iter().collect(),
            paused: false,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl LocationSource for ScriptedLocationSource {
    fn next_fix(&mut self) -> Option<Coordinate> {
        if self.paused {
            return None;
        }
        self.fixes.pop_front().flatten()
    }

    fn pause(&mut self) {
        self.paused = true;
    }
}
