//! Map rendering surface: commands emitted by the flow.
//!
//! Systems push [`MapCommand`]s into the [`MapCommands`] resource; the
//! controller drains them to a [`MapSurface`] after every step. Commands are
//! fire-and-forget; nothing is read back from the surface.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::geo::{Coordinate, GeoBounds};

/// Viewport padding in screen points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgePadding {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Default for EdgePadding {
    /// Bottom space is reserved for the trip summary panel.
    fn default() -> Self {
        Self {
            top: 64.0,
            left: 32.0,
            bottom: 500.0,
            right: 32.0,
        }
    }
}

/// Region span in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionSpan {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl RegionSpan {
    pub fn square(degrees: f64) -> Self {
        Self {
            latitude_delta: degrees,
            longitude_delta: degrees,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    SetRegion { center: Coordinate, span: RegionSpan },
    AddAnnotation(Coordinate),
    ClearAnnotations,
    AddRouteOverlay(Vec<Coordinate>),
    ClearOverlays,
    FitViewport { bounds: GeoBounds, padding: EdgePadding },
}

/// Pending map commands produced during the current step.
#[derive(Debug, Default, Resource)]
pub struct MapCommands {
    pending: Vec<MapCommand>,
}

impl MapCommands {
    pub fn push(&mut self, command: MapCommand) {
        self.pending.push(command);
    }

    /// Clear annotations, then add one at `coordinate`.
    pub fn place_annotation(&mut self, coordinate: Coordinate) {
        self.push(MapCommand::ClearAnnotations);
        self.push(MapCommand::AddAnnotation(coordinate));
    }

    pub fn clear_all(&mut self) {
        self.push(MapCommand::ClearAnnotations);
        self.push(MapCommand::ClearOverlays);
    }

    pub fn drain(&mut self) -> Vec<MapCommand> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Consumer of map commands (the rendering layer).
pub trait MapSurface {
    fn apply(&mut self, command: MapCommand);
}

/// Keeps every command and tracks what would be visible on screen.
#[derive(Debug, Default)]
pub struct RecordingMapSurface {
    pub commands: Vec<MapCommand>,
    annotations: Vec<Coordinate>,
    overlays: Vec<Vec<Coordinate>>,
    region: Option<(Coordinate, RegionSpan)>,
    viewport: Option<(GeoBounds, EdgePadding)>,
}

impl RecordingMapSurface {
    pub fn annotations(&self) -> &[Coordinate] {
        &self.annotations
    }

    pub fn overlays(&self) -> &[Vec<Coordinate>] {
        &self.overlays
    }

    pub fn region(&self) -> Option<(Coordinate, RegionSpan)> {
        self.region
    }

    pub fn viewport(&self) -> Option<(GeoBounds, EdgePadding)> {
        self.viewport
    }
}

impl MapSurface for RecordingMapSurface {
    fn apply(&mut self, command: MapCommand) {
        match &command {
            MapCommand::SetRegion { center, span } => {
                self.region = Some((*center, *span));
                self.viewport = None;
            }
            MapCommand::AddAnnotation(coordinate) => self.annotations.push(*coordinate),
            MapCommand::ClearAnnotations => self.annotations.clear(),
            MapCommand::AddRouteOverlay(geometry) => self.overlays.push(geometry.clone()),
            MapCommand::ClearOverlays => self.overlays.clear(),
            MapCommand::FitViewport { bounds, padding } => {
                self.viewport = Some((*bounds, *padding));
            }
        }
        self.commands.push(command);
    }
}

impl<S: MapSurface + ?Sized> MapSurface for Box<S> {
    fn apply(&mut self, command: MapCommand) {
        (**self).apply(command);
    }
}

/// Logs each command; used by the CLI in place of a real map.
#[derive(Debug, Default)]
pub struct TracingMapSurface;

impl MapSurface for TracingMapSurface {
    fn apply(&mut self, command: MapCommand) {
        match command {
            MapCommand::SetRegion { center, span } => {
                info!(%center, span = span.latitude_delta, "map: set region");
            }
            MapCommand::AddAnnotation(coordinate) => info!(%coordinate, "map: add annotation"),
            MapCommand::ClearAnnotations => info!("map: clear annotations"),
            MapCommand::AddRouteOverlay(geometry) => {
                info!(points = geometry.len(), "map: add route overlay");
            }
            MapCommand::ClearOverlays => info!("map: clear overlays"),
            MapCommand::FitViewport { bounds, padding } => {
                info!(center = %bounds.center(), bottom = padding.bottom, "map: fit viewport");
            }
        }
    }
}
