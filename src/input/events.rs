use crate::core::geo::{Point, Size};
use crate::data::properties::GeoFeatureProperties;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Pointer and widget input forwarded by the host UI.
///
/// Positions are in widget coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Button press; `click_count > 1` marks a double click
    MouseDown {
        position: Point,
        button: MouseButton,
        click_count: u32,
    },
    /// Button release, possibly outside the widget
    MouseUp { position: Point, button: MouseButton },
    /// Pointer move inside the widget
    MouseMove { position: Point },
    /// Pointer left the widget
    MouseLeave,
    /// Wheel notch; positive delta zooms in
    Scroll { delta: f64, position: Point },
    /// Widget resize
    Resize { size: Size },
}

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl InputEvent {
    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::MouseDown { position, .. }
            | InputEvent::MouseUp { position, .. }
            | InputEvent::MouseMove { position }
            | InputEvent::Scroll { position, .. } => Some(*position),
            InputEvent::MouseLeave | InputEvent::Resize { .. } => None,
        }
    }

    pub fn is_pointer_event(&self) -> bool {
        !matches!(self, InputEvent::Resize { .. })
    }

    pub fn is_double_click(&self) -> bool {
        matches!(self, InputEvent::MouseDown { click_count, .. } if *click_count > 1)
    }
}

/// Notifications emitted by the map
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Left double click on a region
    RegionDoubleClicked {
        properties: Arc<GeoFeatureProperties>,
    },
    /// Right double click anywhere on the map
    MapRightDoubleClicked,
    /// Pointer entered a region
    RegionEntered {
        properties: Arc<GeoFeatureProperties>,
    },
    /// Pointer left a region
    RegionLeft {
        properties: Arc<GeoFeatureProperties>,
    },
    /// Canvas scale changed
    ScaleChanged { scale: f64 },
    /// A draw pass finished
    Redrawn { paths: usize },
}

impl MapEvent {
    /// Listener key of this event
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::RegionDoubleClicked { .. } => "regiondoubleclick",
            MapEvent::MapRightDoubleClicked => "maprightdoubleclick",
            MapEvent::RegionEntered { .. } => "regionenter",
            MapEvent::RegionLeft { .. } => "regionleave",
            MapEvent::ScaleChanged { .. } => "scalechange",
            MapEvent::Redrawn { .. } => "redraw",
        }
    }
}
