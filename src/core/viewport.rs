use crate::animation::transitions::Transition;
use crate::core::config::Margin;
use crate::core::constants::{MIN_SCALE, WHEEL_SCALE_STEP};
use crate::core::geo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Accumulated wheel steps may drift just above the floor
const SCALE_EPSILON: f64 = 1e-9;

/// Zoom and pan of the map canvas.
///
/// `pan` is measured from the rest offset, the position that centers the
/// content inside the viewport. At `scale == 1.0` the pan is always zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub scale: f64,
    pub pan: Point,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: MIN_SCALE,
            pan: Point::new(0.0, 0.0),
        }
    }
}

impl ViewportState {
    pub fn is_at_rest(&self) -> bool {
        self.scale <= MIN_SCALE && self.pan == Point::new(0.0, 0.0)
    }
}

/// Gesture state machine over [`ViewportState`].
///
/// Every operation applies its final value at once and returns the
/// transitions a presenter may animate.
#[derive(Debug, Clone)]
pub struct ViewportController {
    state: ViewportState,
    viewport: Size,
    content: Size,
    margin: Margin,
    enabled: bool,
    duration: Duration,
    drag_origin: Option<Point>,
}

impl ViewportController {
    pub fn new(margin: Margin, enabled: bool, duration: Duration) -> Self {
        Self {
            state: ViewportState::default(),
            viewport: Size::default(),
            content: Size::default(),
            margin,
            enabled,
            duration,
            drag_origin: None,
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn content(&self) -> Size {
        self.content
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.drag_origin = None;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn set_margin(&mut self, margin: Margin) {
        self.margin = margin;
    }

    /// Records the geometry produced by a draw pass without moving the content
    pub fn set_geometry(&mut self, viewport: Size, content: Size) {
        self.viewport = viewport;
        self.content = content;
    }

    /// Canvas offset that centers the content in the viewport
    pub fn rest_offset(&self) -> Point {
        Point::new(
            (self.viewport.width - self.margin.horizontal() - self.content.width) / 2.0,
            (self.viewport.height - self.margin.vertical() - self.content.height) / 2.0,
        )
    }

    /// Absolute canvas offset: rest offset plus pan
    pub fn canvas_offset(&self) -> Point {
        self.rest_offset().add(&self.state.pan)
    }

    /// Back to scale 1, centered. Used when a new source is assigned.
    pub fn reset(&mut self) {
        self.state = ViewportState::default();
        self.drag_origin = None;
    }

    /// One wheel notch at `cursor`, given in untransformed canvas space.
    ///
    /// Applied instantly. The pan only follows the cursor when the map was
    /// already zoomed in before this notch.
    pub fn wheel(&mut self, delta: f64, cursor: Point) -> Vec<Transition> {
        if !self.enabled || delta == 0.0 {
            return Vec::new();
        }
        let before = self.state;
        let (step, ratio) = if delta > 0.0 {
            (WHEEL_SCALE_STEP, 1.0 + WHEEL_SCALE_STEP)
        } else {
            (-WHEEL_SCALE_STEP, 1.0 - WHEEL_SCALE_STEP)
        };
        self.state.scale = (before.scale + step).max(MIN_SCALE);
        if before.scale > MIN_SCALE {
            self.state.pan = self.state.pan.subtract(&zoom_shift(cursor, ratio));
        }
        self.snap_at_rest();
        self.transitions_from(before, cursor, Duration::ZERO)
    }

    /// Programmatic scale assignment, centered on the content center and animated
    pub fn set_scale(&mut self, scale: f64) -> Vec<Transition> {
        if !scale.is_finite() {
            log::warn!("ignoring non-finite scale {}", scale);
            return Vec::new();
        }
        let before = self.state;
        let scale = scale.max(MIN_SCALE);
        if scale == before.scale {
            return Vec::new();
        }
        let ratio = 1.0 + (scale - before.scale);
        let origin = self.content.center();
        self.state.scale = scale;
        if scale > MIN_SCALE {
            self.state.pan = self.state.pan.subtract(&zoom_shift(origin, ratio));
        }
        self.snap_at_rest();
        self.transitions_from(before, origin, self.duration)
    }

    /// Press of the primary button; double clicks never start a drag
    pub fn drag_start(&mut self, position: Point, click_count: u32) -> bool {
        if !self.enabled || click_count > 1 {
            return false;
        }
        self.drag_origin = Some(position);
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    /// Release of the primary button, anywhere in the host window
    pub fn drag_end(&mut self, position: Point) -> Vec<Transition> {
        let origin = match self.drag_origin.take() {
            Some(origin) if self.enabled => origin,
            _ => return Vec::new(),
        };
        let before = self.state;
        let delta = origin.subtract(&position);

        if self.state.scale <= MIN_SCALE {
            self.state.pan = Point::new(0.0, 0.0);
        } else {
            let rest = self.rest_offset();
            let current = self.canvas_offset();
            let left = clamp_axis(
                current.x - delta.x,
                self.viewport.width,
                self.content.width,
                self.margin.horizontal(),
            );
            let top = clamp_axis(
                current.y - delta.y,
                self.viewport.height,
                self.content.height,
                self.margin.vertical(),
            );
            self.state.pan = Point::new(left - rest.x, top - rest.y);
        }
        self.transitions_from(before, Point::new(0.0, 0.0), self.duration)
    }

    /// New widget size with the content size of the redrawn layout.
    ///
    /// At scale 1 the content is recentered; otherwise the canvas offset is
    /// stretched by the size ratio.
    pub fn resize(&mut self, viewport: Size, content: Size) {
        let old_viewport = self.viewport;
        let old_offset = self.canvas_offset();
        self.viewport = viewport;
        self.content = content;

        if self.state.scale <= MIN_SCALE || !old_viewport.is_drawable() {
            self.state.pan = Point::new(0.0, 0.0);
            return;
        }
        let stretched = Point::new(
            old_offset.x * viewport.width / old_viewport.width,
            old_offset.y * viewport.height / old_viewport.height,
        );
        self.state.pan = stretched.subtract(&self.rest_offset());
    }

    fn snap_at_rest(&mut self) {
        if self.state.scale <= MIN_SCALE + SCALE_EPSILON {
            self.state.scale = MIN_SCALE;
            self.state.pan = Point::new(0.0, 0.0);
        }
    }

    fn transitions_from(&self, before: ViewportState, origin: Point, duration: Duration) -> Vec<Transition> {
        let mut transitions = Vec::new();
        if before.scale != self.state.scale {
            transitions.push(Transition::scale(before.scale, self.state.scale, origin, duration));
        }
        if before.pan != self.state.pan {
            let rest = self.rest_offset();
            transitions.push(Transition::pan(
                rest.add(&before.pan),
                rest.add(&self.state.pan),
                duration,
            ));
        }
        transitions
    }
}

/// Offset that keeps `anchor` fixed while scaling by `ratio`
fn zoom_shift(anchor: Point, ratio: f64) -> Point {
    Point::new(anchor.x * ratio - anchor.x, anchor.y * ratio - anchor.y)
}

/// Keeps a dragged canvas offset from leaving the viewport on the far side
fn clamp_axis(value: f64, viewport: f64, content: f64, margin_total: f64) -> f64 {
    if value >= 0.0 && value > viewport - content {
        viewport - margin_total - content
    } else {
        value
    }
}
