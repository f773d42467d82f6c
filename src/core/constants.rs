//! Core constants for projection, layout and interaction.

use std::f64::consts::PI;

/// WGS84 equatorial radius in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the circumference of the earth, the Mercator x extent at 180°.
pub const ORIGIN_SHIFT: f64 = PI * EARTH_RADIUS;

/// Scale added or removed per wheel notch.
pub const WHEEL_SCALE_STEP: f64 = 0.05;

/// Scale is never allowed below this value.
pub const MIN_SCALE: f64 = 1.0;

/// Fraction of the main content box the inset panel occupies by default.
pub const DEFAULT_INSET_ZOOM: f64 = 0.03;

/// Inset frame margin, in multiples of the inset's own pixel scale.
pub const INSET_MARGIN_FACTOR: f64 = 1.2;

/// Inset region stroke relative to the main shape stroke.
pub const INSET_STROKE_FACTOR: f64 = 1.2;

/// Plain (non outlined) inset frame stroke relative to the main shape stroke.
pub const INSET_FRAME_STROKE_FACTOR: f64 = 1.3;

/// Extra stroke width applied to a hovered path.
pub const HOVER_STROKE_BOOST: f64 = 1.5;

/// Opacity of a hovered path.
pub const HOVER_OPACITY: f64 = 0.7;

/// Gap between the cursor and the tooltip, in pixels.
pub const TOOLTIP_OFFSET: f64 = 5.0;

/// Duration of the fade-in that accompanies every draw pass.
pub const FADE_IN_MS: u64 = 500;
