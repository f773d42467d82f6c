use serde::{Deserialize, Serialize};

/// Serializable RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses `#rrggbb` or `#aarrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let byte = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::GRAY
    }
}

/// Paint parameters for one rendered path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    /// `None` draws the outline only
    pub fill: Option<Color>,
    pub stroke: Color,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl PathStyle {
    pub fn filled(fill: Color, stroke: Color, stroke_width: f64) -> Self {
        Self {
            fill: Some(fill),
            stroke,
            stroke_width,
            opacity: 1.0,
        }
    }

    pub fn stroked(stroke: Color, stroke_width: f64) -> Self {
        Self {
            fill: None,
            stroke,
            stroke_width,
            opacity: 1.0,
        }
    }
}

/// Drop shadow under the whole map canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropShadow {
    pub color: Color,
    pub blur_radius: f64,
    pub opacity: f64,
    pub depth: f64,
    /// Degrees, 270 casts straight down
    pub direction: f64,
}

impl DropShadow {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            blur_radius: 10.0,
            opacity: 0.5,
            depth: 10.0,
            direction: 270.0,
        }
    }

    /// Offset of the shadow relative to the canvas, y pointing down
    pub fn offset(&self) -> (f64, f64) {
        let radians = self.direction.to_radians();
        (self.depth * radians.cos(), -self.depth * radians.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(Color::from_hex("#ff0000"), Some(Color::RED));
        assert_eq!(
            Color::from_hex("#80112233"),
            Some(Color::new(0x11, 0x22, 0x33, 0x80))
        );
        assert_eq!(Color::from_hex("#12"), None);
        assert_eq!(Color::from_hex("#zz0000"), None);
    }

    #[test]
    fn test_shadow_points_down() {
        let (dx, dy) = DropShadow::new(Color::BLACK).offset();
        assert!(dx.abs() < 1e-9);
        assert!((dy - 10.0).abs() < 1e-9);
    }
}
