use crate::core::constants::ORIGIN_SHIFT;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Maps a WGS84 latitude/longitude to spherical Mercator meters (EPSG:3857).
///
/// Total over `lat ∈ (-90, 90)`; at the poles `y` diverges to ±infinity.
pub fn project(lat: f64, lng: f64) -> Point {
    let x = lng * ORIGIN_SHIFT / 180.0;
    let y = ((90.0 + lat) * PI / 360.0).tan().ln() / (PI / 180.0);
    Point::new(x, y * ORIGIN_SHIFT / 180.0)
}

/// Inverse of [`project`].
pub fn unproject(point: Point) -> LatLng {
    let lng = point.x / ORIGIN_SHIFT * 180.0;
    let lat = point.y / ORIGIN_SHIFT * 180.0;
    let lat = 180.0 / PI * (2.0 * (lat * PI / 180.0).exp().atan() - PI / 2.0);
    LatLng::new(lat, lng)
}

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Converts to spherical Mercator meters
    pub fn to_mercator(&self) -> Point {
        project(self.lat, self.lng)
    }

    /// Geographic position as a planar point with `x = lng`, `y = lat`
    pub fn to_point(&self) -> Point {
        Point::new(self.lng, self.lat)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in geographic, projected or screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Width/height pair in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Zero or negative extents happen transiently while the host lays out.
    pub fn is_drawable(&self) -> bool {
        self.width >= 1.0 && self.height >= 1.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_origin() {
        let p = project(0.0, 0.0);
        assert!(p.x.abs() < 1e-9);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn test_project_antimeridian() {
        let p = project(0.0, 180.0);
        assert!((p.x - ORIGIN_SHIFT).abs() < 1e-6);
        assert!((ORIGIN_SHIFT - 20_037_508.342789244).abs() < 1e-6);
    }

    #[test]
    fn test_project_known_latitude() {
        // 45°N in EPSG:3857
        let p = project(45.0, 0.0);
        assert!((p.y - 5_621_521.486).abs() < 1.0);
    }

    #[test]
    fn test_project_is_monotonic() {
        let south = project(29.0, 100.0);
        let north = project(31.0, 101.0);
        assert!(north.x > south.x);
        assert!(north.y > south.y);
    }

    #[test]
    fn test_pole_diverges() {
        let p = project(90.0, 0.0);
        assert!(!p.y.is_finite() || p.y > 1e8);
    }

    #[test]
    fn test_unproject_round_trip() {
        let original = LatLng::new(31.2304, 121.4737);
        let back = unproject(original.to_mercator());
        assert!((back.lat - original.lat).abs() < 1e-9);
        assert!((back.lng - original.lng).abs() < 1e-9);
    }

    #[test]
    fn test_size_drawable() {
        assert!(Size::new(800.0, 600.0).is_drawable());
        assert!(!Size::new(0.0, 600.0).is_drawable());
        assert!(!Size::new(800.0, -1.0).is_drawable());
    }
}
