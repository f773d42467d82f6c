use crate::core::geo::{LatLng, Point};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A GeoJSON position. Extra members (altitude, measures) are accepted and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
}

impl Position {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Planar point with `x = lng`, `y = lat`
    pub fn to_point(self) -> Point {
        Point::new(self.lng, self.lat)
    }

    pub fn to_lat_lng(self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(values: Vec<f64>) -> std::result::Result<Self, Self::Error> {
        match values.as_slice() {
            [lng, lat, ..] => Ok(Self::new(*lng, *lat)),
            _ => Err(format!(
                "position needs at least 2 numbers, got {}",
                values.len()
            )),
        }
    }
}

impl From<Position> for [f64; 2] {
    fn from(position: Position) -> Self {
        [position.lng, position.lat]
    }
}

/// GeoJSON geometry objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<serde_json::Map<String, serde_json::Value>>,
}

impl GeoJsonFeature {
    pub fn new(geometry: GeoJsonGeometry, properties: serde_json::Value) -> Self {
        Self {
            id: None,
            geometry: Some(geometry),
            properties: match properties {
                serde_json::Value::Object(map) => Some(map),
                _ => None,
            },
        }
    }
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
}

impl GeoJson {
    /// Parses a document. A bare geometry is wrapped into a property-less feature.
    pub fn parse(json: &str) -> Result<Self> {
        match serde_json::from_str::<GeoJson>(json) {
            Ok(geojson) => Ok(geojson),
            Err(err) => match serde_json::from_str::<GeoJsonGeometry>(json) {
                Ok(geometry) => Ok(GeoJson::Feature(GeoJsonFeature {
                    geometry: Some(geometry),
                    ..GeoJsonFeature::default()
                })),
                Err(_) => Err(MapError::ParseError(format!("Invalid GeoJSON: {}", err))),
            },
        }
    }

    pub fn features(&self) -> &[GeoJsonFeature] {
        match self {
            GeoJson::Feature(feature) => std::slice::from_ref(feature),
            GeoJson::FeatureCollection { features } => features,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features().is_empty()
    }
}

impl FromStr for GeoJson {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
