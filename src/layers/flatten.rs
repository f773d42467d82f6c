//! Geometry flattening: GeoJSON geometry trees to flat point sequences.
//!
//! Each ring, line or point becomes one [`PointSequence`] in geographic
//! coordinates (`x = lng`, `y = lat`), tagged with the shared properties of
//! its feature. Parts of configured detached regions are diverted into a
//! separate expand list that feeds the inset layout.

use crate::core::config::{DetachedRegion, ExtractionPolicy};
use crate::core::geo::Point;
use crate::data::geojson::{GeoJsonGeometry, Position};
use crate::data::properties::GeoFeatureProperties;
use log::{info, warn};
use std::sync::Arc;

/// One ring/line/point of a region
#[derive(Debug, Clone, PartialEq)]
pub struct PointSequence {
    pub properties: Arc<GeoFeatureProperties>,
    pub points: Vec<Point>,
}

impl PointSequence {
    pub fn new(properties: Arc<GeoFeatureProperties>, points: Vec<Point>) -> Self {
        Self { properties, points }
    }

    pub fn ad_code(&self) -> i64 {
        self.properties.ad_code
    }
}

/// Output of one flattening pass
#[derive(Debug, Clone, Default)]
pub struct FlattenedGeometry {
    pub main: Vec<PointSequence>,
    pub expand: Vec<PointSequence>,
    /// The detached region whose extraction fired during this pass
    pub detached: Option<DetachedRegion>,
}

impl FlattenedGeometry {
    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.expand.is_empty()
    }
}

/// Recursive visitor over [`GeoJsonGeometry`]
pub struct GeometryFlattener<'a> {
    detached_regions: &'a [DetachedRegion],
    output: FlattenedGeometry,
}

impl<'a> GeometryFlattener<'a> {
    pub fn new(detached_regions: &'a [DetachedRegion]) -> Self {
        Self {
            detached_regions,
            output: FlattenedGeometry::default(),
        }
    }

    /// Appends the sequences of `geometry` to the main list, or to the expand
    /// list when `into_expand` is set.
    pub fn flatten(
        &mut self,
        geometry: &GeoJsonGeometry,
        properties: &Arc<GeoFeatureProperties>,
        into_expand: bool,
    ) {
        match geometry {
            GeoJsonGeometry::Point { coordinates } => {
                self.push_sequence(properties, std::slice::from_ref(coordinates), into_expand);
            }
            GeoJsonGeometry::MultiPoint { coordinates } => {
                for position in coordinates {
                    self.push_sequence(properties, std::slice::from_ref(position), into_expand);
                }
            }
            GeoJsonGeometry::LineString { coordinates } => {
                self.push_sequence(properties, coordinates, into_expand);
            }
            GeoJsonGeometry::MultiLineString { coordinates }
            | GeoJsonGeometry::Polygon { coordinates } => {
                for ring in coordinates {
                    self.push_sequence(properties, ring, into_expand);
                }
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => {
                self.flatten_multi_polygon(coordinates, properties, into_expand);
            }
            GeoJsonGeometry::GeometryCollection { geometries } => {
                for child in geometries {
                    self.flatten(child, properties, into_expand);
                }
            }
        }
    }

    pub fn finish(self) -> FlattenedGeometry {
        self.output
    }

    fn flatten_multi_polygon(
        &mut self,
        polygons: &[Vec<Vec<Position>>],
        properties: &Arc<GeoFeatureProperties>,
        into_expand: bool,
    ) {
        let policy = if into_expand || polygons.is_empty() {
            None
        } else {
            self.extraction_policy(properties.ad_code)
        };

        // An extracted feature sends every part to the inset; after-first-part
        // additionally keeps part 0 on the main map.
        let main_parts = match policy {
            None if into_expand => 0,
            None => polygons.len(),
            Some(ExtractionPolicy::WholeFeature) => 0,
            Some(ExtractionPolicy::AfterFirstPart) => 1,
        };
        for polygon in &polygons[..main_parts] {
            for ring in polygon {
                self.push_sequence(properties, ring, false);
            }
        }
        if into_expand || policy.is_some() {
            for polygon in polygons {
                for ring in polygon {
                    self.push_sequence(properties, ring, true);
                }
            }
        }
    }

    /// Only one detached region may fire per pass; later ones render normally.
    fn extraction_policy(&mut self, ad_code: i64) -> Option<ExtractionPolicy> {
        let region = self.detached_regions.iter().find(|r| r.ad_code == ad_code)?;
        match &self.output.detached {
            Some(fired) if fired.ad_code == ad_code => Some(region.policy),
            Some(fired) => {
                warn!(
                    "detached region {} ignored, {} already extracted in this pass",
                    ad_code, fired.ad_code
                );
                None
            }
            None => {
                info!("extracting detached region {} ({:?})", ad_code, region.policy);
                self.output.detached = Some(region.clone());
                Some(region.policy)
            }
        }
    }

    fn push_sequence(
        &mut self,
        properties: &Arc<GeoFeatureProperties>,
        positions: &[Position],
        into_expand: bool,
    ) {
        if positions.is_empty() {
            return;
        }
        let sequence = PointSequence::new(
            Arc::clone(properties),
            positions.iter().map(|p| p.to_point()).collect(),
        );
        if into_expand {
            self.output.expand.push(sequence);
        } else {
            self.output.main.push(sequence);
        }
    }
}
