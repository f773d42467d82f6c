//! Region path building.
//!
//! Pixel-space point sequences are grouped per `ad_code` into one closed,
//! even-odd filled outline per region. The optional outlined-border mode adds
//! the boolean union of all region outlines as a stroke-only silhouette.

use crate::core::bounds::Bounds;
use crate::core::config::GeoMapConfig;
use crate::core::constants::{INSET_FRAME_STROKE_FACTOR, INSET_STROKE_FACTOR};
use crate::core::geo::Point;
use crate::data::properties::GeoFeatureProperties;
use crate::layers::flatten::PointSequence;
use crate::layers::style::PathStyle;
use fxhash::FxHashMap;
use geo::BooleanOps;
use geo_types::{LineString, MultiPolygon, Polygon};
use std::sync::Arc;

/// Handle of a path produced by one draw pass.
///
/// Handles from earlier passes never resolve against a newer index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathId {
    generation: u32,
    index: u32,
}

impl PathId {
    pub(crate) fn new(generation: u32, index: usize) -> Self {
        Self {
            generation,
            index: index as u32,
        }
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    /// Region on the main map
    Region,
    /// Detached region part drawn in the inset panel
    InsetRegion,
    /// Rectangle around the inset panel
    InsetFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    EvenOdd,
    NonZero,
}

/// A run of straight segments starting at `points[0]`
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub points: Vec<Point>,
    /// Closed figures connect the last point back to the first
    pub closed: bool,
}

impl Figure {
    pub fn closed(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    /// Closed figure from a ring, dropping a repeated closing vertex
    pub fn from_ring(mut points: Vec<Point>) -> Self {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self::closed(points)
    }

    /// Vertices in drawing order including the closing return to the start
    pub fn outline(&self) -> impl Iterator<Item = Point> + '_ {
        let closing = self
            .points
            .first()
            .filter(|_| self.closed && self.points.len() > 1);
        self.points.iter().chain(closing).copied()
    }
}

/// Drawable vector shape, independent of any UI toolkit
#[derive(Debug, Clone, PartialEq)]
pub struct PathShape {
    pub figures: Vec<Figure>,
    pub fill_rule: FillRule,
}

impl PathShape {
    pub fn new(fill_rule: FillRule) -> Self {
        Self {
            figures: Vec::new(),
            fill_rule,
        }
    }

    pub fn rectangle(rect: &Bounds) -> Self {
        let mut shape = Self::new(FillRule::NonZero);
        shape.figures.push(Figure::closed(vec![
            rect.min,
            Point::new(rect.max.x, rect.min.y),
            rect.max,
            Point::new(rect.min.x, rect.max.y),
        ]));
        shape
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.figures.iter().flat_map(|f| f.points.iter()))
    }

    /// Even-odd containment over all figures
    pub fn contains(&self, point: &Point) -> bool {
        let mut inside = false;
        for figure in &self.figures {
            let pts = &figure.points;
            if pts.len() < 3 {
                continue;
            }
            let mut j = pts.len() - 1;
            for i in 0..pts.len() {
                let (a, b) = (pts[i], pts[j]);
                if (a.y > point.y) != (b.y > point.y)
                    && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
                {
                    inside = !inside;
                }
                j = i;
            }
        }
        inside
    }

    /// Filled area as polygons: rings combined with even-odd semantics
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        let mut area = MultiPolygon::new(Vec::new());
        for figure in self.figures.iter().filter(|f| f.points.len() >= 3) {
            let ring: Vec<(f64, f64)> = figure.points.iter().map(|p| (p.x, p.y)).collect();
            let ring = MultiPolygon::new(vec![Polygon::new(LineString::from(ring), Vec::new())]);
            area = if area.0.is_empty() {
                ring
            } else {
                area.xor(&ring)
            };
        }
        area
    }

    pub fn from_multi_polygon(area: &MultiPolygon<f64>) -> Self {
        let mut shape = Self::new(FillRule::EvenOdd);
        for polygon in &area.0 {
            let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
            for ring in rings {
                let points: Vec<Point> = ring.0.iter().map(|c| Point::new(c.x, c.y)).collect();
                if !points.is_empty() {
                    shape.figures.push(Figure::from_ring(points));
                }
            }
        }
        shape
    }
}

/// A rendered shape and the region it represents
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPath {
    pub id: PathId,
    pub kind: PathKind,
    pub properties: Arc<GeoFeatureProperties>,
    pub shape: PathShape,
    pub style: PathStyle,
}

impl RegionPath {
    pub fn ad_code(&self) -> i64 {
        self.properties.ad_code
    }

    /// Frames only decorate the inset and never take data fills
    pub fn is_fillable(&self) -> bool {
        self.kind != PathKind::InsetFrame
    }
}

/// Accumulates the region paths of one draw pass in drawing order
pub struct PathBuilder<'a> {
    config: &'a GeoMapConfig,
    generation: u32,
    paths: Vec<RegionPath>,
}

impl<'a> PathBuilder<'a> {
    pub fn new(config: &'a GeoMapConfig, generation: u32) -> Self {
        Self {
            config,
            generation,
            paths: Vec::new(),
        }
    }

    /// One path per distinct `ad_code`, in order of first occurrence, each
    /// holding one closed figure per sequence.
    pub fn build_paths(&mut self, sequences: &[PointSequence], kind: PathKind) -> Vec<PathId> {
        let mut groups: Vec<(Arc<GeoFeatureProperties>, PathShape)> = Vec::new();
        let mut by_code: FxHashMap<i64, usize> = FxHashMap::default();

        for sequence in sequences {
            let slot = *by_code.entry(sequence.ad_code()).or_insert_with(|| {
                groups.push((
                    Arc::clone(&sequence.properties),
                    PathShape::new(FillRule::EvenOdd),
                ));
                groups.len() - 1
            });
            groups[slot]
                .1
                .figures
                .push(Figure::from_ring(sequence.points.clone()));
        }

        let style = self.region_style(kind);
        groups
            .into_iter()
            .map(|(properties, shape)| self.push(kind, properties, shape, style.clone()))
            .collect()
    }

    /// Rectangle around the inset panel, carrying the first inset region's properties
    pub fn build_frame(&mut self, frame: &Bounds, properties: Arc<GeoFeatureProperties>) -> PathId {
        let style = if self.config.enable_outlined {
            PathStyle::stroked(
                self.config.outlined_stroke,
                self.config.outlined_stroke_width,
            )
        } else {
            PathStyle::stroked(
                self.config.shape_stroke,
                self.config.shape_stroke_width * INSET_FRAME_STROKE_FACTOR,
            )
        };
        self.push(
            PathKind::InsetFrame,
            properties,
            PathShape::rectangle(frame),
            style,
        )
    }

    pub fn paths(&self) -> &[RegionPath] {
        &self.paths
    }

    pub fn finish(self) -> Vec<RegionPath> {
        self.paths
    }

    fn region_style(&self, kind: PathKind) -> PathStyle {
        let width = match kind {
            PathKind::InsetRegion => self.config.shape_stroke_width * INSET_STROKE_FACTOR,
            _ => self.config.shape_stroke_width,
        };
        PathStyle::filled(self.config.shape_fill, self.config.shape_stroke, width)
    }

    fn push(
        &mut self,
        kind: PathKind,
        properties: Arc<GeoFeatureProperties>,
        shape: PathShape,
        style: PathStyle,
    ) -> PathId {
        let id = PathId::new(self.generation, self.paths.len());
        self.paths.push(RegionPath {
            id,
            kind,
            properties,
            shape,
            style,
        });
        id
    }
}

/// Union of all main-map region outlines, for the outlined-border mode
pub fn outline_silhouette(paths: &[RegionPath]) -> Option<PathShape> {
    let mut silhouette: Option<MultiPolygon<f64>> = None;
    for path in paths.iter().filter(|p| p.kind == PathKind::Region) {
        let area = path.shape.to_multi_polygon();
        if area.0.is_empty() {
            continue;
        }
        silhouette = Some(match silhouette {
            Some(acc) => acc.union(&area),
            None => area,
        });
    }
    silhouette.map(|area| PathShape::from_multi_polygon(&area))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(ad_code: i64, pts: &[(f64, f64)]) -> PointSequence {
        PointSequence::new(
            Arc::new(GeoFeatureProperties::new(ad_code)),
            pts.iter().map(|(x, y)| Point::new(*x, *y)).collect(),
        )
    }

    fn square(x: f64, y: f64, size: f64) -> Vec<(f64, f64)> {
        vec![(x, y), (x + size, y), (x + size, y + size), (x, y + size)]
    }

    #[test]
    fn test_one_path_per_ad_code() {
        let config = GeoMapConfig::default();
        let mut builder = PathBuilder::new(&config, 1);
        let a = seq(1, &square(0.0, 0.0, 10.0));
        let a_hole = PointSequence::new(
            Arc::clone(&a.properties),
            square(2.0, 2.0, 2.0).iter().map(|(x, y)| Point::new(*x, *y)).collect(),
        );
        let sequences = vec![seq(2, &square(20.0, 0.0, 5.0)), a, a_hole, seq(2, &square(30.0, 0.0, 5.0))];
        let ids = builder.build_paths(&sequences, PathKind::Region);
        let paths = builder.finish();

        assert_eq!(ids.len(), 2);
        assert_eq!(paths.len(), 2);
        // insertion order of first occurrence
        assert_eq!(paths[0].ad_code(), 2);
        assert_eq!(paths[1].ad_code(), 1);
        assert_eq!(paths[0].shape.figures.len(), 2);
        assert_eq!(paths[1].shape.fill_rule, FillRule::EvenOdd);
        assert_eq!(paths[1].id, ids[1]);
        assert_eq!(paths[1].style.fill, Some(config.shape_fill));
    }

    #[test]
    fn test_outline_is_closed_and_ordered() {
        let config = GeoMapConfig::default();
        let mut builder = PathBuilder::new(&config, 0);
        let pts = square(0.0, 0.0, 4.0);
        builder.build_paths(&[seq(5, &pts)], PathKind::Region);
        let path = &builder.paths()[0];
        let outline: Vec<Point> = path.shape.figures[0].outline().collect();
        assert_eq!(outline.len(), pts.len() + 1);
        for (drawn, (x, y)) in outline.iter().zip(pts.iter()) {
            assert_eq!(*drawn, Point::new(*x, *y));
        }
        assert_eq!(outline.last(), outline.first());
    }

    #[test]
    fn test_repeated_closing_vertex_dropped() {
        let config = GeoMapConfig::default();
        let mut builder = PathBuilder::new(&config, 0);
        let mut ring = square(0.0, 0.0, 4.0);
        ring.push(ring[0]);
        builder.build_paths(&[seq(5, &ring)], PathKind::Region);
        let figure = &builder.paths()[0].shape.figures[0];
        assert_eq!(figure.points.len(), 4);
        assert!(figure.closed);
    }

    #[test]
    fn test_even_odd_hole() {
        let config = GeoMapConfig::default();
        let mut builder = PathBuilder::new(&config, 0);
        let outer = seq(1, &square(0.0, 0.0, 10.0));
        let hole = PointSequence::new(
            Arc::clone(&outer.properties),
            square(4.0, 4.0, 2.0).iter().map(|(x, y)| Point::new(*x, *y)).collect(),
        );
        builder.build_paths(&[outer, hole], PathKind::Region);
        let shape = &builder.paths()[0].shape;
        assert!(shape.contains(&Point::new(1.0, 1.0)));
        assert!(!shape.contains(&Point::new(5.0, 5.0)));
        assert!(!shape.contains(&Point::new(11.0, 5.0)));
    }

    #[test]
    fn test_inset_styles() {
        let config = GeoMapConfig {
            enable_outlined: true,
            ..GeoMapConfig::default()
        };
        let mut builder = PathBuilder::new(&config, 0);
        let inset = seq(9, &square(0.0, 0.0, 1.0));
        let props = Arc::clone(&inset.properties);
        builder.build_paths(&[inset], PathKind::InsetRegion);
        let frame = builder.build_frame(&Bounds::from_coords(-1.0, -1.0, 2.0, 2.0), props);
        let paths = builder.finish();

        assert!((paths[0].style.stroke_width - 0.2 * INSET_STROKE_FACTOR).abs() < 1e-12);
        let frame_path = &paths[frame.index()];
        assert_eq!(frame_path.kind, PathKind::InsetFrame);
        assert_eq!(frame_path.ad_code(), 9);
        assert!(frame_path.style.fill.is_none());
        assert_eq!(frame_path.style.stroke, config.outlined_stroke);
        assert!(!frame_path.is_fillable());
        assert_eq!(frame_path.shape.figures[0].points.len(), 4);
    }

    #[test]
    fn test_silhouette_merges_neighbours() {
        let config = GeoMapConfig::default();
        let mut builder = PathBuilder::new(&config, 0);
        builder.build_paths(
            &[seq(1, &square(0.0, 0.0, 10.0)), seq(2, &square(10.0, 0.0, 10.0))],
            PathKind::Region,
        );
        let silhouette = outline_silhouette(builder.paths()).unwrap();
        let bounds = silhouette.bounds().unwrap();
        assert_eq!(bounds, Bounds::from_coords(0.0, 0.0, 20.0, 10.0));
        assert!(silhouette.contains(&Point::new(10.0, 5.0)));
        assert_eq!(silhouette.to_multi_polygon().0.len(), 1);
    }

    #[test]
    fn test_silhouette_ignores_point_regions() {
        let config = GeoMapConfig::default();
        let mut builder = PathBuilder::new(&config, 0);
        builder.build_paths(&[seq(1, &[(1.0, 1.0)])], PathKind::Region);
        assert!(outline_silhouette(builder.paths()).is_none());
    }
}
