use crate::{
    core::{bounds::Bounds, geo::Point},
    layers::{
        path::{PathId, PathKind, RegionPath},
        style::Color,
    },
};

use fxhash::FxHashMap;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// Pixel bounds of one path, as stored in the R-tree
#[derive(Debug, Clone, PartialEq)]
struct PathEntry {
    index: usize,
    bounds: Bounds,
}

// --- rstar integration -------------------------------------------------------------------------

impl RTreeObject for PathEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bounds.min.x, self.bounds.min.y],
            [self.bounds.max.x, self.bounds.max.y],
        )
    }
}

impl PointDistance for PathEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let center = self.bounds.center();
        let dx = center.x - point[0];
        let dy = center.y - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.bounds.contains(&Point::new(point[0], point[1]))
    }
}

/// Paths of the current draw pass, in drawing order.
///
/// Every `clear` starts a new generation, so handles issued before it stop
/// resolving.
#[derive(Debug, Default)]
pub struct RegionIndex {
    generation: u32,
    paths: Vec<RegionPath>,
    rtree: RTree<PathEntry>,
    by_ad_code: FxHashMap<i64, usize>,
}

impl RegionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all paths and returns the generation for the next pass
    pub fn clear(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        self.paths.clear();
        self.rtree = RTree::new();
        self.by_ad_code.clear();
        self.generation
    }

    /// Installs the paths of the current generation, replacing any present.
    /// Paths built for another generation are skipped.
    pub fn install(&mut self, paths: Vec<RegionPath>) {
        let generation = self.generation;
        let mut entries = Vec::with_capacity(paths.len());
        self.paths = paths
            .into_iter()
            .filter(|path| {
                let current = path.id.generation() == generation;
                if !current {
                    log::warn!("skipping path {:?} from a previous draw pass", path.id);
                }
                current
            })
            .enumerate()
            .map(|(index, mut path)| {
                path.id = PathId::new(generation, index);
                path
            })
            .collect();

        self.by_ad_code.clear();
        for (index, path) in self.paths.iter().enumerate() {
            if path.is_fillable() {
                self.by_ad_code.entry(path.ad_code()).or_insert(index);
            }
            if let Some(bounds) = path.shape.bounds() {
                entries.push(PathEntry { index, bounds });
            }
        }
        self.rtree = RTree::bulk_load(entries);
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn paths(&self) -> &[RegionPath] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, id: PathId) -> Option<&RegionPath> {
        if id.generation() != self.generation {
            return None;
        }
        self.paths.get(id.index())
    }

    pub fn get_mut(&mut self, id: PathId) -> Option<&mut RegionPath> {
        if id.generation() != self.generation {
            return None;
        }
        self.paths.get_mut(id.index())
    }

    /// First fillable path drawn for `ad_code`; the main-map region wins over
    /// its inset copy.
    pub fn find_by_ad_code(&self, ad_code: i64) -> Option<&RegionPath> {
        self.by_ad_code.get(&ad_code).map(|&index| &self.paths[index])
    }

    /// Sets the fill of a path; returns false for stale handles and frames
    pub fn set_fill(&mut self, id: PathId, fill: Color) -> bool {
        match self.get_mut(id) {
            Some(path) if path.is_fillable() => {
                path.style.fill = Some(fill);
                true
            }
            _ => false,
        }
    }

    /// Topmost path under a canvas-space point.
    ///
    /// Regions take precedence over the inset frame that surrounds them.
    pub fn hit_test(&self, point: &Point) -> Option<PathId> {
        self.rtree
            .locate_all_at_point(&[point.x, point.y])
            .map(|entry| &self.paths[entry.index])
            .filter(|path| path.shape.contains(point))
            .max_by_key(|path| (path.kind != PathKind::InsetFrame, path.id.index()))
            .map(|path| path.id)
    }
}
