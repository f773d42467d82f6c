//! Fit-to-viewport layout shared by the main map and the inset panel.
//!
//! Both layouts map geographic coordinates linearly into pixels. The aspect
//! ratio of the content box comes from the projected corners of the bounding
//! box, which accounts for the latitude stretch of the Mercator projection.

use crate::core::bounds::Bounds;
use crate::core::config::Margin;
use crate::core::constants::INSET_MARGIN_FACTOR;
use crate::core::geo::{project, Point, Size};
use crate::layers::flatten::PointSequence;
use log::debug;

/// Bounding box over every point of every sequence
pub fn world_bounds(sequences: &[PointSequence]) -> Option<Bounds> {
    Bounds::from_points(sequences.iter().flat_map(|s| s.points.iter()))
}

/// Width/height and height/width ratios of `bounds` in projected space
pub fn projected_aspect(bounds: &Bounds) -> Option<(f64, f64)> {
    let min = project(bounds.min.y, bounds.min.x);
    let max = project(bounds.max.y, bounds.max.x);
    let (dx, dy) = (max.x - min.x, max.y - min.y);
    let w_scale = dx / dy;
    let h_scale = dy / dx;
    (w_scale.is_finite() && h_scale.is_finite() && w_scale > 0.0).then_some((w_scale, h_scale))
}

/// World to pixel mapping of one laid out point set
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// World (lng/lat) bounding box
    pub bounds: Bounds,
    /// Projected width/height and height/width ratios of `bounds`
    pub aspect: (f64, f64),
    /// Pixels per world unit, per axis
    pub pixel_scale: Point,
    /// Pixel position of the north-west corner of `bounds`
    pub offset: Point,
    /// Pixel size of the laid out content
    pub content: Size,
}

impl Layout {
    /// Fits `sequences` into `viewport` minus `margin`, letterboxing on the
    /// binding axis. `None` when nothing is drawable at this size.
    pub fn compute(sequences: &[PointSequence], viewport: Size, margin: &Margin) -> Option<Self> {
        if !viewport.is_drawable() {
            debug!("viewport {:?} not drawable, skipping layout", viewport);
            return None;
        }
        let bounds = world_bounds(sequences)?;
        if !bounds.has_area() {
            debug!("degenerate bounds {:?}, skipping layout", bounds);
            return None;
        }
        let (w_scale, h_scale) = projected_aspect(&bounds)?;

        let content = if viewport.height * w_scale > viewport.width {
            Size::new(
                viewport.width - margin.horizontal(),
                viewport.width * h_scale - margin.vertical(),
            )
        } else {
            Size::new(
                viewport.height * w_scale - margin.horizontal(),
                viewport.height - margin.vertical(),
            )
        };
        if !content.is_drawable() {
            debug!("content {:?} below one pixel, skipping layout", content);
            return None;
        }

        Some(Self {
            bounds,
            aspect: (w_scale, h_scale),
            pixel_scale: Point::new(
                content.width / bounds.width(),
                content.height / bounds.height(),
            ),
            offset: Point::new(margin.left, margin.top),
            content,
        })
    }

    /// World to pixel, y flipped so north is up
    pub fn to_pixel(&self, world: Point) -> Point {
        Point::new(
            (world.x - self.bounds.min.x) * self.pixel_scale.x + self.offset.x,
            (self.bounds.max.y - world.y) * self.pixel_scale.y + self.offset.y,
        )
    }

    /// Inverse of [`Layout::to_pixel`]
    pub fn from_pixel(&self, pixel: Point) -> Point {
        Point::new(
            (pixel.x - self.offset.x) / self.pixel_scale.x + self.bounds.min.x,
            self.bounds.max.y - (pixel.y - self.offset.y) / self.pixel_scale.y,
        )
    }

    /// Pixel box covered by the content
    pub fn pixel_bounds(&self) -> Bounds {
        Bounds::new(
            self.offset,
            Point::new(
                self.offset.x + self.content.width,
                self.offset.y + self.content.height,
            ),
        )
    }

    /// Copies of `sequences` with every point mapped to pixels
    pub fn map_sequences(&self, sequences: &[PointSequence]) -> Vec<PointSequence> {
        sequences
            .iter()
            .map(|s| {
                PointSequence::new(
                    s.properties.clone(),
                    s.points.iter().map(|p| self.to_pixel(*p)).collect(),
                )
            })
            .collect()
    }
}

/// Layout of the detached-region panel in the bottom-right corner of the main content
#[derive(Debug, Clone, PartialEq)]
pub struct InsetLayout {
    pub layout: Layout,
    /// Pixel rectangle of the panel frame, content plus its own margin
    pub frame: Bounds,
    pub zoom: f64,
}

impl InsetLayout {
    /// Sizes the inset as a `zoom` fraction of the main content, scaled by how
    /// large the inset's extent is relative to the main extent.
    pub fn compute(
        sequences: &[PointSequence],
        main: &Layout,
        margin: &Margin,
        zoom: f64,
    ) -> Option<Self> {
        let bounds = world_bounds(sequences)?;
        if !bounds.has_area() {
            debug!("degenerate inset bounds {:?}, skipping inset", bounds);
            return None;
        }
        let (w_scale, h_scale) = projected_aspect(&bounds)?;
        let map = main.content;
        let (main_w, main_h) = (main.bounds.width(), main.bounds.height());

        let inset_h =
            map.height * (bounds.height() / main_h) * (zoom * h_scale * (map.height / map.width));
        let inset_w =
            map.width * (bounds.width() / main_w) * (zoom * w_scale * (map.width / map.height));
        let pixel_scale = Point::new(inset_w / w_scale, inset_h / h_scale);
        if !(pixel_scale.is_finite() && pixel_scale.x > 0.0 && pixel_scale.y > 0.0) {
            return None;
        }

        let content = Size::new(
            bounds.width() * pixel_scale.x,
            bounds.height() * pixel_scale.y,
        );
        let frame_margin = pixel_scale.multiply(INSET_MARGIN_FACTOR);
        let frame_size = Size::new(
            content.width + frame_margin.x * 2.0,
            content.height + frame_margin.y * 2.0,
        );
        let offset = Point::new(
            map.width - frame_size.width + frame_margin.x + margin.left,
            map.height - frame_size.height + frame_margin.y + margin.top,
        );
        let frame_min = offset.subtract(&frame_margin);

        Some(Self {
            layout: Layout {
                bounds,
                aspect: (w_scale, h_scale),
                pixel_scale,
                offset,
                content,
            },
            frame: Bounds::new(
                frame_min,
                Point::new(
                    frame_min.x + frame_size.width,
                    frame_min.y + frame_size.height,
                ),
            ),
            zoom,
        })
    }
}
