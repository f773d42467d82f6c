//! Configuration surface of the map
//!
//! Every option is optional; missing fields fall back to [`GeoMapConfig::default`].
//! Configurations can be built in code or loaded from JSON.

use crate::core::constants::DEFAULT_INSET_ZOOM;
use crate::layers::style::Color;
use crate::{MapError, Result};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Which multi-polygon parts of a detached region are diverted to the inset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPolicy {
    /// No part is drawn on the main map; all parts feed the inset.
    WholeFeature,
    /// The first part stays on the main map; the inset shows every part, the first included.
    AfterFirstPart,
}

/// A region whose multi-polygon is (partly) rendered in the inset panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetachedRegion {
    pub ad_code: i64,
    pub policy: ExtractionPolicy,
    /// Inset size as a fraction of the main content box, defaults to
    /// [`GeoMapConfig::default_inset_zoom`]
    #[serde(default)]
    pub inset_zoom: Option<f64>,
}

impl DetachedRegion {
    pub fn new(ad_code: i64, policy: ExtractionPolicy) -> Self {
        Self {
            ad_code,
            policy,
            inset_zoom: None,
        }
    }

    pub fn with_inset_zoom(mut self, zoom: f64) -> Self {
        self.inset_zoom = Some(zoom);
        self
    }
}

/// Distance between the map content and the widget edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margin {
    pub fn uniform(value: f64) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::uniform(20.0)
    }
}

/// Map appearance and behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoMapConfig {
    pub shape_stroke: Color,
    pub shape_stroke_width: f64,
    pub shape_fill: Color,
    pub margin: Margin,
    pub animation_duration_ms: u64,
    pub disable_animations: bool,
    pub enable_zooming_and_panning: bool,
    pub shape_hoverable: bool,
    pub enable_outlined: bool,
    pub outlined_stroke: Color,
    pub outlined_stroke_width: f64,
    pub enable_drop_shadow: bool,
    /// Display names replacing the source `name` in tooltips
    pub label_overrides: FxHashMap<i64, String>,
    pub detached_regions: Vec<DetachedRegion>,
    pub default_inset_zoom: f64,
}

impl Default for GeoMapConfig {
    fn default() -> Self {
        Self {
            shape_stroke: Color::BLACK,
            shape_stroke_width: 0.2,
            shape_fill: Color::GRAY,
            margin: Margin::default(),
            animation_duration_ms: 200,
            disable_animations: false,
            enable_zooming_and_panning: false,
            shape_hoverable: true,
            enable_outlined: false,
            outlined_stroke: Color::RED,
            outlined_stroke_width: 0.8,
            enable_drop_shadow: false,
            label_overrides: FxHashMap::default(),
            detached_regions: Vec::new(),
            default_inset_zoom: DEFAULT_INSET_ZOOM,
        }
    }
}

impl GeoMapConfig {
    /// Preset for the Chinese administrative-division datasets: Sansha city
    /// (460300) goes entirely into a tiny inset, Hainan province (460000)
    /// keeps its main island on the map and moves the South China Sea islands
    /// into the inset.
    pub fn china() -> Self {
        Self {
            detached_regions: vec![
                DetachedRegion::new(460300, ExtractionPolicy::WholeFeature).with_inset_zoom(0.002),
                DetachedRegion::new(460000, ExtractionPolicy::AfterFirstPart),
            ],
            ..Self::default()
        }
    }

    /// Parses and validates a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        let margins = [
            self.margin.left,
            self.margin.top,
            self.margin.right,
            self.margin.bottom,
        ];
        if margins.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(MapError::Config(format!(
                "margin must be finite and non-negative: {:?}",
                self.margin
            )));
        }
        if self.shape_stroke_width < 0.0 || self.outlined_stroke_width < 0.0 {
            return Err(MapError::Config("stroke widths must be non-negative".into()));
        }
        let zooms = std::iter::once(self.default_inset_zoom)
            .chain(self.detached_regions.iter().filter_map(|r| r.inset_zoom));
        for zoom in zooms {
            if !(zoom > 0.0 && zoom.is_finite()) {
                return Err(MapError::Config(format!("inset zoom must be positive, got {zoom}")));
            }
        }
        Ok(())
    }

    pub fn detached_region(&self, ad_code: i64) -> Option<&DetachedRegion> {
        self.detached_regions.iter().find(|r| r.ad_code == ad_code)
    }

    /// Inset zoom of a fired detached region
    pub fn inset_zoom_for(&self, region: Option<&DetachedRegion>) -> f64 {
        region
            .and_then(|r| r.inset_zoom)
            .unwrap_or(self.default_inset_zoom)
    }

    /// Duration handed to transitions, zero when animations are disabled
    pub fn animation_duration(&self) -> Duration {
        if self.disable_animations {
            Duration::ZERO
        } else {
            Duration::from_millis(self.animation_duration_ms)
        }
    }

    /// Display name for a region, honoring the label overrides
    pub fn display_name<'a>(&'a self, ad_code: i64, name: Option<&'a str>) -> Option<&'a str> {
        // Overrides only replace labels that exist in the source.
        let name = name?;
        Some(
            self.label_overrides
                .get(&ad_code)
                .map(String::as_str)
                .unwrap_or(name),
        )
    }
}
