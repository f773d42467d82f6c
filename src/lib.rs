//! # geomap
//!
//! Core of a GeoJSON boundary map: turns administrative-region geometry into
//! fitted, pixel-space region paths with pan/zoom state, hover lookup and
//! data-driven fills.
//!
//! The hosting UI toolkit is expected to:
//! - feed pointer and resize input through [`GeoMap::handle_input`],
//! - draw the [`RegionPath`] list exposed by [`GeoMap::paths`] under the
//!   transform of [`GeoMap::canvas_transform`],
//! - present the [`Transition`]s it receives (tweened or instantly).

pub mod animation;
pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod spatial;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    config::{DetachedRegion, ExtractionPolicy, GeoMapConfig, Margin},
    geo::{project, unproject, LatLng, Point, Size},
    builder::GeoMapBuilder,
    map::{CanvasTransform, GeoMap},
    viewport::{ViewportController, ViewportState},
};

pub use crate::data::{
    binding::{CollectionChange, RegionDataItem, RegionDataSource},
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry, Position},
    properties::GeoFeatureProperties,
    source::{FallbackSource, FileSource, GeoJsonSource, StrSource, UrlSource},
};

pub use crate::layers::{
    flatten::{FlattenedGeometry, GeometryFlattener, PointSequence},
    layout::{InsetLayout, Layout},
    path::{FillRule, Figure, PathBuilder, PathId, PathKind, PathShape, RegionPath},
    style::{Color, DropShadow, PathStyle},
};

pub use crate::input::{
    events::{InputEvent, MapEvent, MouseButton},
    handler::EventManager,
};

pub use crate::spatial::index::RegionIndex;

pub use crate::ui::tooltip::{TooltipModel, TooltipPlacement};

pub use crate::animation::transitions::{
    ImmediatePresenter, RecordingPresenter, Transition, TransitionKind, TransitionPresenter,
    TransitionValue, Tween,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid property `{key}`: {reason}")]
    InvalidProperty { key: &'static str, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;
