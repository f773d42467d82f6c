//! Prelude module for common geomap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use geomap::prelude::*;`

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
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
    properties::GeoFeatureProperties,
    source::{FallbackSource, FileSource, GeoJsonSource, StrSource, UrlSource},
};

pub use crate::layers::{
    flatten::{GeometryFlattener, PointSequence},
    layout::{InsetLayout, Layout},
    path::{FillRule, PathBuilder, PathId, PathKind, PathShape, RegionPath},
    style::{Color, DropShadow, PathStyle},
};

pub use crate::input::{
    events::{InputEvent, MapEvent, MouseButton},
    handler::EventManager,
};

pub use crate::spatial::index::RegionIndex;

pub use crate::ui::tooltip::{TooltipModel, TooltipPlacement};

pub use crate::animation::{
    interpolation::{EasingFunction, Interpolatable},
    transitions::{
        ImmediatePresenter, RecordingPresenter, Transition, TransitionKind, TransitionPresenter,
        Tween,
    },
};

pub use crate::{Error as MapError, Result};

pub use std::{sync::Arc, time::Duration};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
