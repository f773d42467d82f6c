pub mod bounds;
pub mod builder;
pub mod config;
pub mod constants;
pub mod geo;
pub mod map;
pub mod viewport;

pub use builder::GeoMapBuilder;
pub use map::{CanvasTransform, GeoMap};
pub use viewport::{ViewportController, ViewportState};
