pub mod flatten;
pub mod layout;
pub mod path;
pub mod style;

pub use flatten::{FlattenedGeometry, GeometryFlattener, PointSequence};
pub use layout::{InsetLayout, Layout};
pub use path::{FillRule, PathBuilder, PathId, PathKind, PathShape, RegionPath};
pub use style::{Color, DropShadow, PathStyle};
