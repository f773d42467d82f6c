pub mod binding;
pub mod geojson;
pub mod properties;
pub mod source;

pub use binding::{CollectionChange, RegionDataItem, RegionDataSource};
pub use geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry, Position};
pub use properties::GeoFeatureProperties;
pub use source::{FallbackSource, FileSource, GeoJsonSource, StrSource, UrlSource};
