//! Fluent construction of [`GeoMap`] instances

use crate::{
    animation::transitions::TransitionPresenter,
    core::{config::GeoMapConfig, geo::Size, map::GeoMap},
    data::source::GeoJsonSource,
    Result,
};
use fxhash::FxHashMap;

/// Builder for creating and configuring GeoMap instances
#[derive(Default)]
pub struct GeoMapBuilder {
    config: GeoMapConfig,
    source: Option<Box<dyn GeoJsonSource>>,
    size: Option<Size>,
    presenter: Option<Box<dyn TransitionPresenter>>,
    tooltip_values: FxHashMap<i64, serde_json::Value>,
}

impl GeoMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: GeoMapConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_source(mut self, source: impl GeoJsonSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Initial widget size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    pub fn with_presenter(mut self, presenter: impl TransitionPresenter + 'static) -> Self {
        self.presenter = Some(Box::new(presenter));
        self
    }

    pub fn with_zooming_and_panning(mut self, enabled: bool) -> Self {
        self.config.enable_zooming_and_panning = enabled;
        self
    }

    pub fn with_outlined(mut self, enabled: bool) -> Self {
        self.config.enable_outlined = enabled;
        self
    }

    pub fn with_label(mut self, ad_code: i64, label: impl Into<String>) -> Self {
        self.config.label_overrides.insert(ad_code, label.into());
        self
    }

    pub fn with_tooltip_value(mut self, ad_code: i64, value: serde_json::Value) -> Self {
        self.tooltip_values.insert(ad_code, value);
        self
    }

    /// Validates the configuration and assembles the map. Nothing is drawn
    /// until the source is loaded with [`GeoMap::reload`].
    pub fn build(self) -> Result<GeoMap> {
        let mut map = GeoMap::new(self.config)?;
        if let Some(presenter) = self.presenter {
            map.set_presenter(presenter);
        }
        if let Some(source) = self.source {
            map.set_boxed_source(source);
        }
        if let Some(size) = self.size {
            map.resize(size);
        }
        map.set_tooltip_values(self.tooltip_values);
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Margin;

    #[test]
    fn test_builder_applies_options() {
        let map = GeoMapBuilder::new()
            .with_size(640.0, 480.0)
            .with_zooming_and_panning(true)
            .with_label(1, "One")
            .build()
            .unwrap();
        assert_eq!(map.size(), Size::new(640.0, 480.0));
        assert!(map.config().enable_zooming_and_panning);
        assert_eq!(map.config().label_overrides.get(&1).map(String::as_str), Some("One"));
        assert!(map.paths().is_empty());
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let config = GeoMapConfig {
            margin: Margin::uniform(-1.0),
            ..GeoMapConfig::default()
        };
        assert!(GeoMapBuilder::new().with_config(config).build().is_err());
    }
}
