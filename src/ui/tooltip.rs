use crate::core::config::GeoMapConfig;
use crate::core::constants::TOOLTIP_OFFSET;
use crate::core::geo::{Point, Size};
use crate::data::properties::GeoFeatureProperties;
use fxhash::FxHashMap;
use std::sync::Arc;

/// What the host tooltip shows for a hovered region
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipModel {
    pub properties: Arc<GeoFeatureProperties>,
    /// Region name after label overrides
    pub label: Option<String>,
    /// Extra content registered for this `ad_code`
    pub content: Option<serde_json::Value>,
}

impl TooltipModel {
    pub fn for_region(
        properties: Arc<GeoFeatureProperties>,
        config: &GeoMapConfig,
        values: &FxHashMap<i64, serde_json::Value>,
    ) -> Self {
        let label = config
            .display_name(properties.ad_code, properties.name.as_deref())
            .map(str::to_owned);
        let content = values.get(&properties.ad_code).cloned();
        Self {
            properties,
            label,
            content,
        }
    }
}

/// Position of the tooltip's top-left corner in widget coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPlacement {
    pub position: Point,
}

impl TooltipPlacement {
    /// Places the tooltip next to the cursor, flipping to the other side of
    /// the cursor on any axis where it would overflow the widget.
    pub fn near_cursor(cursor: Point, tooltip: Size, widget: Size) -> Self {
        let x = if cursor.x + TOOLTIP_OFFSET + tooltip.width > widget.width {
            cursor.x - TOOLTIP_OFFSET - tooltip.width
        } else {
            cursor.x + TOOLTIP_OFFSET
        };
        let y = if cursor.y + TOOLTIP_OFFSET + tooltip.height > widget.height {
            cursor.y - TOOLTIP_OFFSET - tooltip.height
        } else {
            cursor.y + TOOLTIP_OFFSET
        };
        Self {
            position: Point::new(x, y),
        }
    }
}
