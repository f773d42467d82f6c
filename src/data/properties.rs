//! Typed region properties read once per draw pass from a feature's property bag.

use crate::core::geo::LatLng;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity and labels of one administrative region.
///
/// `ad_code` is the grouping identity: every ring of a region shares one
/// instance of these properties for the duration of a draw pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoFeatureProperties {
    pub ad_code: i64,
    pub name: Option<String>,
    /// 0 when the region has no parent
    pub parent_ad_code: i64,
    pub center: Option<LatLng>,
    pub centroid: Option<LatLng>,
}

impl GeoFeatureProperties {
    pub fn new(ad_code: i64) -> Self {
        Self {
            ad_code,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Reads `adcode`, `name`, `parent.adcode`, `center` and `centroid`.
    ///
    /// Absent keys become defaults; a missing `adcode` takes the next value of
    /// `next_ad_code`. Present but malformed values are an error for this feature.
    pub fn parse(bag: Option<&Map<String, Value>>, next_ad_code: &mut i64) -> Result<Self> {
        let get = |key: &str| bag.and_then(|b| b.get(key)).filter(|v| !v.is_null());

        let ad_code = match get("adcode") {
            Some(value) => parse_integer("adcode", value)?,
            None => {
                let code = *next_ad_code;
                *next_ad_code += 1;
                code
            }
        };

        let name = get("name").map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });

        let parent_ad_code = match get("parent") {
            Some(Value::Object(parent)) => match parent.get("adcode").filter(|v| !v.is_null()) {
                Some(value) => parse_integer("parent.adcode", value)?,
                None => 0,
            },
            Some(other) => {
                return Err(MapError::InvalidProperty {
                    key: "parent",
                    reason: format!("expected an object, got {other}"),
                })
            }
            None => 0,
        };

        Ok(Self {
            ad_code,
            name,
            parent_ad_code,
            center: get("center").map(|v| parse_lng_lat("center", v)).transpose()?.flatten(),
            centroid: get("centroid")
                .map(|v| parse_lng_lat("centroid", v))
                .transpose()?
                .flatten(),
        })
    }
}

fn parse_integer(key: &'static str, value: &Value) -> Result<i64> {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| MapError::InvalidProperty {
        key,
        reason: format!("not an integer: {value}"),
    })
}

/// `[lng, lat]`; arrays of any other length are ignored, non-numeric members are an error.
fn parse_lng_lat(key: &'static str, value: &Value) -> Result<Option<LatLng>> {
    let Value::Array(items) = value else {
        return Err(MapError::InvalidProperty {
            key,
            reason: format!("expected [lng, lat], got {value}"),
        });
    };
    let numbers = items
        .iter()
        .map(|item| {
            item.as_f64().ok_or_else(|| MapError::InvalidProperty {
                key,
                reason: format!("not a number: {item}"),
            })
        })
        .collect::<Result<Vec<f64>>>()?;
    Ok(match numbers.as_slice() {
        [lng, lat] => Some(LatLng::new(*lat, *lng)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_full_properties() {
        let props = bag(json!({
            "adcode": 110000,
            "name": "北京市",
            "parent": {"adcode": 100000},
            "center": [116.405285, 39.904989],
            "centroid": [116.41995, 40.18994]
        }));
        let mut next = 0;
        let parsed = GeoFeatureProperties::parse(Some(&props), &mut next).unwrap();
        assert_eq!(parsed.ad_code, 110000);
        assert_eq!(parsed.name.as_deref(), Some("北京市"));
        assert_eq!(parsed.parent_ad_code, 100000);
        assert_eq!(parsed.center, Some(LatLng::new(39.904989, 116.405285)));
        assert!(parsed.centroid.is_some());
        assert_eq!(next, 0);
    }

    #[test]
    fn test_missing_adcode_is_sequential() {
        let mut next = 0;
        let first = GeoFeatureProperties::parse(None, &mut next).unwrap();
        let second = GeoFeatureProperties::parse(Some(&bag(json!({"name": "x"}))), &mut next)
            .unwrap();
        assert_eq!(first.ad_code, 0);
        assert_eq!(second.ad_code, 1);
        assert_eq!(next, 2);
        assert_eq!(first.parent_ad_code, 0);
        assert!(first.name.is_none());
        assert!(first.center.is_none());
    }

    #[test]
    fn test_string_adcode() {
        let mut next = 0;
        let parsed =
            GeoFeatureProperties::parse(Some(&bag(json!({"adcode": "460300"}))), &mut next)
                .unwrap();
        assert_eq!(parsed.ad_code, 460300);
    }

    #[test]
    fn test_malformed_parent_is_error() {
        let mut next = 0;
        let err = GeoFeatureProperties::parse(
            Some(&bag(json!({"adcode": 1, "parent": {"adcode": "abc"}}))),
            &mut next,
        )
        .unwrap_err();
        assert!(matches!(err, MapError::InvalidProperty { key: "parent.adcode", .. }));
    }

    #[test]
    fn test_center_with_wrong_length_is_ignored() {
        let mut next = 0;
        let parsed = GeoFeatureProperties::parse(
            Some(&bag(json!({"adcode": 1, "center": [1.0, 2.0, 3.0]}))),
            &mut next,
        )
        .unwrap();
        assert!(parsed.center.is_none());
    }

    #[test]
    fn test_non_numeric_center_is_error() {
        let mut next = 0;
        let result = GeoFeatureProperties::parse(
            Some(&bag(json!({"adcode": 1, "center": ["a", 2.0]}))),
            &mut next,
        );
        assert!(result.is_err());
    }
}
