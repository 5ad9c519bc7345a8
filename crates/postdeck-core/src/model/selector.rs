use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Entity, take_bool, take_key, take_object, take_string};

/// DOM selectors the automation workers use for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct SelectorSet {
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Empty when absent or not an object; a non-object value stays in
    /// `extra`, so the map is only written when it has entries.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub selectors: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for SelectorSet {
    type Error = String;

    fn try_from(mut raw: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            platform: take_key(&mut raw, "platform")?,
            version: take_string(&mut raw, "version"),
            selectors: take_object(&mut raw, "selectors").unwrap_or_default(),
            updated_at: take_string(&mut raw, "updated_at"),
            extra: raw,
        })
    }
}

impl Entity for SelectorSet {
    const KIND: &'static str = "selector set";

    fn key(&self) -> &str {
        &self.platform
    }
}

/// One entry of a platform's selector history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct SelectorVersion {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SelectorVersion {
    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(false)
    }
}

impl TryFrom<Map<String, Value>> for SelectorVersion {
    type Error = String;

    fn try_from(mut raw: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            version: take_key(&mut raw, "version")?,
            created_at: take_string(&mut raw, "created_at"),
            is_active: take_bool(&mut raw, "is_active"),
            extra: raw,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selector_map_of_wrong_type_round_trips() {
        let raw = json!({ "platform": "tiktok", "selectors": null, "version": 3 });

        let set: SelectorSet = serde_json::from_value(raw.clone()).unwrap();
        assert!(set.selectors.is_empty());
        assert_eq!(set.version, None);
        assert_eq!(serde_json::to_value(&set).unwrap(), raw);
    }

    #[test]
    fn version_activity_defaults_to_inactive() {
        let version: SelectorVersion =
            serde_json::from_value(json!({ "version": "v2", "is_active": "yes" })).unwrap();
        assert!(!version.is_active());
        assert_eq!(version.extra["is_active"], json!("yes"));
    }
}
