use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The backend's singleton configuration document.
///
/// Kept as an opaque JSON tree: the backend owns its schema, the client
/// only reads it and merges partial updates into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(pub Value);

impl ConfigDocument {
    /// Look up a dotted path such as `scheduler.interval`.
    pub fn pointer(&self, dotted: &str) -> Option<&Value> {
        dotted
            .split('.')
            .filter(|s| !s.is_empty())
            .try_fold(&self.0, |node, key| node.get(key))
    }

    /// Merge `patch` into this document.
    pub fn merge(&mut self, patch: Value) {
        deep_merge(&mut self.0, patch);
    }
}

/// Recursively merge `patch` into `base`.
///
/// Objects merge key by key; any other value (arrays included) replaces
/// the target wholesale.
pub fn deep_merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (slot, other) => *slot = other,
    }
}
