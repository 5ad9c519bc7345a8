// ── Domain model ──
//
// Keyed entities carry a handful of typed fields the consumers rely on,
// plus a flattened `extra` map holding every other backend field so a
// record survives a fetch/update cycle unchanged. Records are decoded from
// a JSON object: a typed field is filled only when the backend sends the
// expected JSON type, otherwise the value stays in `extra` as sent, so one
// odd field never fails a whole list.

pub mod account;
pub mod config;
pub mod dashboard;
pub mod job;
pub mod selector;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub use account::{Account, AccountStats, NewAccount};
pub use config::{ConfigDocument, deep_merge};
pub use dashboard::DashboardSnapshot;
pub use job::{JobRecord, JobRequest};
pub use selector::{SelectorSet, SelectorVersion};

/// A record stored in an `EntityStore`, identified by a unique string key.
pub trait Entity: Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Human-readable entity name used in logs.
    const KIND: &'static str;

    fn key(&self) -> &str;
}

// ── Lenient field extraction ─────────────────────────────────────────

/// Take the record key. Numeric keys are accepted as their decimal text.
pub(crate) fn take_key(raw: &mut Map<String, Value>, field: &str) -> Result<String, String> {
    match raw.remove(field) {
        Some(Value::String(key)) => Ok(key),
        Some(Value::Number(key)) => Ok(key.to_string()),
        Some(other) => Err(format!("`{field}` must be a string, got {other}")),
        None => Err(format!("missing field `{field}`")),
    }
}

pub(crate) fn take_string(raw: &mut Map<String, Value>, field: &str) -> Option<String> {
    take_if(raw, field, |value| match value {
        Value::String(text) => Ok(text),
        other => Err(other),
    })
}

pub(crate) fn take_bool(raw: &mut Map<String, Value>, field: &str) -> Option<bool> {
    take_if(raw, field, |value| match value {
        Value::Bool(flag) => Ok(flag),
        other => Err(other),
    })
}

pub(crate) fn take_object(raw: &mut Map<String, Value>, field: &str) -> Option<Map<String, Value>> {
    take_if(raw, field, |value| match value {
        Value::Object(map) => Ok(map),
        other => Err(other),
    })
}

/// Remove `field` if `convert` accepts it; a rejected value is put back.
fn take_if<T>(
    raw: &mut Map<String, Value>,
    field: &str,
    convert: impl FnOnce(Value) -> Result<T, Value>,
) -> Option<T> {
    let value = raw.remove(field)?;
    match convert(value) {
        Ok(typed) => Some(typed),
        Err(value) => {
            raw.insert(field.to_owned(), value);
            None
        }
    }
}
