// ── Response-shape normalization ──
//
// List endpoints answer either with a bare array or, when paginated, with
// `{data: [...], pagination}`. Anything else is treated as an empty list
// and logged; it is never surfaced as an error.

use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;
use tracing::warn;

use postdeck_api::Pagination;

use crate::error::CoreError;

#[derive(Deserialize)]
#[serde(untagged)]
enum ListShape {
    Bare(Vec<Value>),
    Wrapped {
        data: Vec<Value>,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
    Unrecognized(IgnoredAny),
}

/// A decoded list payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<E> {
    pub items: Vec<E>,
    pub pagination: Option<Pagination>,
}

impl<E> Default for Listing<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: None,
        }
    }
}

/// Decode a list payload of either recognized shape.
///
/// Unrecognized shapes yield an empty listing. Items that are present but
/// fail to decode are an error.
pub fn decode_list<E: DeserializeOwned>(payload: Value, what: &str) -> Result<Listing<E>, CoreError> {
    let (raw, pagination) = match ListShape::deserialize(payload) {
        Ok(ListShape::Bare(items)) => (items, None),
        Ok(ListShape::Wrapped { data, pagination }) => (data, pagination),
        Ok(ListShape::Unrecognized(_)) | Err(_) => {
            warn!(what, "unrecognized list payload, treating as empty");
            return Ok(Listing::default());
        }
    };

    let items = raw
        .into_iter()
        .map(|item| decode(item, what))
        .collect::<Result<Vec<E>, _>>()?;

    Ok(Listing { items, pagination })
}

/// Decode a single payload.
pub fn decode<T: DeserializeOwned>(payload: Value, what: &str) -> Result<T, CoreError> {
    serde_json::from_value(payload).map_err(|e| CoreError::Decode {
        message: format!("invalid {what}: {e}"),
    })
}
