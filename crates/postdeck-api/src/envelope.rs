// ── Response envelope ──
//
// Every backend response is wrapped as
//   { success, data, message?, meta?, pagination? }        on success
//   { success: false, error: { code, message, details? } } on failure
// Absent optionals are omitted on the wire, never emitted as `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// The standard success/failure wire wrapper around backend payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// `error` member of a failure envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Paging information attached to list responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Result of inspecting a 2xx response body.
#[derive(Debug)]
pub(crate) enum Body {
    Payload(Value),
    Failure(ErrorBody),
}

/// Unwrap a successful response body.
///
/// A well-formed envelope yields its `data`; when it also carries
/// `pagination` the payload is re-wrapped as `{data, pagination, meta?}` so
/// list callers keep the paging info. Anything that is not a usable envelope
/// comes back unchanged, and non-JSON text comes back as a JSON string.
pub(crate) fn unwrap_body(raw: &str) -> Body {
    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        return Body::Payload(Value::String(raw.to_owned()));
    };

    let is_envelope = value.as_object().is_some_and(|obj| obj.contains_key("success"));
    if !is_envelope {
        return Body::Payload(value);
    }

    let Ok(envelope) = serde_json::from_value::<Envelope>(value.clone()) else {
        return Body::Payload(value);
    };

    if !envelope.success {
        return Body::Failure(envelope.error.unwrap_or_default());
    }

    match (envelope.data, envelope.pagination) {
        (Some(data), Some(pagination)) => {
            let mut wrapped = serde_json::Map::new();
            wrapped.insert("data".into(), data);
            wrapped.insert("pagination".into(), serde_json::json!(pagination));
            if let Some(meta) = envelope.meta {
                wrapped.insert("meta".into(), serde_json::json!(meta));
            }
            Body::Payload(Value::Object(wrapped))
        }
        (Some(data), None) => Body::Payload(data),
        (None, _) => Body::Payload(value),
    }
}

/// Build the error for a failure response (status ≥ 400, or a 2xx carrying
/// `success: false`).
pub(crate) fn failure(status: u16, body: ErrorBody) -> Error {
    Error::Http {
        status,
        code: body.code,
        message: body
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| generic_message(status)),
        details: body.details,
    }
}

/// Parse the error member out of a failure body, tolerating bodies that are
/// not envelopes at all.
pub(crate) fn failure_body(raw: &str) -> ErrorBody {
    #[derive(Deserialize)]
    struct FailureShape {
        error: Option<ErrorBody>,
    }

    serde_json::from_str::<FailureShape>(raw)
        .ok()
        .and_then(|shape| shape.error)
        .unwrap_or_default()
}

pub(crate) fn generic_message(status: u16) -> String {
    format!("Request failed with status code {status}")
}
