// ── Core error types ──
//
// `CoreError` is what features return and record. `classify` flattens any
// of them into the `{code, message, details}` triple consumers render, so
// callers never branch on transport details.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::Value;
use strum::EnumString;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Transport ────────────────────────────────────────────────────
    /// The backend never answered.
    #[error("{message}")]
    Network { message: String },

    /// The backend answered with a failure.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        details: Option<Value>,
    },

    // ── Local ────────────────────────────────────────────────────────
    /// Input rejected before any request was issued.
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    /// A payload arrived but did not have the expected shape.
    #[error("Unexpected response: {message}")]
    Decode { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// A local validation failure naming the offending field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: Some(serde_json::json!({ "field": field })),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<postdeck_api::Error> for CoreError {
    fn from(err: postdeck_api::Error) -> Self {
        match err {
            postdeck_api::Error::Network { message } => CoreError::Network { message },
            postdeck_api::Error::Http {
                status,
                code,
                message,
                details,
            } => CoreError::Api {
                status,
                code,
                message,
                details,
            },
            postdeck_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            postdeck_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            postdeck_api::Error::Payload(e) => CoreError::Validation {
                message: format!("Invalid request payload: {e}"),
                details: None,
            },
        }
    }
}

// ── Error vocabulary ─────────────────────────────────────────────────

/// Error codes shared with the backend, plus the two client-side
/// fallbacks. Codes the backend invents later survive as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    BadRequest,
    InternalError,
    HttpError,
    NetworkError,
    #[strum(default)]
    Other(String),
}

impl ErrorCode {
    /// Parse a server-supplied code, preserving unknown ones verbatim.
    pub fn parse(code: &str) -> Self {
        Self::from_str(code).unwrap_or_else(|_| Self::Other(code.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::BadRequest => "BAD_REQUEST",
            Self::InternalError => "INTERNAL_ERROR",
            Self::HttpError => "HTTP_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::Other(code) => code,
        }
    }

    /// Canonical HTTP status for the code, if it has one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ValidationError | Self::BadRequest => Some(400),
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::NotFound => Some(404),
            Self::Conflict => Some(409),
            Self::InternalError => Some(500),
            Self::HttpError | Self::NetworkError | Self::Other(_) => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A classified failure, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorInfo {
    pub fn is_validation_error(&self) -> bool {
        self.code == ErrorCode::ValidationError
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code == ErrorCode::Unauthorized
    }

    pub fn is_forbidden(&self) -> bool {
        self.code == ErrorCode::Forbidden
    }

    pub fn is_conflict(&self) -> bool {
        self.code == ErrorCode::Conflict
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Normalize any failure into the shared error vocabulary.
pub fn classify(err: &CoreError) -> ErrorInfo {
    match err {
        CoreError::Api {
            code: Some(code),
            message,
            details,
            ..
        } => ErrorInfo {
            code: ErrorCode::parse(code),
            message: message.clone(),
            details: details.clone(),
        },
        CoreError::Api {
            code: None,
            message,
            ..
        } => ErrorInfo {
            code: ErrorCode::HttpError,
            message: message.clone(),
            details: None,
        },
        CoreError::Network { message } => ErrorInfo {
            code: ErrorCode::NetworkError,
            message: message.clone(),
            details: None,
        },
        CoreError::Validation { message, details } => ErrorInfo {
            code: ErrorCode::ValidationError,
            message: message.clone(),
            details: details.clone(),
        },
        CoreError::Decode { .. } | CoreError::Config { .. } => ErrorInfo {
            code: ErrorCode::HttpError,
            message: err.to_string(),
            details: None,
        },
    }
}
