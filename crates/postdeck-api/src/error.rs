use thiserror::Error;

/// Top-level error type for the `postdeck-api` crate.
///
/// Transport and service layers never swallow these; `postdeck-core`
/// classifies them into its `{code, message, details}` vocabulary.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// No response was received (connection refused, DNS failure, timeout,
    /// body read interrupted).
    #[error("Network error: {message}")]
    Network { message: String },

    /// URL construction failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// The backend answered with a failure status or a `success: false`
    /// envelope.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        /// Server-supplied `error.code`, if the body carried one.
        code: Option<String>,
        message: String,
        details: Option<serde_json::Value>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// A request payload could not be serialized to JSON.
    #[error("Invalid request payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

impl Error {
    /// HTTP status of the failure, if the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if no response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Extract the server error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Http { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
