//! CLI error types with miette diagnostics.
//!
//! Maps core failures into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use postdeck_config::ConfigError;
use postdeck_core::{CoreError, ErrorCode, ErrorInfo, classify};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the backend: {message}")]
    #[diagnostic(
        code(postdeck::connection_failed),
        help(
            "Check that the backend is running and that api_url is correct.\n\
             Try: postdeck dashboard --api-url http://localhost:3000/api/v1"
        )
    )]
    ConnectionFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(postdeck::auth_failed),
        help(
            "Verify the bearer token.\n\
             Store one with: postdeck profiles set-token\n\
             Or set POSTDECK_API_TOKEN."
        )
    )]
    AuthFailed { message: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(postdeck::forbidden),
        help("The token is valid but lacks access to this resource.")
    )]
    PermissionDenied { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(postdeck::not_found),
        help("Run the matching `list` command to see what exists.")
    )]
    NotFound { message: String },

    #[error("{message}")]
    #[diagnostic(code(postdeck::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(postdeck::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(postdeck::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(postdeck::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Add one under [profiles.<name>] in the config file."
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(postdeck::no_config),
        help(
            "Pass --api-url, set POSTDECK_API_URL, or add a profile.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(postdeck::config))]
    Config(ConfigError),

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(postdeck::setup),
        help("Check ca_cert and api_url in the active profile.")
    )]
    Setup { message: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(postdeck::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML rendering failed: {0}")]
    #[diagnostic(code(postdeck::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. }
            | Self::Setup { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// A failed operation whose status carried no classified failure.
    pub fn incomplete(operation: &str) -> Self {
        Self::ApiError {
            code: ErrorCode::HttpError.to_string(),
            message: format!("{operation} did not complete"),
        }
    }
}

// ── Core → CliError mapping ──────────────────────────────────────────

impl From<ErrorInfo> for CliError {
    fn from(info: ErrorInfo) -> Self {
        let message = info.message;
        match info.code {
            ErrorCode::NetworkError => Self::ConnectionFailed { message },
            ErrorCode::Unauthorized => Self::AuthFailed { message },
            ErrorCode::Forbidden => Self::PermissionDenied { message },
            ErrorCode::NotFound => Self::NotFound { message },
            ErrorCode::Conflict => Self::Conflict { message },
            ErrorCode::ValidationError | ErrorCode::BadRequest => {
                let field = info
                    .details
                    .as_ref()
                    .and_then(|d| d.get("field"))
                    .and_then(|f| f.as_str())
                    .unwrap_or("input")
                    .to_owned();
                Self::Validation {
                    field,
                    reason: message,
                }
            }
            code => Self::ApiError {
                code: code.to_string(),
                message,
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { message } => Self::Setup { message },
            other => classify(&other).into(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => Self::Config(other),
        }
    }
}
