// ── Runtime connection configuration ──
//
// Describes *how* to reach the backend. Never touches disk: the CLI builds
// a `ConsoleConfig` from its profiles and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::feature::SUCCESS_PULSE_WINDOW;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Configuration for one console session.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// API root, e.g. `https://automation.local/api`.
    pub base_url: Url,
    /// Bearer token, if the backend requires one.
    pub token: Option<SecretString>,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// How long `save_success` stays raised after a save.
    pub success_pulse: Duration,
}

impl ConsoleConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            success_pulse: SUCCESS_PULSE_WINDOW,
        }
    }
}
