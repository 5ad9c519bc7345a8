// ── Console facade ──
//
// One session against one backend: a transport built once, one service
// per entity type, and one `DataStore`. Features handed out by the
// console all share that store.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use postdeck_api::transport::{TlsMode, TransportConfig};
use postdeck_api::{
    AccountService, ConfigService, DashboardService, HttpTransport, JobService, SelectorService,
    Transport,
};

use crate::config::{ConsoleConfig, TlsVerification};
use crate::error::CoreError;
use crate::feature::{
    AccountsFeature, ConfigFeature, DashboardFeature, JobsFeature, SUCCESS_PULSE_WINDOW,
    SelectorsFeature,
};
use crate::store::DataStore;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ConsoleInner>`.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    store: Arc<DataStore>,
    accounts: AccountService,
    jobs: JobService,
    selectors: SelectorService,
    config: ConfigService,
    dashboard: DashboardService,
    success_pulse: Duration,
}

impl Console {
    /// Build the HTTP transport from `config` and start an empty session.
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        let tls = match config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        let transport_config = TransportConfig {
            tls,
            timeout: config.timeout,
            token: config.token,
        };

        debug!(base_url = %config.base_url, "building HTTP transport");
        let transport = HttpTransport::new(config.base_url, &transport_config)?;
        Ok(Self::build(Arc::new(transport), config.success_pulse))
    }

    /// Start a session over any transport, with the default pulse window.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::build(transport, SUCCESS_PULSE_WINDOW)
    }

    /// Like [`with_transport`](Self::with_transport) with a custom pulse window.
    pub fn with_transport_and_pulse(transport: Arc<dyn Transport>, success_pulse: Duration) -> Self {
        Self::build(transport, success_pulse)
    }

    fn build(transport: Arc<dyn Transport>, success_pulse: Duration) -> Self {
        Self {
            inner: Arc::new(ConsoleInner {
                store: Arc::new(DataStore::new()),
                accounts: AccountService::new(Arc::clone(&transport)),
                jobs: JobService::new(Arc::clone(&transport)),
                selectors: SelectorService::new(Arc::clone(&transport)),
                config: ConfigService::new(Arc::clone(&transport)),
                dashboard: DashboardService::new(transport),
                success_pulse,
            }),
        }
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    // ── Features ─────────────────────────────────────────────────────
    // Each call returns a fresh instance with its own status; the stores
    // behind it are shared.

    pub fn accounts(&self) -> AccountsFeature {
        AccountsFeature::new(
            self.inner.accounts.clone(),
            Arc::clone(&self.inner.store),
            self.inner.success_pulse,
        )
    }

    pub fn jobs(&self) -> JobsFeature {
        JobsFeature::new(
            self.inner.jobs.clone(),
            Arc::clone(&self.inner.store),
            self.inner.success_pulse,
        )
    }

    pub fn selectors(&self) -> SelectorsFeature {
        SelectorsFeature::new(
            self.inner.selectors.clone(),
            Arc::clone(&self.inner.store),
            self.inner.success_pulse,
        )
    }

    pub fn config(&self) -> ConfigFeature {
        ConfigFeature::new(
            self.inner.config.clone(),
            Arc::clone(&self.inner.store),
            self.inner.success_pulse,
        )
    }

    pub fn dashboard(&self) -> DashboardFeature {
        DashboardFeature::new(
            self.inner.dashboard.clone(),
            Arc::clone(&self.inner.store),
            self.inner.success_pulse,
        )
    }

    /// Drop all cached data, e.g. on logout.
    pub fn reset(&self) {
        self.inner.store.reset_all();
        info!("session data cleared");
    }
}
