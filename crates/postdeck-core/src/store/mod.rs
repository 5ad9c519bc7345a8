// ── Reactive data store ──
//
// One store per entity type, owned by a per-session `DataStore`. Stores
// are mutated only through their named actions.

mod collection;
mod document;

use serde_json::Value;

use crate::model::{
    Account, AccountStats, ConfigDocument, DashboardSnapshot, Entity, JobRecord, SelectorSet,
    SelectorVersion,
};

pub use collection::{CollectionSnapshot, EntityStore};
pub use document::{DocumentSnapshot, DocumentStore};

/// Anything that records the message of the latest failed operation.
pub trait ErrorSlot: Send + Sync {
    fn record_error(&self, message: Option<String>);
}

impl<E, S> ErrorSlot for EntityStore<E, S>
where
    E: Entity,
    S: Clone + Send + Sync + 'static,
{
    fn record_error(&self, message: Option<String>) {
        self.set_error(message);
    }
}

impl<D> ErrorSlot for DocumentStore<D>
where
    D: Clone + Send + Sync + 'static,
{
    fn record_error(&self, message: Option<String>) {
        self.set_error(message);
    }
}

/// The per-session store context.
///
/// Created once per `Console` and shared by every feature it hands out.
/// Nothing global: two consoles never see each other's data.
#[derive(Default)]
pub struct DataStore {
    accounts: EntityStore<Account, AccountStats>,
    jobs: EntityStore<JobRecord, Value>,
    selectors: EntityStore<SelectorSet, Vec<SelectorVersion>>,
    config: DocumentStore<ConfigDocument>,
    dashboard: DocumentStore<DashboardSnapshot>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(&self) -> &EntityStore<Account, AccountStats> {
        &self.accounts
    }

    pub fn jobs(&self) -> &EntityStore<JobRecord, Value> {
        &self.jobs
    }

    /// Selector sets keyed by platform; stats hold each platform's
    /// version history.
    pub fn selectors(&self) -> &EntityStore<SelectorSet, Vec<SelectorVersion>> {
        &self.selectors
    }

    pub fn config(&self) -> &DocumentStore<ConfigDocument> {
        &self.config
    }

    pub fn dashboard(&self) -> &DocumentStore<DashboardSnapshot> {
        &self.dashboard
    }

    /// Clear every store, e.g. on logout.
    pub fn reset_all(&self) {
        self.accounts.reset();
        self.jobs.reset();
        self.selectors.reset();
        self.config.reset();
        self.dashboard.reset();
    }
}
