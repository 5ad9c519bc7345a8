use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tracing::info;

use postdeck_api::{AccountService, ListQuery};

use super::{
    OnSuccess, OpKind, OpTracker, OperationStatus, delete_entity, fetch_collection, fetch_entity,
    refresh_collection, reject, save_entity, settle,
};
use crate::error::CoreError;
use crate::model::{Account, AccountStats, NewAccount};
use crate::normalize::decode;
use crate::store::{CollectionSnapshot, DataStore};
use crate::stream::StoreStream;

/// Account operations bound to the session's account store.
#[derive(Clone)]
pub struct AccountsFeature {
    service: AccountService,
    store: Arc<DataStore>,
    tracker: OpTracker,
    /// Query of the last fetch-all, reused by the post-create refetch.
    last_query: Arc<Mutex<ListQuery>>,
}

impl AccountsFeature {
    pub(crate) fn new(service: AccountService, store: Arc<DataStore>, pulse: Duration) -> Self {
        Self {
            service,
            store,
            tracker: OpTracker::new(pulse),
            last_query: Arc::default(),
        }
    }

    // ── Status ───────────────────────────────────────────────────────

    pub fn status(&self) -> OperationStatus {
        self.tracker.status()
    }

    pub fn watch_status(&self) -> watch::Receiver<OperationStatus> {
        self.tracker.subscribe()
    }

    /// Clear both this instance's error and the store's `last_error`.
    pub fn clear_error(&self) {
        self.tracker.clear_error();
        self.store.accounts().set_error(None);
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<CollectionSnapshot<Account, AccountStats>> {
        self.store.accounts().snapshot()
    }

    pub fn subscribe(&self) -> StoreStream<CollectionSnapshot<Account, AccountStats>> {
        self.store.accounts().subscribe()
    }

    // ── Operations ───────────────────────────────────────────────────

    pub async fn fetch_accounts(&self, query: &ListQuery) -> Result<(), CoreError> {
        self.remember(query);
        fetch_collection(&self.tracker, self.store.accounts(), self.service.list(query)).await
    }

    pub async fn fetch_account(&self, account_id: &str) -> Option<Account> {
        fetch_entity(&self.tracker, self.store.accounts(), self.service.get(account_id)).await
    }

    pub async fn fetch_account_stats(&self, account_id: &str) -> Option<AccountStats> {
        let store = self.store.accounts();
        let ticket = self.tracker.begin_for(OpKind::FetchStats, account_id);
        let outcome = match self.service.stats(account_id).await {
            Ok(payload) => decode::<AccountStats>(payload, "account stats"),
            Err(err) => Err(err.into()),
        };

        settle(&self.tracker, ticket, store, outcome, OnSuccess::Quiet, |stats| {
            store.set_stats(account_id, stats.clone());
        })
        .value()
    }

    /// Create an account, then refetch the collection with the last-used
    /// query so the store carries the server's view of the new record.
    ///
    /// An empty `account_id` fails locally without a request. If the
    /// refetch fails, its error is recorded and the created record is
    /// upserted from the create reply instead.
    pub async fn create_account(&self, draft: &NewAccount) -> Option<Account> {
        let store = self.store.accounts();
        if draft.account_id.trim().is_empty() {
            let err = CoreError::invalid_field("account_id", "Account ID is required");
            return reject::<Account>(&self.tracker, OpKind::Create, store, err).value();
        }

        let ticket = self.tracker.begin(OpKind::Create);
        let account = match self.service.create(draft).await {
            Ok(payload) => decode::<Account>(payload, "account"),
            Err(err) => Err(err.into()),
        };
        let account = match account {
            Ok(account) => account,
            Err(err) => {
                return settle(&self.tracker, ticket, store, Err(err), OnSuccess::Quiet, |_| {})
                    .value();
            }
        };
        info!(account_id = %account.account_id, "account created");

        // Take the refetch ticket before settling so `loading` stays up.
        let refetch = self.tracker.begin(OpKind::FetchAll);
        settle(&self.tracker, ticket, store, Ok(()), OnSuccess::Quiet, |_| {});

        let query = self.last_query();
        if refresh_collection(&self.tracker, refetch, store, self.service.list(&query))
            .await
            .is_err()
        {
            store.upsert(account.clone());
        }
        self.tracker.pulse();
        Some(account)
    }

    pub async fn update_account(&self, account_id: &str, patch: &Value) -> Option<Account> {
        save_entity(
            &self.tracker,
            self.store.accounts(),
            OpKind::Update,
            self.service.update(account_id, patch),
        )
        .await
    }

    pub async fn delete_account(&self, account_id: &str) -> bool {
        delete_entity(
            &self.tracker,
            self.store.accounts(),
            account_id,
            self.service.remove(account_id),
        )
        .await
    }

    fn remember(&self, query: &ListQuery) {
        let mut last = self.last_query.lock().expect("query lock poisoned");
        query.clone_into(&mut last);
    }

    fn last_query(&self) -> ListQuery {
        self.last_query.lock().expect("query lock poisoned").clone()
    }
}
