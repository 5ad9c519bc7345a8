use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;

use postdeck_api::{ListQuery, SelectorService};

use super::{
    OnSuccess, OpKind, OpTracker, OperationStatus, delete_entity, fetch_collection, fetch_entity,
    reject, save_entity, settle,
};
use crate::error::CoreError;
use crate::model::{SelectorSet, SelectorVersion};
use crate::normalize::decode_list;
use crate::store::{CollectionSnapshot, DataStore};
use crate::stream::StoreStream;

/// Selector-set operations bound to the session's selector store.
#[derive(Clone)]
pub struct SelectorsFeature {
    service: SelectorService,
    store: Arc<DataStore>,
    tracker: OpTracker,
}

impl SelectorsFeature {
    pub(crate) fn new(service: SelectorService, store: Arc<DataStore>, pulse: Duration) -> Self {
        Self {
            service,
            store,
            tracker: OpTracker::new(pulse),
        }
    }

    pub fn status(&self) -> OperationStatus {
        self.tracker.status()
    }

    pub fn watch_status(&self) -> watch::Receiver<OperationStatus> {
        self.tracker.subscribe()
    }

    pub fn clear_error(&self) {
        self.tracker.clear_error();
        self.store.selectors().set_error(None);
    }

    pub fn snapshot(&self) -> Arc<CollectionSnapshot<SelectorSet, Vec<SelectorVersion>>> {
        self.store.selectors().snapshot()
    }

    pub fn subscribe(&self) -> StoreStream<CollectionSnapshot<SelectorSet, Vec<SelectorVersion>>> {
        self.store.selectors().subscribe()
    }

    /// Fetch every platform's selectors, optionally pinned to `version`.
    pub async fn fetch_selectors(&self, version: Option<&str>) -> Result<(), CoreError> {
        let mut query = ListQuery::new();
        if let Some(version) = version {
            query = query.filter("version", version);
        }
        fetch_collection(&self.tracker, self.store.selectors(), self.service.list(&query)).await
    }

    pub async fn fetch_selector(&self, platform: &str) -> Option<SelectorSet> {
        fetch_entity(&self.tracker, self.store.selectors(), self.service.get(platform)).await
    }

    /// Fetch a platform's version history, newest first as the backend
    /// orders it.
    pub async fn fetch_versions(&self, platform: &str) -> Option<Vec<SelectorVersion>> {
        let store = self.store.selectors();
        let ticket = self.tracker.begin_for(OpKind::FetchVersions, platform);
        let outcome = match self.service.versions(platform).await {
            Ok(payload) => {
                decode_list::<SelectorVersion>(payload, "selector version").map(|l| l.items)
            }
            Err(err) => Err(err.into()),
        };

        settle(&self.tracker, ticket, store, outcome, OnSuccess::Quiet, |versions| {
            store.set_stats(platform, versions.clone());
        })
        .value()
    }

    pub async fn create_selector(&self, set: &SelectorSet) -> Option<SelectorSet> {
        if set.platform.trim().is_empty() {
            let err = CoreError::invalid_field("platform", "Platform is required");
            return reject::<SelectorSet>(&self.tracker, OpKind::Create, self.store.selectors(), err)
                .value();
        }
        save_entity(
            &self.tracker,
            self.store.selectors(),
            OpKind::Create,
            self.service.create(set),
        )
        .await
    }

    pub async fn update_selector(&self, platform: &str, patch: &Value) -> Option<SelectorSet> {
        save_entity(
            &self.tracker,
            self.store.selectors(),
            OpKind::Update,
            self.service.update(platform, patch),
        )
        .await
    }

    pub async fn delete_selector(&self, platform: &str) -> bool {
        delete_entity(
            &self.tracker,
            self.store.selectors(),
            platform,
            self.service.remove(platform),
        )
        .await
    }
}
