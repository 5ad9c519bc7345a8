use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tracing::info;

use postdeck_api::ConfigService;

use super::{OnSuccess, OpKind, OpTracker, OperationStatus, Settled, reject, settle};
use crate::error::CoreError;
use crate::model::ConfigDocument;
use crate::store::{DataStore, DocumentSnapshot};
use crate::stream::StoreStream;

/// Operations on the backend's configuration document.
#[derive(Clone)]
pub struct ConfigFeature {
    service: ConfigService,
    store: Arc<DataStore>,
    tracker: OpTracker,
}

impl ConfigFeature {
    pub(crate) fn new(service: ConfigService, store: Arc<DataStore>, pulse: Duration) -> Self {
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
        self.store.config().set_error(None);
    }

    pub fn snapshot(&self) -> Arc<DocumentSnapshot<ConfigDocument>> {
        self.store.config().snapshot()
    }

    pub fn subscribe(&self) -> StoreStream<DocumentSnapshot<ConfigDocument>> {
        self.store.config().subscribe()
    }

    pub async fn fetch_config(&self) -> Option<ConfigDocument> {
        let store = self.store.config();
        let ticket = self.tracker.begin(OpKind::FetchOne);
        let outcome = self
            .service
            .get()
            .await
            .map(ConfigDocument)
            .map_err(CoreError::from);

        settle(&self.tracker, ticket, store, outcome, OnSuccess::Quiet, |doc| {
            store.set(doc.clone());
        })
        .value()
    }

    /// Send a partial update and merge it into the cached document.
    ///
    /// The backend may echo only part of the document; whatever comes back
    /// is deep-merged onto the current copy. A reply that is not an object
    /// falls back to merging the patch that was sent.
    pub async fn update_config(&self, patch: &Value) -> Option<ConfigDocument> {
        let store = self.store.config();
        if !patch.is_object() {
            let err = CoreError::Validation {
                message: "Configuration update must be an object".into(),
                details: None,
            };
            return reject::<Value>(&self.tracker, OpKind::Update, store, err)
                .value()
                .map(ConfigDocument);
        }

        let ticket = self.tracker.begin(OpKind::Update);
        let outcome = match self.service.update(patch).await {
            Ok(reply) if reply.is_object() => Ok(reply),
            Ok(_) => Ok(patch.clone()),
            Err(err) => Err(CoreError::from(err)),
        };

        let settled = settle(&self.tracker, ticket, store, outcome, OnSuccess::Pulse, |merge| {
            store.update(|doc| {
                let mut merged = doc.take().unwrap_or_default();
                merged.merge(merge.clone());
                *doc = Some(merged);
            });
        });
        match settled {
            Settled::Applied(_) => {
                info!("configuration updated");
                store.document()
            }
            other => other.value().map(ConfigDocument),
        }
    }
}
