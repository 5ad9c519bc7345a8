use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use postdeck_api::DashboardService;

use super::{OnSuccess, OpKind, OpTracker, OperationStatus, settle};
use crate::model::DashboardSnapshot;
use crate::normalize::decode;
use crate::store::{DataStore, DocumentSnapshot};
use crate::stream::StoreStream;

/// Read-only dashboard counters.
#[derive(Clone)]
pub struct DashboardFeature {
    service: DashboardService,
    store: Arc<DataStore>,
    tracker: OpTracker,
}

impl DashboardFeature {
    pub(crate) fn new(service: DashboardService, store: Arc<DataStore>, pulse: Duration) -> Self {
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
        self.store.dashboard().set_error(None);
    }

    pub fn snapshot(&self) -> Arc<DocumentSnapshot<DashboardSnapshot>> {
        self.store.dashboard().snapshot()
    }

    pub fn subscribe(&self) -> StoreStream<DocumentSnapshot<DashboardSnapshot>> {
        self.store.dashboard().subscribe()
    }

    pub async fn fetch_dashboard(&self) -> Option<DashboardSnapshot> {
        let store = self.store.dashboard();
        let ticket = self.tracker.begin(OpKind::FetchOne);
        let outcome = match self.service.stats().await {
            Ok(payload) => decode::<DashboardSnapshot>(payload, "dashboard"),
            Err(err) => Err(err.into()),
        };

        settle(&self.tracker, ticket, store, outcome, OnSuccess::Quiet, |snapshot| {
            store.set(snapshot.clone());
        })
        .value()
    }
}
