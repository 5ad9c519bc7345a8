use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;

use postdeck_api::{JobService, ListQuery};

use super::{
    OpKind, OpTracker, OperationStatus, delete_entity, fetch_collection, fetch_entity, reject,
    save_entity,
};
use crate::error::CoreError;
use crate::model::{JobRecord, JobRequest};
use crate::store::{CollectionSnapshot, DataStore};
use crate::stream::StoreStream;

/// Job operations bound to the session's job store.
#[derive(Clone)]
pub struct JobsFeature {
    service: JobService,
    store: Arc<DataStore>,
    tracker: OpTracker,
}

impl JobsFeature {
    pub(crate) fn new(service: JobService, store: Arc<DataStore>, pulse: Duration) -> Self {
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
        self.store.jobs().set_error(None);
    }

    pub fn snapshot(&self) -> Arc<CollectionSnapshot<JobRecord, Value>> {
        self.store.jobs().snapshot()
    }

    pub fn subscribe(&self) -> StoreStream<CollectionSnapshot<JobRecord, Value>> {
        self.store.jobs().subscribe()
    }

    pub async fn fetch_jobs(&self, query: &ListQuery) -> Result<(), CoreError> {
        fetch_collection(&self.tracker, self.store.jobs(), self.service.list(query)).await
    }

    pub async fn fetch_job(&self, job_id: &str) -> Option<JobRecord> {
        fetch_entity(&self.tracker, self.store.jobs(), self.service.get(job_id)).await
    }

    /// Schedule a job. `account_id` and `type` are checked locally first.
    pub async fn create_job(&self, request: &JobRequest) -> Option<JobRecord> {
        if let Err(err) = validate(request) {
            return reject::<JobRecord>(&self.tracker, OpKind::Create, self.store.jobs(), err)
                .value();
        }
        save_entity(
            &self.tracker,
            self.store.jobs(),
            OpKind::Create,
            self.service.create(request),
        )
        .await
    }

    pub async fn update_job(&self, job_id: &str, patch: &Value) -> Option<JobRecord> {
        save_entity(
            &self.tracker,
            self.store.jobs(),
            OpKind::Update,
            self.service.update(job_id, patch),
        )
        .await
    }

    pub async fn delete_job(&self, job_id: &str) -> bool {
        delete_entity(
            &self.tracker,
            self.store.jobs(),
            job_id,
            self.service.remove(job_id),
        )
        .await
    }
}

fn validate(request: &JobRequest) -> Result<(), CoreError> {
    if request.account_id.trim().is_empty() {
        return Err(CoreError::invalid_field("account_id", "Account ID is required"));
    }
    if request.job_type.trim().is_empty() {
        return Err(CoreError::invalid_field("type", "Job type is required"));
    }
    Ok(())
}
