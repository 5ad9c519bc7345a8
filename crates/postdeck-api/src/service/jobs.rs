use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::Resource;
use crate::error::Error;
use crate::query::ListQuery;
use crate::transport::Transport;

/// Scheduled and historical automation jobs: `/jobs`.
#[derive(Clone)]
pub struct JobService {
    resource: Resource,
}

impl JobService {
    pub const BASE: &'static str = "jobs";

    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            resource: Resource::new(transport, Self::BASE),
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Value, Error> {
        self.resource.list(query).await
    }

    pub async fn get(&self, job_id: &str) -> Result<Value, Error> {
        self.resource.get(job_id).await
    }

    pub async fn create(&self, payload: &(impl Serialize + Sync)) -> Result<Value, Error> {
        self.resource.create(payload).await
    }

    pub async fn update(
        &self,
        job_id: &str,
        payload: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        self.resource.update(job_id, payload).await
    }

    pub async fn remove(&self, job_id: &str) -> Result<Value, Error> {
        self.resource.remove(job_id).await
    }
}
