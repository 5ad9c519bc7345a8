use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::Resource;
use crate::error::Error;
use crate::query::ListQuery;
use crate::transport::Transport;

/// Publishing accounts: `/accounts`.
#[derive(Clone)]
pub struct AccountService {
    resource: Resource,
}

impl AccountService {
    pub const BASE: &'static str = "accounts";

    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            resource: Resource::new(transport, Self::BASE),
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Value, Error> {
        self.resource.list(query).await
    }

    pub async fn get(&self, account_id: &str) -> Result<Value, Error> {
        self.resource.get(account_id).await
    }

    pub async fn create(&self, payload: &(impl Serialize + Sync)) -> Result<Value, Error> {
        self.resource.create(payload).await
    }

    pub async fn update(
        &self,
        account_id: &str,
        payload: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        self.resource.update(account_id, payload).await
    }

    pub async fn remove(&self, account_id: &str) -> Result<Value, Error> {
        self.resource.remove(account_id).await
    }

    /// `GET /accounts/{id}/stats`.
    pub async fn stats(&self, account_id: &str) -> Result<Value, Error> {
        self.resource.get_nested(account_id, "stats").await
    }
}
