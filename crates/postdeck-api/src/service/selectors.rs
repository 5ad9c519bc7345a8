use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::Resource;
use crate::error::Error;
use crate::query::ListQuery;
use crate::transport::Transport;

/// DOM selector sets, one per platform: `/selectors`.
#[derive(Clone)]
pub struct SelectorService {
    resource: Resource,
}

impl SelectorService {
    pub const BASE: &'static str = "selectors";

    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            resource: Resource::new(transport, Self::BASE),
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Value, Error> {
        self.resource.list(query).await
    }

    pub async fn get(&self, platform: &str) -> Result<Value, Error> {
        self.resource.get(platform).await
    }

    pub async fn create(&self, payload: &(impl Serialize + Sync)) -> Result<Value, Error> {
        self.resource.create(payload).await
    }

    pub async fn update(
        &self,
        platform: &str,
        payload: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        self.resource.update(platform, payload).await
    }

    pub async fn remove(&self, platform: &str) -> Result<Value, Error> {
        self.resource.remove(platform).await
    }

    /// `GET /selectors/versions?platform=…`.
    pub async fn versions(&self, platform: &str) -> Result<Value, Error> {
        self.resource
            .get_extension("versions", vec![("platform".into(), platform.into())])
            .await
    }
}
