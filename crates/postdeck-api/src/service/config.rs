use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::Resource;
use crate::error::Error;
use crate::transport::Transport;

/// The backend's singleton configuration document: `/config`.
#[derive(Clone)]
pub struct ConfigService {
    resource: Resource,
}

impl ConfigService {
    pub const BASE: &'static str = "config";

    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            resource: Resource::new(transport, Self::BASE),
        }
    }

    pub async fn get(&self) -> Result<Value, Error> {
        self.resource.get_document().await
    }

    /// `PUT /config`. The response may be a partial document.
    pub async fn update(&self, payload: &(impl Serialize + Sync)) -> Result<Value, Error> {
        self.resource.put_document(payload).await
    }
}
