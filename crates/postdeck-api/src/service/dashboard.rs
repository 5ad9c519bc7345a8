use std::sync::Arc;

use serde_json::Value;

use super::Resource;
use crate::error::Error;
use crate::transport::Transport;

/// Aggregate counters for the dashboard: `/dashboard`.
#[derive(Clone)]
pub struct DashboardService {
    resource: Resource,
}

impl DashboardService {
    pub const BASE: &'static str = "dashboard";

    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            resource: Resource::new(transport, Self::BASE),
        }
    }

    /// `GET /dashboard/stats`.
    pub async fn stats(&self) -> Result<Value, Error> {
        self.resource.get_extension("stats", Vec::new()).await
    }
}
