use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Aggregate counters from `GET /dashboard/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub total_accounts: u64,
    #[serde(default)]
    pub active_jobs: u64,
    #[serde(default)]
    pub failed_jobs: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
