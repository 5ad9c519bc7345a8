use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Entity, take_key, take_string};

/// A scheduled or completed automation job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct JobRecord {
    pub job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for JobRecord {
    type Error = String;

    fn try_from(mut raw: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            job_id: take_key(&mut raw, "job_id")?,
            account_id: take_string(&mut raw, "account_id"),
            job_type: take_string(&mut raw, "type"),
            status: take_string(&mut raw, "status"),
            scheduled_at: take_string(&mut raw, "scheduled_at"),
            created_at: take_string(&mut raw, "created_at"),
            extra: raw,
        })
    }
}

impl Entity for JobRecord {
    const KIND: &'static str = "job";

    fn key(&self) -> &str {
        &self.job_id
    }
}

/// Payload for scheduling a job. Anything beyond the typed fields goes
/// into `params` and is sent at the top level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    #[serde(default)]
    pub account_id: String,
    #[serde(rename = "type", default)]
    pub job_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<String>,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl JobRequest {
    pub fn new(account_id: impl Into<String>, job_type: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            job_type: job_type.into(),
            ..Self::default()
        }
    }
}
