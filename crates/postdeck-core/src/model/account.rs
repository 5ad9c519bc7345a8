use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Entity, take_key, take_string};

/// A publishing account managed by the automation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Account {
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for Account {
    type Error = String;

    fn try_from(mut raw: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            account_id: take_key(&mut raw, "account_id")?,
            platform: take_string(&mut raw, "platform"),
            username: take_string(&mut raw, "username"),
            display_name: take_string(&mut raw, "display_name"),
            status: take_string(&mut raw, "status"),
            created_at: take_string(&mut raw, "created_at"),
            updated_at: take_string(&mut raw, "updated_at"),
            extra: raw,
        })
    }
}

impl Entity for Account {
    const KIND: &'static str = "account";

    fn key(&self) -> &str {
        &self.account_id
    }
}

/// Payload for creating an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    #[serde(default)]
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewAccount {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Self::default()
        }
    }
}

/// Per-account activity counters from `GET /accounts/{id}/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountStats {
    #[serde(default)]
    pub total_jobs: u64,
    #[serde(default)]
    pub completed_jobs: u64,
    #[serde(default)]
    pub failed_jobs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_fields_survive_round_trip() {
        let raw = json!({
            "account_id": "42",
            "platform": "instagram",
            "proxy": { "host": "10.0.0.1" },
            "warmup_days": 3
        });

        let account: Account = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(account.key(), "42");
        assert_eq!(account.extra["warmup_days"], json!(3));
        assert_eq!(serde_json::to_value(&account).unwrap(), raw);
    }

    #[test]
    fn mistyped_field_is_kept_verbatim() {
        let raw = json!({ "account_id": "a", "created_at": 1_718_000_000, "status": null });

        let account: Account = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(account.created_at, None);
        assert_eq!(account.extra["created_at"], json!(1_718_000_000));
        assert_eq!(serde_json::to_value(&account).unwrap(), raw);
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = serde_json::from_value::<Account>(json!({ "platform": "x" })).unwrap_err();
        assert!(err.to_string().contains("account_id"));
    }

    #[test]
    fn stats_tolerate_missing_counters() {
        let stats: AccountStats = serde_json::from_value(json!({ "failed_jobs": 2 })).unwrap();
        assert_eq!(stats.total_jobs, 0);
        assert_eq!(stats.failed_jobs, 2);
    }
}
