#![allow(clippy::unwrap_used)]
// Feature behaviour against a scripted in-memory transport.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use postdeck_api::{Error, Method, Request, Transport};
use postdeck_core::{Console, ErrorCode, JobRequest, ListQuery, NewAccount, SUCCESS_PULSE_WINDOW};

// ── Scripted transport ──────────────────────────────────────────────

#[derive(Clone)]
enum Reply {
    Ok(Value),
    Http {
        status: u16,
        code: Option<&'static str>,
        message: &'static str,
        details: Option<Value>,
    },
    Network(&'static str),
}

struct Route {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    delay: Option<Duration>,
    reply: Reply,
}

#[derive(Default)]
struct ScriptedTransport {
    routes: Mutex<Vec<Route>>,
    calls: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    fn on(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.route(method, path, &[], None, reply)
    }

    fn route(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        delay: Option<Duration>,
        reply: Reply,
    ) -> &Self {
        self.routes.lock().unwrap().push(Route {
            method,
            path: path.to_owned(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            delay,
            reply,
        });
        self
    }

    fn calls(&self) -> Vec<(Method, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| (r.method, r.path()))
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: Request) -> Result<Value, Error> {
        self.calls.lock().unwrap().push(request.clone());

        let matched = {
            let routes = self.routes.lock().unwrap();
            routes
                .iter()
                .find(|route| {
                    route.method == request.method
                        && route.path == request.path()
                        && route.query.iter().all(|pair| request.query.contains(pair))
                })
                .map(|route| (route.delay, route.reply.clone()))
        };
        let Some((delay, reply)) = matched else {
            return Err(Error::Http {
                status: 404,
                code: Some("NOT_FOUND".into()),
                message: format!("no route for {} {}", request.method, request.path()),
                details: None,
            });
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Ok(value) => Ok(value),
            Reply::Http {
                status,
                code,
                message,
                details,
            } => Err(Error::Http {
                status,
                code: code.map(str::to_owned),
                message: message.to_owned(),
                details,
            }),
            Reply::Network(message) => Err(Error::Network {
                message: message.to_owned(),
            }),
        }
    }
}

fn setup() -> (Arc<ScriptedTransport>, Console) {
    let transport = Arc::new(ScriptedTransport::default());
    let console = Console::with_transport(transport.clone());
    (transport, console)
}

fn accounts_json(ids: &[&str]) -> Value {
    Value::Array(ids.iter().map(|id| json!({ "account_id": id })).collect())
}

fn account_keys(console: &Console) -> Vec<String> {
    console
        .store()
        .accounts()
        .snapshot()
        .keys()
        .map(str::to_owned)
        .collect()
}

// ── Fetch-all and shape normalization ───────────────────────────────

#[tokio::test]
async fn test_fetch_all_bare_array() {
    let (transport, console) = setup();
    transport.on(Method::Get, "/accounts", Reply::Ok(accounts_json(&["a", "b"])));

    let accounts = console.accounts();
    accounts.fetch_accounts(&ListQuery::default()).await.unwrap();

    assert_eq!(account_keys(&console), vec!["a", "b"]);
    assert!(!accounts.status().loading);
    assert!(accounts.status().failure.is_none());
}

#[tokio::test]
async fn test_fetch_all_wrapped_keeps_pagination() {
    let (transport, console) = setup();
    transport.on(
        Method::Get,
        "/accounts",
        Reply::Ok(json!({
            "data": [{ "account_id": "a" }, { "account_id": "b" }],
            "pagination": { "page": 1, "limit": 2, "total": 5, "total_pages": 3,
                            "has_next": true, "has_prev": false }
        })),
    );

    console
        .accounts()
        .fetch_accounts(&ListQuery::new().page(1, 2))
        .await
        .unwrap();

    assert_eq!(account_keys(&console), vec!["a", "b"]);
    let snap = console.store().accounts().snapshot();
    assert_eq!(snap.pagination.as_ref().map(|p| p.total), Some(5));
}

#[tokio::test]
async fn test_fetch_all_unrecognized_shapes_are_empty() {
    for payload in [json!({}), Value::Null, json!("maintenance")] {
        let (transport, console) = setup();
        transport.on(Method::Get, "/accounts", Reply::Ok(payload));

        let accounts = console.accounts();
        accounts.fetch_accounts(&ListQuery::default()).await.unwrap();

        assert!(account_keys(&console).is_empty());
        assert!(accounts.status().failure.is_none());
        assert!(console.store().accounts().last_error().is_none());
    }
}

#[tokio::test]
async fn test_fetch_all_failure_records_and_success_clears() {
    let (transport, console) = setup();
    transport.on(
        Method::Get,
        "/accounts",
        Reply::Http {
            status: 500,
            code: None,
            message: "Request failed with status code 500",
            details: None,
        },
    );

    let accounts = console.accounts();
    let err = accounts
        .fetch_accounts(&ListQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status code 500");

    let status = accounts.status();
    assert_eq!(status.failure.as_ref().map(|f| f.code.clone()), Some(ErrorCode::HttpError));
    assert_eq!(
        console.store().accounts().last_error().as_deref(),
        Some("Request failed with status code 500")
    );

    // First matching route wins, so swap the script for a healthy reply.
    transport.routes.lock().unwrap().clear();
    transport.on(Method::Get, "/accounts", Reply::Ok(accounts_json(&["a"])));
    accounts.fetch_accounts(&ListQuery::default()).await.unwrap();

    assert!(accounts.status().failure.is_none());
    assert!(console.store().accounts().last_error().is_none());
}

#[tokio::test]
async fn test_network_failure_classified() {
    let (transport, console) = setup();
    transport.on(Method::Get, "/jobs", Reply::Network("connection refused"));

    let jobs = console.jobs();
    assert!(jobs.fetch_jobs(&ListQuery::default()).await.is_err());

    let failure = jobs.status().failure.unwrap();
    assert_eq!(failure.code, ErrorCode::NetworkError);
    assert_eq!(failure.message, "connection refused");
    assert!(failure.details.is_none());
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_validation_error_round_trip() {
    let (transport, console) = setup();
    transport.on(
        Method::Post,
        "/accounts",
        Reply::Http {
            status: 400,
            code: Some("VALIDATION_ERROR"),
            message: "Invalid input",
            details: Some(json!({ "field": "account_id" })),
        },
    );

    let accounts = console.accounts();
    assert!(accounts.create_account(&NewAccount::new("dup")).await.is_none());

    let failure = accounts.status().failure.unwrap();
    assert_eq!(failure.code, ErrorCode::ValidationError);
    assert_eq!(failure.message, "Invalid input");
    assert_eq!(failure.details, Some(json!({ "field": "account_id" })));
    assert!(failure.is_validation_error());
}

#[tokio::test]
async fn test_clear_error_clears_feature_and_store() {
    let (transport, console) = setup();
    transport.on(Method::Get, "/dashboard/stats", Reply::Network("timed out"));

    let dashboard = console.dashboard();
    assert!(dashboard.fetch_dashboard().await.is_none());
    assert_eq!(dashboard.status().error(), Some("timed out"));
    assert!(console.store().dashboard().last_error().is_some());

    dashboard.clear_error();
    assert!(dashboard.status().error().is_none());
    assert!(console.store().dashboard().last_error().is_none());
}

// ── Accounts ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_account_requires_id_locally() {
    let (transport, console) = setup();

    let accounts = console.accounts();
    assert!(accounts.create_account(&NewAccount::new("")).await.is_none());

    assert!(transport.calls().is_empty());
    let status = accounts.status();
    assert_eq!(status.error(), Some("Account ID is required"));
    assert!(status.failure.unwrap().is_validation_error());
    assert_eq!(
        console.store().accounts().last_error().as_deref(),
        Some("Account ID is required")
    );
    assert!(!status.loading);
}

#[tokio::test(start_paused = true)]
async fn test_create_account_refetches_then_pulses() {
    let (transport, console) = setup();
    transport
        .on(
            Method::Post,
            "/accounts",
            Reply::Ok(json!({ "account_id": "new", "platform": "instagram" })),
        )
        .on(Method::Get, "/accounts", Reply::Ok(accounts_json(&["old", "new"])));

    let accounts = console.accounts();
    let created = accounts
        .create_account(&NewAccount::new("new"))
        .await
        .unwrap();
    assert_eq!(created.platform.as_deref(), Some("instagram"));

    assert_eq!(
        transport.calls(),
        vec![
            (Method::Post, "/accounts".to_owned()),
            (Method::Get, "/accounts".to_owned()),
        ]
    );
    assert_eq!(account_keys(&console), vec!["old", "new"]);
    assert!(accounts.status().save_success);

    tokio::time::sleep(SUCCESS_PULSE_WINDOW + Duration::from_millis(10)).await;
    assert!(!accounts.status().save_success);
}

#[tokio::test]
async fn test_delete_selected_account() {
    let (transport, console) = setup();
    transport
        .on(Method::Get, "/accounts", Reply::Ok(accounts_json(&["42", "43"])))
        .on(Method::Delete, "/accounts/42", Reply::Ok(json!({ "deleted": true })));

    let accounts = console.accounts();
    accounts.fetch_accounts(&ListQuery::default()).await.unwrap();
    console.store().accounts().select_key("42");

    assert!(accounts.delete_account("42").await);
    assert_eq!(account_keys(&console), vec!["43"]);
    assert!(console.store().accounts().selected().is_none());
    assert!(transport.calls().contains(&(Method::Delete, "/accounts/42".to_owned())));
}

#[tokio::test]
async fn test_delete_failure_keeps_collection() {
    let (transport, console) = setup();
    transport
        .on(Method::Get, "/accounts", Reply::Ok(accounts_json(&["42"])))
        .on(
            Method::Delete,
            "/accounts/42",
            Reply::Http {
                status: 409,
                code: Some("CONFLICT"),
                message: "Account has running jobs",
                details: None,
            },
        );

    let accounts = console.accounts();
    accounts.fetch_accounts(&ListQuery::default()).await.unwrap();

    assert!(!accounts.delete_account("42").await);
    assert_eq!(account_keys(&console), vec!["42"]);
    assert!(accounts.status().failure.unwrap().is_conflict());
}

#[tokio::test]
async fn test_fetch_account_and_stats() {
    let (transport, console) = setup();
    transport
        .on(
            Method::Get,
            "/accounts/42",
            Reply::Ok(json!({ "account_id": "42", "status": "active" })),
        )
        .on(
            Method::Get,
            "/accounts/42/stats",
            Reply::Ok(json!({ "total_jobs": 10, "failed_jobs": 1 })),
        );

    let accounts = console.accounts();
    let account = accounts.fetch_account("42").await.unwrap();
    assert_eq!(account.status.as_deref(), Some("active"));
    assert_eq!(
        console.store().accounts().snapshot().selected_key(),
        Some("42")
    );

    let stats = accounts.fetch_account_stats("42").await.unwrap();
    assert_eq!(stats.total_jobs, 10);
    assert_eq!(console.store().accounts().stats("42"), Some(stats));
}

#[tokio::test]
async fn test_update_account_upserts() {
    let (transport, console) = setup();
    transport
        .on(Method::Get, "/accounts", Reply::Ok(accounts_json(&["42"])))
        .on(
            Method::Put,
            "/accounts/42",
            Reply::Ok(json!({ "account_id": "42", "status": "paused" })),
        );

    let accounts = console.accounts();
    accounts.fetch_accounts(&ListQuery::default()).await.unwrap();
    let updated = accounts
        .update_account("42", &json!({ "status": "paused" }))
        .await
        .unwrap();

    assert_eq!(updated.status.as_deref(), Some("paused"));
    assert_eq!(
        console.store().accounts().by_key("42").unwrap().status.as_deref(),
        Some("paused")
    );
    assert!(accounts.status().save_success);
}

#[tokio::test]
async fn test_create_account_keeps_refetched_record() {
    let (transport, console) = setup();
    transport
        .on(Method::Post, "/accounts", Reply::Ok(json!({ "account_id": "new" })))
        .on(
            Method::Get,
            "/accounts",
            Reply::Ok(json!([{ "account_id": "new", "status": "active" }])),
        );

    let accounts = console.accounts();
    let created = accounts
        .create_account(&NewAccount::new("new"))
        .await
        .unwrap();
    assert!(created.status.is_none());

    let stored = console.store().accounts().by_key("new").unwrap();
    assert_eq!(stored.status.as_deref(), Some("active"));
}

#[tokio::test]
async fn test_create_account_refetch_failure_falls_back_to_reply() {
    let (transport, console) = setup();
    transport
        .on(
            Method::Post,
            "/accounts",
            Reply::Ok(json!({ "account_id": "new", "platform": "instagram" })),
        )
        .on(Method::Get, "/accounts", Reply::Network("refetch down"));

    let accounts = console.accounts();
    assert!(accounts.create_account(&NewAccount::new("new")).await.is_some());

    let status = accounts.status();
    assert_eq!(status.error(), Some("refetch down"));
    assert_eq!(
        console.store().accounts().last_error().as_deref(),
        Some("refetch down")
    );
    assert!(!status.loading);
    let stored = console.store().accounts().by_key("new").unwrap();
    assert_eq!(stored.platform.as_deref(), Some("instagram"));
}

#[tokio::test]
async fn test_create_account_refetch_reuses_last_query() {
    let (transport, console) = setup();
    transport
        .route(
            Method::Get,
            "/accounts",
            &[("platform", "instagram")],
            None,
            Reply::Ok(accounts_json(&["a", "b"])),
        )
        .on(
            Method::Post,
            "/accounts",
            Reply::Ok(json!({ "account_id": "b", "platform": "instagram" })),
        );

    let accounts = console.accounts();
    accounts
        .fetch_accounts(&ListQuery::new().filter("platform", "instagram"))
        .await
        .unwrap();
    accounts.create_account(&NewAccount::new("b")).await.unwrap();

    let refetch = transport.calls.lock().unwrap().last().cloned().unwrap();
    assert_eq!(refetch.method, Method::Get);
    assert!(
        refetch
            .query
            .contains(&("platform".to_owned(), "instagram".to_owned()))
    );
    assert!(accounts.status().failure.is_none());
    assert_eq!(account_keys(&console), vec!["a", "b"]);
}

#[tokio::test]
async fn test_mistyped_field_does_not_fail_the_list() {
    let (transport, console) = setup();
    transport.on(
        Method::Get,
        "/accounts",
        Reply::Ok(json!([
            { "account_id": "a", "created_at": 1_718_000_000 },
            { "account_id": "b" }
        ])),
    );

    let accounts = console.accounts();
    accounts.fetch_accounts(&ListQuery::default()).await.unwrap();

    assert_eq!(account_keys(&console), vec!["a", "b"]);
    let first = console.store().accounts().by_key("a").unwrap();
    assert!(first.created_at.is_none());
    assert_eq!(first.extra["created_at"], json!(1_718_000_000));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_deletes_both_land() {
    let (transport, console) = setup();
    transport
        .on(Method::Get, "/accounts", Reply::Ok(accounts_json(&["42", "43", "44"])))
        .route(
            Method::Delete,
            "/accounts/42",
            &[],
            Some(Duration::from_millis(100)),
            Reply::Ok(json!({ "deleted": true })),
        )
        .route(
            Method::Delete,
            "/accounts/43",
            &[],
            Some(Duration::from_millis(10)),
            Reply::Ok(json!({ "deleted": true })),
        );

    let accounts = console.accounts();
    accounts.fetch_accounts(&ListQuery::default()).await.unwrap();
    let (slow, fast) = tokio::join!(
        accounts.delete_account("42"),
        accounts.delete_account("43"),
    );

    assert!(slow);
    assert!(fast);
    assert_eq!(account_keys(&console), vec!["44"]);
    assert!(!accounts.status().loading);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_updates_both_land() {
    let (transport, console) = setup();
    transport
        .on(Method::Get, "/accounts", Reply::Ok(accounts_json(&["42", "43"])))
        .route(
            Method::Put,
            "/accounts/42",
            &[],
            Some(Duration::from_millis(100)),
            Reply::Ok(json!({ "account_id": "42", "status": "paused" })),
        )
        .route(
            Method::Put,
            "/accounts/43",
            &[],
            Some(Duration::from_millis(10)),
            Reply::Ok(json!({ "account_id": "43", "status": "active" })),
        );

    let accounts = console.accounts();
    accounts.fetch_accounts(&ListQuery::default()).await.unwrap();
    let paused = json!({ "status": "paused" });
    let active = json!({ "status": "active" });
    let (slow, fast) = tokio::join!(
        accounts.update_account("42", &paused),
        accounts.update_account("43", &active),
    );

    assert!(slow.is_some());
    assert!(fast.is_some());
    let store = console.store().accounts();
    assert_eq!(store.by_key("42").unwrap().status.as_deref(), Some("paused"));
    assert_eq!(store.by_key("43").unwrap().status.as_deref(), Some("active"));
    assert!(accounts.status().save_success);
}

#[tokio::test(start_paused = true)]
async fn test_stats_for_different_accounts_both_land() {
    let (transport, console) = setup();
    transport
        .route(
            Method::Get,
            "/accounts/a/stats",
            &[],
            Some(Duration::from_millis(100)),
            Reply::Ok(json!({ "total_jobs": 1 })),
        )
        .route(
            Method::Get,
            "/accounts/b/stats",
            &[],
            Some(Duration::from_millis(10)),
            Reply::Ok(json!({ "total_jobs": 2 })),
        );

    let accounts = console.accounts();
    let (a, b) = tokio::join!(
        accounts.fetch_account_stats("a"),
        accounts.fetch_account_stats("b"),
    );

    assert_eq!(a.map(|s| s.total_jobs), Some(1));
    assert_eq!(b.map(|s| s.total_jobs), Some(2));
    let store = console.store().accounts();
    assert_eq!(store.stats("a").map(|s| s.total_jobs), Some(1));
    assert_eq!(store.stats("b").map(|s| s.total_jobs), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_fetch_after_save_keeps_pulse() {
    let (transport, console) = setup();
    transport
        .on(Method::Get, "/accounts", Reply::Ok(accounts_json(&["42"])))
        .on(
            Method::Put,
            "/accounts/42",
            Reply::Ok(json!({ "account_id": "42", "status": "paused" })),
        );

    let accounts = console.accounts();
    accounts
        .update_account("42", &json!({ "status": "paused" }))
        .await
        .unwrap();
    accounts.fetch_accounts(&ListQuery::default()).await.unwrap();
    assert!(accounts.status().save_success);

    tokio::time::sleep(SUCCESS_PULSE_WINDOW + Duration::from_millis(10)).await;
    assert!(!accounts.status().save_success);
}

// ── Jobs ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_job_validates_locally() {
    let (transport, console) = setup();

    let jobs = console.jobs();
    assert!(jobs.create_job(&JobRequest::new("42", "")).await.is_none());
    assert_eq!(jobs.status().error(), Some("Job type is required"));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_create_job_upserts() {
    let (transport, console) = setup();
    transport.on(
        Method::Post,
        "/jobs",
        Reply::Ok(json!({ "job_id": "j1", "account_id": "42", "type": "post" })),
    );

    let jobs = console.jobs();
    let job = jobs.create_job(&JobRequest::new("42", "post")).await.unwrap();
    assert_eq!(job.job_id, "j1");
    assert!(console.store().jobs().by_key("j1").is_some());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_update_and_delete_both_land() {
    let (transport, console) = setup();
    transport
        .on(
            Method::Get,
            "/jobs",
            Reply::Ok(json!([{ "job_id": "j1" }, { "job_id": "j2" }])),
        )
        .route(
            Method::Put,
            "/jobs/j1",
            &[],
            Some(Duration::from_millis(100)),
            Reply::Ok(json!({ "job_id": "j1", "status": "paused" })),
        )
        .route(
            Method::Delete,
            "/jobs/j2",
            &[],
            Some(Duration::from_millis(10)),
            Reply::Ok(json!({ "deleted": true })),
        );

    let jobs = console.jobs();
    jobs.fetch_jobs(&ListQuery::default()).await.unwrap();
    let paused = json!({ "status": "paused" });
    let (updated, deleted) = tokio::join!(
        jobs.update_job("j1", &paused),
        jobs.delete_job("j2"),
    );

    assert!(updated.is_some());
    assert!(deleted);
    let snap = console.store().jobs().snapshot();
    assert_eq!(snap.keys().collect::<Vec<_>>(), vec!["j1"]);
    assert_eq!(
        snap.get("j1").and_then(|j| j.status.as_deref()),
        Some("paused")
    );
}

// ── Selectors ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_out_of_order_responses_keep_latest() {
    let (transport, console) = setup();
    transport
        .route(
            Method::Get,
            "/selectors",
            &[("version", "v1")],
            Some(Duration::from_millis(200)),
            Reply::Ok(json!([{ "platform": "instagram", "version": "v1" }])),
        )
        .route(
            Method::Get,
            "/selectors",
            &[("version", "v2")],
            Some(Duration::from_millis(50)),
            Reply::Ok(json!([{ "platform": "instagram", "version": "v2" }])),
        );

    let selectors = console.selectors();
    let (first, second) = tokio::join!(
        selectors.fetch_selectors(Some("v1")),
        selectors.fetch_selectors(Some("v2")),
    );
    assert!(first.is_ok());
    assert!(second.is_ok());

    let snap = console.store().selectors().snapshot();
    assert_eq!(
        snap.get("instagram").and_then(|s| s.version.as_deref()),
        Some("v2")
    );
    assert!(!selectors.status().loading);
}

#[tokio::test(start_paused = true)]
async fn test_superseded_failure_is_not_recorded() {
    let (transport, console) = setup();
    transport
        .route(
            Method::Get,
            "/jobs",
            &[("status", "failed")],
            Some(Duration::from_millis(100)),
            Reply::Network("reset by peer"),
        )
        .route(
            Method::Get,
            "/jobs",
            &[("status", "done")],
            Some(Duration::from_millis(10)),
            Reply::Ok(json!([{ "job_id": "j2" }])),
        );

    let jobs = console.jobs();
    let failed_query = ListQuery::new().filter("status", "failed");
    let done_query = ListQuery::new().filter("status", "done");
    let (stale, fresh) = tokio::join!(
        jobs.fetch_jobs(&failed_query),
        jobs.fetch_jobs(&done_query),
    );
    assert!(stale.is_ok());
    assert!(fresh.is_ok());
    assert!(jobs.status().failure.is_none());
    assert!(console.store().jobs().by_key("j2").is_some());
}

#[tokio::test(start_paused = true)]
async fn test_superseded_fetch_one_still_returns_value() {
    let (transport, console) = setup();
    transport
        .route(
            Method::Get,
            "/selectors/tiktok",
            &[],
            Some(Duration::from_millis(100)),
            Reply::Ok(json!({ "platform": "tiktok" })),
        )
        .route(
            Method::Get,
            "/selectors/youtube",
            &[],
            Some(Duration::from_millis(10)),
            Reply::Ok(json!({ "platform": "youtube" })),
        );

    let selectors = console.selectors();
    let (stale, fresh) = tokio::join!(
        selectors.fetch_selector("tiktok"),
        selectors.fetch_selector("youtube"),
    );
    assert_eq!(stale.map(|s| s.platform), Some("tiktok".to_owned()));
    assert_eq!(fresh.map(|s| s.platform), Some("youtube".to_owned()));
    assert_eq!(
        console.store().selectors().snapshot().selected_key(),
        Some("youtube")
    );
}

#[tokio::test]
async fn test_selector_versions_land_in_stats() {
    let (transport, console) = setup();
    transport.route(
        Method::Get,
        "/selectors/versions",
        &[("platform", "tiktok")],
        None,
        Reply::Ok(json!([
            { "version": "v3", "is_active": true },
            { "version": "v2" }
        ])),
    );

    let selectors = console.selectors();
    let versions = selectors.fetch_versions("tiktok").await.unwrap();
    assert_eq!(versions.len(), 2);
    assert!(versions[0].is_active());
    assert_eq!(console.store().selectors().stats("tiktok"), Some(versions));
}

// ── Config ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_config_update_deep_merges_reply() {
    let (transport, console) = setup();
    transport
        .on(Method::Get, "/config", Reply::Ok(json!({ "a": { "x": 0, "y": 2 }, "b": true })))
        .on(Method::Put, "/config", Reply::Ok(json!({ "a": { "x": 1 } })));

    let config = console.config();
    config.fetch_config().await.unwrap();
    let merged = config
        .update_config(&json!({ "a": { "x": 1 } }))
        .await
        .unwrap();

    assert_eq!(merged.0, json!({ "a": { "x": 1, "y": 2 }, "b": true }));
    assert_eq!(console.store().config().document(), Some(merged));
    assert!(config.status().save_success);
}

#[tokio::test]
async fn test_config_update_non_object_reply_merges_patch() {
    let (transport, console) = setup();
    transport
        .on(Method::Get, "/config", Reply::Ok(json!({ "a": { "x": 1 } })))
        .on(Method::Put, "/config", Reply::Ok(json!("saved")));

    let config = console.config();
    config.fetch_config().await.unwrap();
    let merged = config.update_config(&json!({ "a": 5 })).await.unwrap();
    assert_eq!(merged.0, json!({ "a": 5 }));
}

#[tokio::test]
async fn test_config_update_rejects_non_object_patch() {
    let (transport, console) = setup();

    let config = console.config();
    assert!(config.update_config(&json!([1, 2])).await.is_none());
    assert!(config.status().failure.unwrap().is_validation_error());
    assert!(transport.calls().is_empty());
}

// ── Dashboard ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_success_stores_snapshot_and_clears_error() {
    let (transport, console) = setup();
    transport.on(Method::Get, "/dashboard/stats", Reply::Network("timed out"));

    let dashboard = console.dashboard();
    assert!(dashboard.fetch_dashboard().await.is_none());
    assert!(console.store().dashboard().last_error().is_some());

    transport.routes.lock().unwrap().clear();
    transport.on(
        Method::Get,
        "/dashboard/stats",
        Reply::Ok(json!({ "total_accounts": 3, "active_jobs": 1, "queue": "warm" })),
    );
    let snapshot = dashboard.fetch_dashboard().await.unwrap();

    assert_eq!(snapshot.total_accounts, 3);
    assert_eq!(snapshot.active_jobs, 1);
    assert_eq!(snapshot.extra["queue"], json!("warm"));
    assert_eq!(console.store().dashboard().document(), Some(snapshot));
    assert!(console.store().dashboard().last_error().is_none());
    assert!(dashboard.status().failure.is_none());
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_loading_while_in_flight() {
    let (transport, console) = setup();
    transport.route(
        Method::Get,
        "/dashboard/stats",
        &[],
        Some(Duration::from_millis(100)),
        Reply::Ok(json!({ "total_accounts": 3 })),
    );

    let dashboard = console.dashboard();
    let task = {
        let dashboard = dashboard.clone();
        tokio::spawn(async move { dashboard.fetch_dashboard().await })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(dashboard.status().loading);

    let snapshot = task.await.unwrap().unwrap();
    assert_eq!(snapshot.total_accounts, 3);
    assert!(!dashboard.status().loading);
}

#[tokio::test]
async fn test_features_share_session_store() {
    let (transport, console) = setup();
    transport.on(Method::Get, "/accounts", Reply::Ok(accounts_json(&["a"])));

    let list_view = console.accounts();
    let detail_view = console.accounts();
    list_view.fetch_accounts(&ListQuery::default()).await.unwrap();

    assert_eq!(detail_view.snapshot().len(), 1);
    // Status is per instance.
    assert!(!detail_view.status().loading);

    console.reset();
    assert!(list_view.snapshot().is_empty());
}
