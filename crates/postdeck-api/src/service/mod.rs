// ── Resource services ──
//
// One service per entity type, each bound to a fixed base path. Services
// only build paths and pick verbs: no retries, no caching, no business
// logic. Results are raw payloads; shape handling lives in postdeck-core.

mod accounts;
mod config;
mod dashboard;
mod jobs;
mod selectors;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::Error;
use crate::query::ListQuery;
use crate::transport::{Method, Request, Transport};

pub use accounts::AccountService;
pub use config::ConfigService;
pub use dashboard::DashboardService;
pub use jobs::JobService;
pub use selectors::SelectorService;

/// REST helper shared by all entity services: `GET base`, `GET base/{id}`,
/// `POST base`, `PUT base/{id}`, `DELETE base/{id}`, plus sub-resource reads.
/// `base` is a single path segment; keys are passed as their own segment.
#[derive(Clone)]
pub struct Resource {
    transport: Arc<dyn Transport>,
    base: &'static str,
}

impl Resource {
    pub fn new(transport: Arc<dyn Transport>, base: &'static str) -> Self {
        Self { transport, base }
    }

    pub fn base(&self) -> &'static str {
        self.base
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Value, Error> {
        self.transport
            .send(Request::new(Method::Get, [self.base]).with_query(query.to_params()))
            .await
    }

    pub async fn get(&self, key: &str) -> Result<Value, Error> {
        self.transport
            .send(Request::new(Method::Get, [self.base, key]))
            .await
    }

    pub async fn create(&self, payload: &(impl Serialize + Sync)) -> Result<Value, Error> {
        let body = serde_json::to_value(payload)?;
        self.transport
            .send(Request::new(Method::Post, [self.base]).with_body(body))
            .await
    }

    pub async fn update(&self, key: &str, payload: &(impl Serialize + Sync)) -> Result<Value, Error> {
        let body = serde_json::to_value(payload)?;
        self.transport
            .send(Request::new(Method::Put, [self.base, key]).with_body(body))
            .await
    }

    /// `DELETE base/{key}`, issued explicitly through the transport.
    pub async fn remove(&self, key: &str) -> Result<Value, Error> {
        self.transport
            .send(Request::new(Method::Delete, [self.base, key]))
            .await
    }

    /// `GET base/{key}/{sub}`.
    pub async fn get_nested(&self, key: &str, sub: &str) -> Result<Value, Error> {
        self.transport
            .send(Request::new(Method::Get, [self.base, key, sub]))
            .await
    }

    /// `GET base/{suffix}` for collection-level extensions.
    pub async fn get_extension(
        &self,
        suffix: &str,
        query: Vec<(String, String)>,
    ) -> Result<Value, Error> {
        self.transport
            .send(Request::new(Method::Get, [self.base, suffix]).with_query(query))
            .await
    }

    /// `GET base` for singleton resources.
    pub async fn get_document(&self) -> Result<Value, Error> {
        self.transport
            .send(Request::new(Method::Get, [self.base]))
            .await
    }

    /// `PUT base` for singleton resources.
    pub async fn put_document(&self, payload: &(impl Serialize + Sync)) -> Result<Value, Error> {
        let body = serde_json::to_value(payload)?;
        self.transport
            .send(Request::new(Method::Put, [self.base]).with_body(body))
            .await
    }
}
