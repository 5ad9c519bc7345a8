// postdeck-api: HTTP transport, envelope codec, and per-resource services
// for the postdeck automation backend.

pub mod client;
pub mod envelope;
pub mod error;
pub mod query;
pub mod service;
pub mod transport;

pub use client::HttpTransport;
pub use envelope::{Envelope, ErrorBody, Meta, Pagination};
pub use error::Error;
pub use query::{ListQuery, SortOrder};
pub use service::{
    AccountService, ConfigService, DashboardService, JobService, Resource, SelectorService,
};
pub use transport::{Method, Request, TlsMode, Transport, TransportConfig};
