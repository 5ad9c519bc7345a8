// postdeck-core: Reactive data layer between postdeck-api and consumers.

pub mod config;
pub mod console;
pub mod error;
pub mod feature;
pub mod model;
pub mod normalize;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, TlsVerification};
pub use console::Console;
pub use error::{CoreError, ErrorCode, ErrorInfo, classify};
pub use feature::{
    AccountsFeature, ConfigFeature, DashboardFeature, JobsFeature, OpKind, OperationStatus,
    SUCCESS_PULSE_WINDOW, SelectorsFeature,
};
pub use normalize::Listing;
pub use store::{CollectionSnapshot, DataStore, DocumentSnapshot, DocumentStore, EntityStore};
pub use stream::StoreStream;

pub use model::{
    Account, AccountStats, ConfigDocument, DashboardSnapshot, Entity, JobRecord, JobRequest,
    NewAccount, SelectorSet, SelectorVersion,
};

// Query types callers pass straight through to list operations.
pub use postdeck_api::{ListQuery, Pagination, SortOrder};
