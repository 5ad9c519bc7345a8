// ── Features ──
//
// Async orchestration over one service and one store: start a tracked
// call, await the service, normalize the payload, and, unless a newer read
// of the same scope has started, write the store and settle the status.
// A superseded read never touches shared state; mutations always settle.

mod accounts;
mod config;
mod dashboard;
mod jobs;
mod selectors;
mod tracker;

use std::future::Future;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{CoreError, classify};
use crate::model::Entity;
use crate::normalize::{decode, decode_list};
use crate::store::{EntityStore, ErrorSlot};

pub use accounts::AccountsFeature;
pub use config::ConfigFeature;
pub use dashboard::DashboardFeature;
pub use jobs::JobsFeature;
pub use selectors::SelectorsFeature;
pub use tracker::{OpKind, OpTracker, OperationStatus, SUCCESS_PULSE_WINDOW, Ticket};

use tracker::Completion;

type ApiResult = Result<Value, postdeck_api::Error>;

/// Outcome of a tracked call as seen by its direct caller.
#[derive(Debug)]
pub(crate) enum Settled<T> {
    /// Current call succeeded; state was written.
    Applied(T),
    /// Current call failed; the failure was recorded.
    Failed(CoreError),
    /// A newer read of the same scope exists; state was left alone.
    Superseded(Result<T, CoreError>),
}

impl<T> Settled<T> {
    /// The value handed back to the caller, whether or not it was applied.
    pub(crate) fn value(self) -> Option<T> {
        match self {
            Self::Applied(value) | Self::Superseded(Ok(value)) => Some(value),
            Self::Failed(_) | Self::Superseded(Err(_)) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OnSuccess {
    Quiet,
    Pulse,
}

/// Settle `ticket` with `outcome`.
///
/// For a current call, success runs `apply` and clears the store's
/// `last_error`; failure is classified and recorded on both the feature
/// status and the store.
pub(crate) fn settle<T>(
    tracker: &OpTracker,
    ticket: Ticket,
    slot: &dyn ErrorSlot,
    outcome: Result<T, CoreError>,
    on_success: OnSuccess,
    apply: impl FnOnce(&T),
) -> Settled<T> {
    let current = tracker.finish(&ticket, |current| {
        if !current {
            return Completion::Superseded;
        }
        match &outcome {
            Ok(value) => {
                apply(value);
                slot.record_error(None);
                match on_success {
                    OnSuccess::Quiet => Completion::Done,
                    OnSuccess::Pulse => Completion::Pulse,
                }
            }
            Err(err) => {
                let info = classify(err);
                warn!(op = %ticket.kind(), code = %info.code, "{}", info.message);
                slot.record_error(Some(info.message.clone()));
                Completion::Failed(info)
            }
        }
    });

    match (current, outcome) {
        (true, Ok(value)) => Settled::Applied(value),
        (true, Err(err)) => Settled::Failed(err),
        (false, outcome) => {
            debug!(op = %ticket.kind(), "discarding superseded response");
            Settled::Superseded(outcome)
        }
    }
}

/// Fail a call locally, before any request is issued.
pub(crate) fn reject<T>(tracker: &OpTracker, kind: OpKind, slot: &dyn ErrorSlot, err: CoreError) -> Settled<T> {
    let ticket = tracker.begin(kind);
    settle(tracker, ticket, slot, Err(err), OnSuccess::Quiet, |_: &T| {})
}

// ── Shared keyed-entity operations ───────────────────────────────────

/// Fetch-all: normalize the list payload and replace the collection.
pub(crate) async fn fetch_collection<E, S>(
    tracker: &OpTracker,
    store: &EntityStore<E, S>,
    call: impl Future<Output = ApiResult>,
) -> Result<(), CoreError>
where
    E: Entity,
    S: Clone + Send + Sync + 'static,
{
    let ticket = tracker.begin(OpKind::FetchAll);
    refresh_collection(tracker, ticket, store, call).await
}

/// Fetch-all under a ticket the caller already holds.
pub(crate) async fn refresh_collection<E, S>(
    tracker: &OpTracker,
    ticket: Ticket,
    store: &EntityStore<E, S>,
    call: impl Future<Output = ApiResult>,
) -> Result<(), CoreError>
where
    E: Entity,
    S: Clone + Send + Sync + 'static,
{
    let outcome = match call.await {
        Ok(payload) => decode_list::<E>(payload, E::KIND),
        Err(err) => Err(err.into()),
    };

    let settled = settle(tracker, ticket, store, outcome, OnSuccess::Quiet, |listing| {
        store.set_all(listing.items.clone(), listing.pagination.clone());
    });
    match settled {
        Settled::Failed(err) => Err(err),
        Settled::Applied(listing) => {
            debug!(kind = E::KIND, count = listing.items.len(), "collection refreshed");
            Ok(())
        }
        Settled::Superseded(_) => Ok(()),
    }
}

/// Fetch-one: decode the entity and make it the selection.
pub(crate) async fn fetch_entity<E, S>(
    tracker: &OpTracker,
    store: &EntityStore<E, S>,
    call: impl Future<Output = ApiResult>,
) -> Option<E>
where
    E: Entity,
    S: Clone + Send + Sync + 'static,
{
    let ticket = tracker.begin(OpKind::FetchOne);
    let outcome = match call.await {
        Ok(payload) => decode::<E>(payload, E::KIND),
        Err(err) => Err(err.into()),
    };

    settle(tracker, ticket, store, outcome, OnSuccess::Quiet, |entity| {
        store.focus(entity.clone());
    })
    .value()
}

/// Create or update: decode the saved entity, upsert it, raise the pulse.
/// Two saves in flight both land, in the order the backend answers.
pub(crate) async fn save_entity<E, S>(
    tracker: &OpTracker,
    store: &EntityStore<E, S>,
    kind: OpKind,
    call: impl Future<Output = ApiResult>,
) -> Option<E>
where
    E: Entity,
    S: Clone + Send + Sync + 'static,
{
    let ticket = tracker.begin(kind);
    let outcome = match call.await {
        Ok(payload) => decode::<E>(payload, E::KIND),
        Err(err) => Err(err.into()),
    };

    let settled = settle(tracker, ticket, store, outcome, OnSuccess::Pulse, |entity| {
        store.upsert(entity.clone());
    });
    if let Settled::Applied(ref entity) = settled {
        info!(kind = E::KIND, key = entity.key(), op = %kind, "saved");
    }
    settled.value()
}

/// Delete: drop `key` from the store once the backend confirms, whatever
/// other deletes are in flight.
pub(crate) async fn delete_entity<E, S>(
    tracker: &OpTracker,
    store: &EntityStore<E, S>,
    key: &str,
    call: impl Future<Output = ApiResult>,
) -> bool
where
    E: Entity,
    S: Clone + Send + Sync + 'static,
{
    let ticket = tracker.begin(OpKind::Delete);
    let outcome = call.await.map_err(CoreError::from);

    let settled = settle(tracker, ticket, store, outcome, OnSuccess::Quiet, |_| {
        store.remove(key);
    });
    if let Settled::Applied(_) = settled {
        info!(kind = E::KIND, key, "deleted");
    }
    settled.value().is_some()
}
