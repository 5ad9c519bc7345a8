// ── Per-instance operation tracking ──
//
// Every feature call takes a `Ticket`. Reads are stamped with a generation
// scoped to their kind (fetch-all, fetch-one) or to kind and key (stats,
// versions); only the newest read of a scope may settle state. Mutations
// carry no generation: the backend has already applied them, so their
// confirmed result is always written. The success pulse is a cancellable
// timer that a new create or update cancels.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::ErrorInfo;

/// How long `save_success` stays raised after a successful save.
pub const SUCCESS_PULSE_WINDOW: Duration = Duration::from_secs(3);

/// UI-facing status of one feature instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationStatus {
    /// `true` while any call of the instance is in flight.
    pub loading: bool,
    /// Classified failure of the latest current operation.
    pub failure: Option<ErrorInfo>,
    /// Transient flag raised after a successful create or update.
    pub save_success: bool,
}

impl OperationStatus {
    /// The failure message to show, if any.
    pub fn error(&self) -> Option<&str> {
        self.failure.as_ref().map(|f| f.message.as_str())
    }
}

/// Operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    FetchAll,
    FetchOne,
    FetchStats,
    FetchVersions,
    Create,
    Update,
    Delete,
}

impl OpKind {
    /// Create, update and delete change backend state.
    pub fn is_mutation(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }

    fn is_save(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FetchAll => "fetch-all",
            Self::FetchOne => "fetch-one",
            Self::FetchStats => "fetch-stats",
            Self::FetchVersions => "fetch-versions",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Proof of a started call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    kind: OpKind,
    scope: String,
    /// `None` for mutations, which are never superseded.
    generation: Option<u64>,
}

impl Ticket {
    pub fn kind(&self) -> OpKind {
        self.kind
    }
}

/// How a call ended, decided while the tracker is locked.
#[derive(Debug)]
pub(crate) enum Completion {
    /// A newer read of the same scope exists; nothing is touched.
    Superseded,
    Done,
    /// Success that raises the save pulse.
    Pulse,
    Failed(ErrorInfo),
}

#[derive(Default)]
struct TrackerState {
    generations: HashMap<(OpKind, String), u64>,
    in_flight: usize,
    pulse: Option<CancellationToken>,
}

struct TrackerInner {
    status: watch::Sender<OperationStatus>,
    state: Mutex<TrackerState>,
    pulse_window: Duration,
}

/// Status machine shared by the calls of one feature instance.
#[derive(Clone)]
pub struct OpTracker {
    inner: Arc<TrackerInner>,
}

impl OpTracker {
    pub fn new(pulse_window: Duration) -> Self {
        let (status, _) = watch::channel(OperationStatus::default());
        Self {
            inner: Arc::new(TrackerInner {
                status,
                state: Mutex::new(TrackerState::default()),
                pulse_window,
            }),
        }
    }

    pub fn status(&self) -> OperationStatus {
        self.inner.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OperationStatus> {
        self.inner.status.subscribe()
    }

    /// Start a call whose reads supersede each other across the whole kind.
    pub fn begin(&self, kind: OpKind) -> Ticket {
        self.start(kind, "")
    }

    /// Start a read that only competes with reads of the same `key`.
    pub fn begin_for(&self, kind: OpKind, key: &str) -> Ticket {
        self.start(kind, key)
    }

    /// Whether `ticket` may still settle state.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        Self::current(&self.lock(), ticket)
    }

    /// End a call. `settle` runs under the tracker lock with the ticket's
    /// currency, so no newer call can start between the check and the
    /// writes it performs. Returns whether the ticket was current.
    pub(crate) fn finish(&self, ticket: &Ticket, settle: impl FnOnce(bool) -> Completion) -> bool {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        let current = Self::current(&state, ticket);
        let completion = settle(current);
        let loading = state.in_flight > 0;

        match completion {
            Completion::Superseded | Completion::Done => {
                self.inner.status.send_modify(|status| status.loading = loading);
            }
            Completion::Failed(info) => {
                self.inner.status.send_modify(|status| {
                    status.loading = loading;
                    status.failure = Some(info);
                });
            }
            Completion::Pulse => {
                self.inner.status.send_modify(|status| status.loading = loading);
                self.raise_pulse(&mut state);
            }
        }
        current
    }

    /// Raise the success pulse outside of `finish`.
    pub(crate) fn pulse(&self) {
        let mut state = self.lock();
        self.raise_pulse(&mut state);
    }

    pub fn clear_error(&self) {
        self.inner.status.send_modify(|status| status.failure = None);
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn lock(&self) -> std::sync::MutexGuard<'_, TrackerState> {
        self.inner.state.lock().expect("tracker lock poisoned")
    }

    fn start(&self, kind: OpKind, scope: &str) -> Ticket {
        let mut state = self.lock();
        let generation = if kind.is_mutation() {
            None
        } else {
            let counter = state.generations.entry((kind, scope.to_owned())).or_insert(0);
            *counter += 1;
            Some(*counter)
        };
        state.in_flight += 1;

        let saving = kind.is_save();
        if saving {
            if let Some(token) = state.pulse.take() {
                token.cancel();
            }
        }
        self.inner.status.send_modify(|status| {
            status.loading = true;
            status.failure = None;
            if saving {
                status.save_success = false;
            }
        });

        Ticket {
            kind,
            scope: scope.to_owned(),
            generation,
        }
    }

    fn current(state: &TrackerState, ticket: &Ticket) -> bool {
        match ticket.generation {
            None => true,
            Some(generation) => {
                state.generations.get(&(ticket.kind, ticket.scope.clone())) == Some(&generation)
            }
        }
    }

    fn raise_pulse(&self, state: &mut TrackerState) {
        let token = CancellationToken::new();
        if let Some(previous) = state.pulse.replace(token.clone()) {
            previous.cancel();
        }
        self.inner
            .status
            .send_modify(|status| status.save_success = true);

        let inner = Arc::downgrade(&self.inner);
        let window = self.inner.pulse_window;
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(window) => lower_pulse(&inner, &token),
            }
        });
    }
}

fn lower_pulse(inner: &Weak<TrackerInner>, token: &CancellationToken) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let mut state = inner.state.lock().expect("tracker lock poisoned");
    // A newer save may have cancelled or replaced this pulse meanwhile.
    if token.is_cancelled() {
        return;
    }
    state.pulse = None;
    inner
        .status
        .send_modify(|status| status.save_success = false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn failure(message: &str) -> ErrorInfo {
        ErrorInfo {
            code: ErrorCode::HttpError,
            message: message.into(),
            details: None,
        }
    }

    #[test]
    fn newer_read_supersedes_older_of_same_kind() {
        let tracker = OpTracker::new(SUCCESS_PULSE_WINDOW);
        let first = tracker.begin(OpKind::FetchAll);
        let second = tracker.begin(OpKind::FetchAll);
        let other = tracker.begin(OpKind::FetchOne);

        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));
        assert!(tracker.is_current(&other));
    }

    #[test]
    fn mutations_are_never_superseded() {
        let tracker = OpTracker::new(SUCCESS_PULSE_WINDOW);
        let first = tracker.begin(OpKind::Delete);
        let second = tracker.begin(OpKind::Delete);
        let update = tracker.begin(OpKind::Update);
        let again = tracker.begin(OpKind::Update);

        assert!(tracker.is_current(&first));
        assert!(tracker.is_current(&second));
        assert!(tracker.is_current(&update));
        assert!(tracker.is_current(&again));
    }

    #[test]
    fn keyed_reads_compete_per_key() {
        let tracker = OpTracker::new(SUCCESS_PULSE_WINDOW);
        let a = tracker.begin_for(OpKind::FetchStats, "a");
        let b = tracker.begin_for(OpKind::FetchStats, "b");
        let a_again = tracker.begin_for(OpKind::FetchStats, "a");

        assert!(!tracker.is_current(&a));
        assert!(tracker.is_current(&b));
        assert!(tracker.is_current(&a_again));
    }

    #[test]
    fn loading_holds_until_last_call_finishes() {
        let tracker = OpTracker::new(SUCCESS_PULSE_WINDOW);
        let a = tracker.begin(OpKind::FetchAll);
        let b = tracker.begin(OpKind::FetchOne);

        tracker.finish(&a, |_| Completion::Done);
        assert!(tracker.status().loading);
        tracker.finish(&b, |_| Completion::Done);
        assert!(!tracker.status().loading);
    }

    #[test]
    fn superseded_failure_is_not_recorded() {
        let tracker = OpTracker::new(SUCCESS_PULSE_WINDOW);
        let old = tracker.begin(OpKind::FetchAll);
        let new = tracker.begin(OpKind::FetchAll);

        let current = tracker.finish(&old, |current| {
            if current {
                Completion::Failed(failure("stale"))
            } else {
                Completion::Superseded
            }
        });
        assert!(!current);
        assert!(tracker.status().failure.is_none());

        tracker.finish(&new, |_| Completion::Failed(failure("fresh")));
        assert_eq!(tracker.status().error(), Some("fresh"));

        tracker.clear_error();
        assert!(tracker.status().error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn pulse_clears_after_window() {
        let tracker = OpTracker::new(SUCCESS_PULSE_WINDOW);
        let t = tracker.begin(OpKind::Update);
        tracker.finish(&t, |_| Completion::Pulse);
        assert!(tracker.status().save_success);

        tokio::time::sleep(SUCCESS_PULSE_WINDOW - Duration::from_millis(10)).await;
        assert!(tracker.status().save_success);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!tracker.status().save_success);
    }

    #[tokio::test(start_paused = true)]
    async fn new_call_cancels_pending_pulse() {
        let tracker = OpTracker::new(SUCCESS_PULSE_WINDOW);
        let t = tracker.begin(OpKind::Update);
        tracker.finish(&t, |_| Completion::Pulse);

        tokio::time::sleep(Duration::from_secs(2)).await;
        let t = tracker.begin(OpKind::Update);
        assert!(!tracker.status().save_success);
        tracker.finish(&t, |_| Completion::Pulse);

        // The first timer would have fired at 3s; the second runs until 5s.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(tracker.status().save_success);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!tracker.status().save_success);
    }

    #[tokio::test(start_paused = true)]
    async fn reads_leave_pending_pulse_alone() {
        let tracker = OpTracker::new(SUCCESS_PULSE_WINDOW);
        let t = tracker.begin(OpKind::Create);
        tracker.finish(&t, |_| Completion::Pulse);

        let read = tracker.begin(OpKind::FetchAll);
        assert!(tracker.status().save_success);
        tracker.finish(&read, |_| Completion::Done);
        assert!(tracker.status().save_success);

        tokio::time::sleep(SUCCESS_PULSE_WINDOW + Duration::from_millis(10)).await;
        assert!(!tracker.status().save_success);
    }
}
