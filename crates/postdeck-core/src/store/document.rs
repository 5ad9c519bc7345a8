// ── Singleton document store ──

use std::sync::Arc;

use tokio::sync::watch;

use crate::stream::StoreStream;

/// Point-in-time view of a [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct DocumentSnapshot<D> {
    pub document: Option<D>,
    pub last_error: Option<String>,
}

impl<D> Default for DocumentSnapshot<D> {
    fn default() -> Self {
        Self {
            document: None,
            last_error: None,
        }
    }
}

/// Reactive store for a key-less singleton resource.
pub struct DocumentStore<D> {
    state: watch::Sender<Arc<DocumentSnapshot<D>>>,
}

impl<D> DocumentStore<D>
where
    D: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(DocumentSnapshot::default()));
        Self { state }
    }

    pub fn set(&self, document: D) {
        self.modify(|snap| snap.document = Some(document));
    }

    /// Read-modify-write of the cached document in one step.
    pub fn update(&self, f: impl FnOnce(&mut Option<D>)) {
        self.modify(|snap| f(&mut snap.document));
    }

    pub fn set_error(&self, message: Option<String>) {
        self.modify(|snap| snap.last_error = message);
    }

    pub fn reset(&self) {
        self.state
            .send_modify(|snap| *snap = Arc::new(DocumentSnapshot::default()));
    }

    pub fn snapshot(&self) -> Arc<DocumentSnapshot<D>> {
        self.state.borrow().clone()
    }

    pub fn document(&self) -> Option<D> {
        self.state.borrow().document.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().last_error.clone()
    }

    pub fn subscribe(&self) -> StoreStream<DocumentSnapshot<D>> {
        StoreStream::new(self.state.subscribe())
    }

    fn modify(&self, f: impl FnOnce(&mut DocumentSnapshot<D>)) {
        self.state.send_modify(|snap| f(Arc::make_mut(snap)));
    }
}

impl<D> Default for DocumentStore<D>
where
    D: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
