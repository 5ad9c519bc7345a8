// ── Keyed entity store ──
//
// Canonical cached state for one entity type. Synchronous and free of
// I/O: every action rebuilds the snapshot copy-on-write and publishes it
// through a `watch` channel.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use postdeck_api::Pagination;
use serde_json::Value;
use tokio::sync::watch;

use crate::model::Entity;
use crate::stream::StoreStream;

/// Point-in-time view of an [`EntityStore`].
#[derive(Debug, Clone)]
pub struct CollectionSnapshot<E, S = Value> {
    /// Entities in fetch order, unique by key.
    pub collection: IndexMap<String, E>,
    pub selected: Option<E>,
    pub stats_by_key: HashMap<String, S>,
    /// Paging info of the last list call, when the backend sent any.
    pub pagination: Option<Pagination>,
    pub last_error: Option<String>,
}

impl<E, S> Default for CollectionSnapshot<E, S> {
    fn default() -> Self {
        Self {
            collection: IndexMap::new(),
            selected: None,
            stats_by_key: HashMap::new(),
            pagination: None,
            last_error: None,
        }
    }
}

impl<E: Entity, S> CollectionSnapshot<E, S> {
    pub fn items(&self) -> impl Iterator<Item = &E> {
        self.collection.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.collection.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&E> {
        self.collection.get(key)
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected.as_ref().map(Entity::key)
    }
}

/// Reactive store for a single keyed entity type, with per-key auxiliary
/// stats of type `S`.
pub struct EntityStore<E, S = Value> {
    state: watch::Sender<Arc<CollectionSnapshot<E, S>>>,
}

impl<E, S> EntityStore<E, S>
where
    E: Entity,
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(CollectionSnapshot::default()));
        Self { state }
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Replace the collection with `items`, in order.
    pub fn set_all(&self, items: Vec<E>, pagination: Option<Pagination>) {
        let collection: IndexMap<String, E> = items
            .into_iter()
            .map(|item| (item.key().to_owned(), item))
            .collect();
        self.modify(|snap| {
            snap.collection = collection;
            snap.pagination = pagination;
        });
    }

    /// Insert or replace one entity. New keys go to the end; an existing
    /// key keeps its position. A matching selection is refreshed too.
    pub fn upsert(&self, entity: E) {
        self.modify(|snap| {
            if snap.selected_key() == Some(entity.key()) {
                snap.selected = Some(entity.clone());
            }
            snap.collection.insert(entity.key().to_owned(), entity);
        });
    }

    /// Remove by key. Clears the selection iff it has the same key.
    pub fn remove(&self, key: &str) -> Option<E> {
        let mut removed = None;
        self.modify(|snap| {
            removed = snap.collection.shift_remove(key);
            snap.stats_by_key.remove(key);
            if snap.selected_key() == Some(key) {
                snap.selected = None;
            }
        });
        removed
    }

    /// Select a freshly fetched entity, refreshing its cached copy if the
    /// collection already holds that key.
    pub fn focus(&self, entity: E) {
        self.modify(|snap| {
            if let Some(cached) = snap.collection.get_mut(entity.key()) {
                cached.clone_from(&entity);
            }
            snap.selected = Some(entity);
        });
    }

    pub fn select(&self, entity: Option<E>) {
        self.modify(|snap| snap.selected = entity);
    }

    /// Select the cached entity with `key`. Returns `false` and clears the
    /// selection when no such entity is cached.
    pub fn select_key(&self, key: &str) -> bool {
        let mut found = false;
        self.modify(|snap| {
            snap.selected = snap.collection.get(key).cloned();
            found = snap.selected.is_some();
        });
        found
    }

    pub fn set_stats(&self, key: &str, stats: S) {
        self.modify(|snap| {
            snap.stats_by_key.insert(key.to_owned(), stats);
        });
    }

    pub fn set_error(&self, message: Option<String>) {
        self.modify(|snap| snap.last_error = message);
    }

    pub fn reset(&self) {
        self.state
            .send_modify(|snap| *snap = Arc::new(CollectionSnapshot::default()));
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<CollectionSnapshot<E, S>> {
        self.state.borrow().clone()
    }

    pub fn by_key(&self, key: &str) -> Option<E> {
        self.state.borrow().collection.get(key).cloned()
    }

    pub fn stats(&self, key: &str) -> Option<S> {
        self.state.borrow().stats_by_key.get(key).cloned()
    }

    pub fn selected(&self) -> Option<E> {
        self.state.borrow().selected.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().last_error.clone()
    }

    pub fn subscribe(&self) -> StoreStream<CollectionSnapshot<E, S>> {
        StoreStream::new(self.state.subscribe())
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// `send_modify` publishes even with zero receivers.
    fn modify(&self, f: impl FnOnce(&mut CollectionSnapshot<E, S>)) {
        self.state.send_modify(|snap| f(Arc::make_mut(snap)));
    }
}

impl<E, S> Default for EntityStore<E, S>
where
    E: Entity,
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
