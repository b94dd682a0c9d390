// ── Generic reactive entity collection ──
//
// Concurrent keyed storage with push-based change notification via
// `watch` channels. Snapshots are ordered by key so that two identical
// polls produce identical snapshots.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

/// A reactive collection for a single record type.
///
/// Uses `DashMap` for concurrent lookups and `watch` channels for
/// push-based change notification. Every published mutation bumps a
/// version counter and rebuilds the snapshot that subscribers receive.
pub(crate) struct EntityCollection<T: Clone + Send + Sync + 'static> {
    /// Primary storage: key string -> record.
    /// Keys are normalized MACs for devices, interface names for WiFi,
    /// peer ids for WireGuard.
    by_key: DashMap<String, Arc<T>>,

    /// Version counter, bumped on every published mutation.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on mutation for efficient subscription.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_key: DashMap::new(),
            version,
            snapshot,
        }
    }

    /// Insert or update a record. Returns `true` if the key was new.
    pub(crate) fn upsert(&self, key: String, entity: T) -> bool {
        let is_new = self.upsert_silent(key, entity);
        self.flush();
        is_new
    }

    /// Insert or update without publishing. Call [`flush`](Self::flush)
    /// once a batch is complete.
    pub(crate) fn upsert_silent(&self, key: String, entity: T) -> bool {
        self.by_key.insert(key, Arc::new(entity)).is_none()
    }

    /// Replace the whole collection with `entities`, publishing once.
    pub(crate) fn replace_all(&self, entities: impl IntoIterator<Item = (String, T)>) {
        self.by_key.clear();
        for (key, entity) in entities {
            self.by_key.insert(key, Arc::new(entity));
        }
        self.flush();
    }

    /// Rebuild the snapshot and notify subscribers.
    pub(crate) fn flush(&self) {
        self.rebuild_snapshot();
        self.bump_version();
    }

    /// Look up a record by its key.
    pub(crate) fn get(&self, key: &str) -> Option<Arc<T>> {
        self.by_key.get(key).map(|r| Arc::clone(r.value()))
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }

    /// All current keys, sorted.
    pub(crate) fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.by_key.iter().map(|r| r.key().clone()).collect();
        keys.sort_unstable();
        keys
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Collect all values, ordered by key, and broadcast to subscribers.
    fn rebuild_snapshot(&self) {
        let mut entries: Vec<(String, Arc<T>)> = self
            .by_key
            .iter()
            .map(|r| (r.key().clone(), Arc::clone(r.value())))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        let values: Vec<Arc<T>> = entries.into_iter().map(|(_, v)| v).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn upsert_returns_true_for_new_key() {
        let col: EntityCollection<String> = EntityCollection::new();
        assert!(col.upsert("key1".into(), "hello".into()));
        assert!(!col.upsert("key1".into(), "world".into()));
        assert_eq!(*col.get("key1").unwrap(), "world");
    }

    #[test]
    fn silent_upserts_publish_on_flush() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.upsert_silent("a".into(), "x".into());
        assert!(col.snapshot().is_empty());
        assert_eq!(col.version(), 0);

        col.flush();
        assert_eq!(col.snapshot().len(), 1);
        assert_eq!(col.version(), 1);
    }

    #[test]
    fn snapshot_is_ordered_by_key() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.upsert("c".into(), "3".into());
        col.upsert("a".into(), "1".into());
        col.upsert("b".into(), "2".into());

        let values: Vec<String> = col.snapshot().iter().map(|v| (**v).clone()).collect();
        assert_eq!(values, ["1", "2", "3"]);
        assert_eq!(col.keys(), ["a", "b", "c"]);
    }

    #[test]
    fn replace_all_drops_missing_keys() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.upsert("a".into(), "x".into());
        col.upsert("b".into(), "y".into());

        col.replace_all([("b".to_owned(), "y2".to_owned()), ("c".to_owned(), "z".to_owned())]);
        assert_eq!(col.keys(), ["b", "c"]);
        assert_eq!(*col.get("b").unwrap(), "y2");
        assert!(col.get("a").is_none());
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let col: EntityCollection<String> = EntityCollection::new();
        let mut rx = col.subscribe();
        col.upsert("a".into(), "x".into());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }
}
