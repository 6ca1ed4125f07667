//! In-process implementation of the storage contract.

use crate::{RemoteStore, StorageError, StoreFuture};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory remote store for tests and demos.
///
/// Records how many saves it has accepted so tests can assert the exact
/// save cadence (one save per post-load mutation, none for the initial
/// load). Can be switched into a failing mode to exercise the
/// swallowed-failure path.
#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    data: RwLock<HashMap<(String, String), Value>>,
    save_count: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryRemoteStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the payload for `(app_id, dataset)`
    pub async fn seed(&self, app_id: &str, dataset: &str, payload: Value) {
        self.data
            .write()
            .await
            .insert((app_id.to_owned(), dataset.to_owned()), payload);
    }

    /// Number of successful saves accepted so far
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Make subsequent loads and saves fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Current payload for `(app_id, dataset)`, if any
    pub async fn stored(&self, app_id: &str, dataset: &str) -> Option<Value> {
        self.data
            .read()
            .await
            .get(&(app_id.to_owned(), dataset.to_owned()))
            .cloned()
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn load(&self, app_id: &str, dataset: &str) -> StoreFuture<'_, Option<Value>> {
        let key = (app_id.to_owned(), dataset.to_owned());
        Box::pin(async move {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StorageError::RequestFailed("memory store failing".into()));
            }
            Ok(self.data.read().await.get(&key).cloned())
        })
    }

    fn save(&self, app_id: &str, dataset: &str, payload: Value) -> StoreFuture<'_, ()> {
        let key = (app_id.to_owned(), dataset.to_owned());
        Box::pin(async move {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StorageError::RequestFailed("memory store failing".into()));
            }
            self.data.write().await.insert(key, payload);
            self.save_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn load_returns_none_when_nothing_saved() {
        let store = MemoryRemoteStore::new();
        let loaded = store.load("app", "list").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = MemoryRemoteStore::new();
        store
            .save("app", "list", json!({"items": [{"id": 1, "name": "milk", "done": false}]}))
            .await
            .unwrap();

        let loaded = store.load("app", "list").await.unwrap().unwrap();
        assert_eq!(loaded["items"][0]["name"], "milk");
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn failing_mode_rejects_saves_without_recording() {
        let store = MemoryRemoteStore::new();
        store.set_failing(true);
        let result = store.save("app", "list", json!({"items": []})).await;
        assert!(result.is_err());
        assert_eq!(store.save_count(), 0);
    }
}
