//! The offline cache: an in-memory map mirrored to durable storage.

use super::key::RecordKey;
use super::local::KeyValueStorage;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory record cache with a durable mirror.
///
/// Reads prefer the in-memory map and repopulate it from durable storage on
/// a miss, so a fresh process sees records cached by an earlier run. Writes
/// always land in memory; the durable mirror is best-effort (a failed
/// durable write is logged and the value survives in memory for the life of
/// the process).
///
/// All mutation goes through the lock; `snapshot` hands sync a stable copy
/// so its read-modify-write loop never races a concurrent store.
pub(crate) struct OfflineCache {
    entries: RwLock<HashMap<RecordKey, JsonValue>>,
    durable: Arc<dyn KeyValueStorage>,
}

impl OfflineCache {
    pub(crate) fn new(durable: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            durable,
        }
    }

    /// Caches a value in memory and mirrors it to durable storage.
    pub(crate) async fn store(&self, key: &RecordKey, value: JsonValue) {
        let raw = value.to_string();
        self.entries.write().await.insert(key.clone(), value);

        if let Err(err) = self.durable.set(&key.storage_key(), &raw) {
            tracing::warn!(key = %key, error = %err, "durable cache write failed, value retained in memory");
        }
    }

    /// Looks a value up, falling back to durable storage on a memory miss.
    pub(crate) async fn get(&self, key: &RecordKey) -> Option<JsonValue> {
        if let Some(value) = self.entries.read().await.get(key) {
            return Some(value.clone());
        }

        let raw = match self.durable.get(&key.storage_key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "durable cache read failed");
                return None;
            }
        };

        match serde_json::from_str::<JsonValue>(&raw) {
            Ok(value) => {
                self.entries
                    .write()
                    .await
                    .insert(key.clone(), value.clone());
                Some(value)
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "discarding unreadable cached record");
                None
            }
        }
    }

    /// A stable copy of every entry currently held in memory.
    pub(crate) async fn snapshot(&self) -> Vec<(RecordKey, JsonValue)> {
        self.entries
            .read()
            .await
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
