//! The local-first record read/write path.

use super::cache::OfflineCache;
use super::document::DocumentStore;
use super::key::RecordKey;
use super::local::KeyValueStorage;
use crate::error::{ErrorDisposition, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Where a completed save ended up.
///
/// `CachedOnly` is not a failure: the value is durably retained locally and
/// a later [`RecordStore::sync_pending`] can push it. It is also not a
/// guarantee of remote persistence - callers that need the remote copy must
/// check for `Synced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The remote upsert succeeded (and the cache was updated).
    Synced,
    /// The remote was unreachable; only the local cache holds the value.
    CachedOnly,
}

impl SaveOutcome {
    pub fn is_synced(self) -> bool {
        matches!(self, Self::Synced)
    }
}

/// Local-first persistence over a remote document store.
///
/// Reads try the remote first and mirror hits into the cache; writes try
/// the remote and mirror into the cache regardless, so the most recent
/// value is always available locally. Remote failures never propagate out
/// of `fetch` - the error policy table maps them to the fallback path.
pub struct RecordStore {
    remote: Arc<dyn DocumentStore>,
    cache: OfflineCache,
}

impl RecordStore {
    pub fn new(remote: Arc<dyn DocumentStore>, durable: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            remote,
            cache: OfflineCache::new(durable),
        }
    }

    /// Reads a record, preferring the remote store.
    ///
    /// On a remote hit the value is written through to the cache. On a
    /// remote miss or failure the cached value is returned if present.
    /// Never fails: exhausting both paths yields `None`.
    pub async fn fetch<T: DeserializeOwned>(&self, key: &RecordKey) -> Option<T> {
        match self.remote.get(key).await {
            Ok(Some(value)) => {
                self.cache.store(key, value.clone()).await;
                decode(key, value)
            }
            Ok(None) => {
                tracing::debug!(key = %key, "remote miss, consulting local cache");
                self.cached(key).await
            }
            Err(err) => {
                match err.disposition() {
                    ErrorDisposition::Fallback => {
                        tracing::warn!(key = %key, error = %err, "remote fetch failed, falling back to local cache");
                    }
                    _ => {
                        tracing::error!(key = %key, error = %err, "unexpected remote fetch error, falling back to local cache");
                    }
                }
                self.cached(key).await
            }
        }
    }

    /// Reads a record from the remote store only, without the cache
    /// fallback. Hits still write through to the cache.
    ///
    /// The sign-in ladder and the auth watcher use this to distinguish "the
    /// remote has no profile" from "the cache has one".
    pub async fn fetch_remote<T: DeserializeOwned>(&self, key: &RecordKey) -> Result<Option<T>> {
        match self.remote.get(key).await? {
            Some(value) => {
                self.cache.store(key, value.clone()).await;
                Ok(Some(serde_json::from_value(value)?))
            }
            None => Ok(None),
        }
    }

    /// Upserts a record remotely (merge semantics) and mirrors it into the
    /// cache regardless of the remote outcome.
    ///
    /// # Errors
    ///
    /// Only if `value` cannot be represented as JSON; remote failures
    /// degrade to `SaveOutcome::CachedOnly`.
    pub async fn save<T: Serialize>(&self, key: &RecordKey, value: &T) -> Result<SaveOutcome> {
        let payload = serde_json::to_value(value)?;

        let outcome = match self.remote.set(key, &payload, true).await {
            Ok(()) => SaveOutcome::Synced,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "remote save failed, retaining record locally");
                SaveOutcome::CachedOnly
            }
        };

        self.cache.store(key, payload).await;
        Ok(outcome)
    }

    /// Caches a record locally without attempting the remote store at all.
    ///
    /// Used when an earlier step (e.g. account creation) already proved the
    /// remote unreachable.
    pub async fn store_local<T: Serialize>(&self, key: &RecordKey, value: &T) -> Result<()> {
        let payload = serde_json::to_value(value)?;
        self.cache.store(key, payload).await;
        Ok(())
    }

    /// Best-effort connectivity probe: try to enable the remote connection,
    /// and on failure explicitly disable it. Advisory only - no other
    /// operation is gated on this.
    pub async fn is_online(&self) -> bool {
        match self.remote.enable_network().await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "remote store is offline");
                if let Err(err) = self.remote.disable_network().await {
                    tracing::warn!(error = %err, "failed to disable remote network access");
                }
                false
            }
        }
    }

    /// Re-attempts a remote merge-upsert for every cached entry.
    ///
    /// Per-entry failures are logged and skipped. Returns the number of
    /// entries that reached the remote store. Does not reschedule itself;
    /// an external trigger (connectivity regained) invokes it.
    pub async fn sync_pending(&self) -> usize {
        let pending = self.cache.snapshot().await;
        let total = pending.len();
        let mut synced = 0;

        for (key, value) in pending {
            match self.remote.set(&key, &value, true).await {
                Ok(()) => synced += 1,
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "sync skipped entry");
                }
            }
        }

        if total > 0 {
            tracing::info!(synced, total, "offline cache sync finished");
        }
        synced
    }

    async fn cached<T: DeserializeOwned>(&self, key: &RecordKey) -> Option<T> {
        let value = self.cache.get(key).await?;
        decode(key, value)
    }
}

fn decode<T: DeserializeOwned>(key: &RecordKey, value: JsonValue) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "record payload does not match requested type");
            None
        }
    }
}
