//! Remote document store trait.

use super::key::RecordKey;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// An abstract remote document backend.
///
/// This is the authoritative store; the record store layers its offline
/// cache on top of it. Every method may fail with
/// [`crate::TipcardError::RemoteUnavailable`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads one document.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: document exists
    /// - `Ok(None)`: document absent
    /// - `Err(_)`: the store could not be reached
    async fn get(&self, key: &RecordKey) -> Result<Option<JsonValue>>;

    /// Upserts one document.
    ///
    /// With `merge` set, fields absent from `value` keep their current
    /// remote contents; otherwise the document is replaced.
    async fn set(&self, key: &RecordKey, value: &JsonValue, merge: bool) -> Result<()>;

    /// Asks the backend to resume network access.
    async fn enable_network(&self) -> Result<()>;

    /// Asks the backend to stop attempting network access.
    async fn disable_network(&self) -> Result<()>;
}
