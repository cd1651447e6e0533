//! Durable local key-value storage trait.

use crate::error::Result;

/// Process-local durable string storage.
///
/// The host environment bounds capacity, and writes can fail (quota, broken
/// disk); callers treat write failures as
/// [`crate::TipcardError::PersistenceWriteFailed`] and log rather than
/// propagate, since the in-memory layer above still holds the value.
///
/// Operations are synchronous: implementations are expected to be a small
/// local file or an in-memory map, not a network hop.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}
