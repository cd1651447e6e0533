//! In-memory key-value storage.

use std::collections::HashMap;
use std::sync::Mutex;
use tipcard_core::error::{Result, TipcardError};
use tipcard_core::store::KeyValueStorage;

/// A [`KeyValueStorage`] over a plain map.
///
/// Not durable. Used by tests and by hosts without a writable data
/// directory, where the session simply starts fresh each run.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| TipcardError::persistence("storage mutex poisoned"))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock_entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock_entries()?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock_entries()?.remove(key);
        Ok(())
    }
}
