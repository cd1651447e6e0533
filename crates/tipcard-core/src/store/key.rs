//! Structured record keys.

use crate::error::{Result, TipcardError};
use std::fmt;

/// Reserved separator between the collection and the id in encoded keys.
const KEY_DELIMITER: char = '/';

/// Prefix under which record values are mirrored into durable storage,
/// keeping them apart from session flags sharing the same store.
const STORAGE_PREFIX: &str = "offline_";

/// Identifies one document: a collection path plus a document id.
///
/// Keys are structured rather than concatenated strings so that replaying
/// the cache during sync never has to split a string back apart. Components
/// must be non-empty and must not contain the reserved `/` delimiter; that
/// makes the encoded form unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    collection: String,
    id: String,
}

impl RecordKey {
    /// Creates a key, rejecting empty or delimiter-bearing components.
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Result<Self> {
        let collection = collection.into();
        let id = id.into();

        for (name, component) in [("collection", &collection), ("id", &id)] {
            if component.is_empty() {
                return Err(TipcardError::invalid_key(format!("{name} is empty")));
            }
            if component.contains(KEY_DELIMITER) {
                return Err(TipcardError::invalid_key(format!(
                    "{name} '{component}' contains reserved '{KEY_DELIMITER}'"
                )));
            }
        }

        Ok(Self { collection, id })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Canonical encoded form: `{collection}/{id}`.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.collection, KEY_DELIMITER, self.id)
    }

    /// Key under which the value is mirrored into durable storage.
    pub(crate) fn storage_key(&self) -> String {
        format!("{STORAGE_PREFIX}{}", self.encode())
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}
