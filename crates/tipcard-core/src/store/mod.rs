//! Local-first record persistence.
//!
//! The [`RecordStore`] is the single read/write path for documents: it
//! prefers the remote document store and degrades to a process-local cache
//! (an in-memory map mirrored to durable key-value storage) whenever the
//! remote is unreachable.
//!
//! # Module Structure
//!
//! - `key`: structured record keys (`RecordKey`)
//! - `document`: remote document store trait (`DocumentStore`)
//! - `local`: durable key-value storage trait (`KeyValueStorage`)
//! - `cache`: the in-memory + durable offline cache
//! - `record_store`: the local-first read/write path (`RecordStore`)

mod cache;
mod document;
mod key;
mod local;
mod record_store;

pub use document::DocumentStore;
pub use key::RecordKey;
pub use local::KeyValueStorage;
pub use record_store::{RecordStore, SaveOutcome};
