//! In-process implementations of the remote collaborator traits.

mod memory;

pub use memory::{MemoryAuthProvider, MemoryDocumentStore};
