//! Tipcard infrastructure - concrete storage backends and host wiring.
//!
//! Implements the collaborator traits defined by `tipcard-core`:
//!
//! - [`storage::JsonFileStorage`] / [`storage::MemoryStorage`] - durable
//!   key-value storage
//! - [`remote::MemoryAuthProvider`] / [`remote::MemoryDocumentStore`] -
//!   in-process auth and document backends with failure injection
//! - [`paths::TipcardPaths`] - config/data file locations
//! - [`config_loader`] - TOML configuration loading

pub mod config_loader;
pub mod paths;
pub mod remote;
pub mod storage;

pub use config_loader::{load_config, load_default_config};
pub use paths::TipcardPaths;
pub use remote::{MemoryAuthProvider, MemoryDocumentStore};
pub use storage::{JsonFileStorage, MemoryStorage};
