//! Unified path management for tipcard's local files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/tipcard/
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/tipcard/
//! └── offline.json             # Durable key-value store (session flags,
//!                              # mirrored offline records)
//! ```

use std::path::PathBuf;
use tipcard_core::error::{Result, TipcardError};

const APP_DIR: &str = "tipcard";

/// Resolves the locations of tipcard's config and data files.
pub struct TipcardPaths;

impl TipcardPaths {
    /// Path to `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| TipcardError::config("cannot determine config directory"))?;
        Ok(base.join(APP_DIR).join("config.toml"))
    }

    /// Path to the durable key-value store file.
    pub fn offline_file() -> Result<PathBuf> {
        let base = dirs::data_dir()
            .ok_or_else(|| TipcardError::config("cannot determine data directory"))?;
        Ok(base.join(APP_DIR).join("offline.json"))
    }
}
