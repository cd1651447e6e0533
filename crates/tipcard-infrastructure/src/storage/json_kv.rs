//! Durable key-value storage backed by a single JSON file.

use crate::paths::TipcardPaths;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tipcard_core::error::{Result, TipcardError};
use tipcard_core::store::KeyValueStorage;

/// A [`KeyValueStorage`] over one JSON object file.
///
/// Provides:
/// - **Atomicity**: every write lands via tmp file + atomic rename
/// - **Isolation**: an exclusive file lock covers each write
/// - **Durability**: explicit fsync before the rename
///
/// The whole map is held in memory and rewritten on each `set`/`remove`;
/// the store holds session flags and a handful of mirrored records, not
/// bulk data.
pub struct JsonFileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStorage {
    /// Opens (or initializes) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = Self::load(&path)?;
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Opens the store at the default location
    /// (`~/.local/share/tipcard/offline.json`).
    pub fn default_location() -> Result<Self> {
        Self::new(TipcardPaths::offline_file()?)
    }

    fn load(path: &Path) -> Result<HashMap<String, String>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        let entries: HashMap<String, String> = serde_json::from_str(&content)?;
        Ok(entries)
    }

    /// Writes the whole map to disk atomically, under an exclusive lock.
    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        let _lock = FileLock::acquire(&self.path)?;

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(entries).map_err(|err| {
            TipcardError::persistence(format!("failed to serialize store: {err}"))
        })?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| TipcardError::persistence("storage path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| TipcardError::persistence("storage path has no file name"))?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }

    fn lock_entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| TipcardError::persistence("storage mutex poisoned"))
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock_entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
            .map_err(|err| TipcardError::persistence(err.to_string()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.lock_entries()?;
        entries.remove(key);
        self.persist(&entries)
            .map_err(|err| TipcardError::persistence(err.to_string()))
    }
}

/// A file lock guard that releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive().map_err(|err| {
                TipcardError::persistence(format!("failed to acquire storage lock: {err}"))
            })?;
        }

        #[cfg(not(unix))]
        {
            // No advisory locking off Unix; acceptable for a single-user
            // desktop process.
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped; removing the
        // lock file is best effort.
        let _ = fs::remove_file(&self.lock_path);
    }
}
