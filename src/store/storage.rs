//! Key-value persistence backends for mirrored slices.

use super::StoreError;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A string key-value store holding serialized slices.
///
pub trait Storage: Send + Sync {
    /// Return the value stored under the key, or None if nothing was stored.
    ///
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under the key.
    ///
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<key>.json` inside a directory.
///
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Return a storage rooted at the given directory. The directory is
    /// created on first write.
    ///
    pub fn new(dir: impl Into<PathBuf>) -> FileStorage {
        FileStorage { dir: dir.into() }
    }

    /// Return the directory holding the stored files.
    ///
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StoreError::ReadFailed {
                key: key.to_string(),
                message: format!("{}: {}", path.display(), e),
            })
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let write_failed = |e: std::io::Error| StoreError::WriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        };
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(write_failed)?;
        }
        let mut file = fs::File::create(self.path_for(key)).map_err(write_failed)?;
        file.write_all(value.as_bytes()).map_err(write_failed)?;
        file.flush().map_err(write_failed)?;
        Ok(())
    }
}

/// Keeps values in memory. Used where nothing should touch the disk.
///
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().map_err(|e| StoreError::ReadFailed {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|e| StoreError::WriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
