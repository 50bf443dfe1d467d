//! Local key-value store
//!
//! Stands in for browser local storage: string keys, string values. The file
//! store keeps one file per key under the data directory. Every
//! read-modify-write holds an exclusive lock on a `<key>.lock` sidecar and
//! lands the new value by renaming a temp file over the old one, so readers
//! see either the old value or the new one, never a half-written file.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid store key '{0}'")]
    InvalidKey(String),

    #[error("Store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store lock poisoned")]
    Poisoned,
}

/// String key-value persistence
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Atomically replace the value with `f(old)`
    fn update(&self, key: &str, f: &mut dyn FnMut(Option<String>) -> String) -> Result<(), StoreError>;
}

/// One file per key under a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        debug!(?dir, "FileStore::new: called");
        Self { dir }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }

    fn lock_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", key))
    }

    fn read_value(path: &Path) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(path)(e)),
        }
    }

    fn write_value(&self, path: &Path, value: &str) -> Result<(), StoreError> {
        let mut temp = tempfile::Builder::new()
            .prefix(".pd-")
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(io_err(&self.dir))?;
        temp.write_all(value.as_bytes()).map_err(io_err(temp.path()))?;
        temp.as_file().sync_all().map_err(io_err(temp.path()))?;
        temp.persist(path).map_err(|e| io_err(path)(e.error))?;
        Ok(())
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        debug!(%key, "FileStore::get: called");
        let path = self.path_for(key)?;
        let value = Self::read_value(&path)?;
        if value.is_none() {
            debug!(%key, "FileStore::get: no value");
        }
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        debug!(%key, value_len = value.len(), "FileStore::set: called");
        self.update(key, &mut |_| value.to_string())
    }

    fn update(&self, key: &str, f: &mut dyn FnMut(Option<String>) -> String) -> Result<(), StoreError> {
        debug!(%key, "FileStore::update: called");
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let lock_path = self.lock_path_for(key);
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(io_err(&lock_path))?;
        FileExt::lock_exclusive(&lock).map_err(io_err(&lock_path))?;

        let result = Self::read_value(&path).and_then(|old| {
            let new = f(old);
            self.write_value(&path, &new)
        });

        let _ = FileExt::unlock(&lock);
        result
    }
}

/// In-memory store for tests and for running with tracking disabled
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn update(&self, key: &str, f: &mut dyn FnMut(Option<String>) -> String) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        let new = f(values.get(key).cloned());
        values.insert(key.to_string(), new);
        Ok(())
    }
}
