//! Key-value persistence for whole records.
//!
//! A record is a named blob of text (JSON in practice). Writes replace the
//! whole record; there is no incremental update.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::io::recovery::atomic_write;

/// Error type for persistence operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not decode record '{key}': {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },
    #[error("could not encode record '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A durable store of whole records addressed by key.
pub trait KeyValueStore {
    /// Read a record. `Ok(None)` means the record was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Replace a record.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per record inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.record_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.record_path(key);
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Write {
            path: self.dir.clone(),
            source,
        })?;
        atomic_write(&path, value.as_bytes()).map_err(|source| StorageError::Write { path, source })
    }
}

/// In-memory records, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// A store that rejects every write, to exercise failure paths.
    pub fn failing() -> Self {
        MemoryStore {
            records: HashMap::new(),
            fail_writes: true,
        }
    }

    pub fn with_record(mut self, key: &str, value: &str) -> Self {
        self.records.insert(key.to_string(), value.to_string());
        self
    }

    pub fn record(&self, key: &str) -> Option<&str> {
        self.records.get(key).map(|s| s.as_str())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable(format!(
                "write to '{}' rejected",
                key
            )));
        }
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
