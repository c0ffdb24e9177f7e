use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Error type for the persistence collaborator
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("malformed data under \"{key}\": {source}")]
    Json {
        key: String,
        source: serde_json::Error,
    },
}

/// String-keyed persistence for serialized collections.
///
/// `read` returns `Ok(None)` for a key that was never written.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key inside a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read { path, source: e }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir)
            .and_then(|_| atomic_write(&path, value.as_bytes()))
            .map_err(|e| StorageError::Write { path, source: e })
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-process map, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Make every subsequent write fail, to exercise persistence errors
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), value.into());
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Write {
                path: PathBuf::from(key),
                source: io::Error::other("writes disabled"),
            });
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
