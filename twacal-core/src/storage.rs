//! Local key/value persistence.
//!
//! The calendar keeps two keys: the serialized event collection and the
//! dark theme flag. `FileStorage` keeps one file per key in the data
//! directory; `MemoryStorage` is the in-process equivalent.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{CalendarError, CalendarResult};

pub trait Storage {
    /// Read a key. A missing key is `Ok(None)`.
    fn get(&self, key: &str) -> CalendarResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> CalendarResult<()>;
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> CalendarResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> CalendarResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            CalendarError::Storage(format!(
                "Could not create data directory {}: {e}",
                self.dir.display()
            ))
        })?;

        // write-then-rename
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.tmp"));
        std::fs::write(&tmp, value)
            .and_then(|_| std::fs::rename(&tmp, &path))
            .map_err(|e| CalendarError::Storage(format!("Could not write {}: {e}", path.display())))
    }
}

/// In-memory storage. Can be told to refuse writes, like a browser whose
/// quota is exhausted.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage where every write fails.
    pub fn failing() -> Self {
        MemoryStorage {
            values: HashMap::new(),
            fail_writes: true,
        }
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> CalendarResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CalendarResult<()> {
        if self.fail_writes {
            return Err(CalendarError::Storage("quota exceeded".into()));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("data"));

        assert_eq!(storage.get("dec_events_v2").unwrap(), None);

        storage.set("dec_events_v2", "[]").unwrap();
        assert_eq!(storage.get("dec_events_v2").unwrap().as_deref(), Some("[]"));

        storage.set("dec_events_v2", "[1]").unwrap();
        assert_eq!(storage.get("dec_events_v2").unwrap().as_deref(), Some("[1]"));
        assert!(!dir.path().join("data").join(".dec_events_v2.tmp").exists());
    }

    #[test]
    fn test_memory_storage_failing_writes() {
        let mut storage = MemoryStorage::failing();
        assert!(storage.set("k", "v").is_err());
        assert_eq!(storage.get("k").unwrap(), None);

        storage.set_fail_writes(false);
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
    }
}
