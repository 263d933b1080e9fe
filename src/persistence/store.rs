use super::files::{atomic_write, read_file, remove_file};
use crate::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::path::PathBuf;

/// Durable string key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// One JSON file per key inside the data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        read_file(self.path_for(key)).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        atomic_write(self.path_for(key), value).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        remove_file(self.path_for(key)).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })
    }
}

/// In-memory store for `--ephemeral` runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    /// Writes (sets and removes) still allowed; `None` is unlimited
    writes_left: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, as when storage is full or disabled
    #[cfg(test)]
    pub fn failing() -> Self {
        Self::failing_after(0)
    }

    /// A store that accepts `writes` writes and refuses every one after
    #[cfg(test)]
    pub fn failing_after(writes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            writes_left: Some(writes),
        }
    }

    /// Allow only `writes` more writes, keeping the stored entries
    #[cfg(test)]
    pub fn limit_writes(mut self, writes: usize) -> Self {
        self.writes_left = Some(writes);
        self
    }

    /// Lift any write limit, keeping the stored entries
    #[cfg(test)]
    pub fn recovered(mut self) -> Self {
        self.writes_left = None;
        self
    }

    fn take_write(&mut self, key: &str) -> StorageResult<()> {
        match self.writes_left.as_mut() {
            None => Ok(()),
            Some(0) => Err(StorageError::Unavailable(format!("write to '{}' refused", key))),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
        }
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.take_write(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.take_write(key)?;
        self.entries.remove(key);
        Ok(())
    }
}
