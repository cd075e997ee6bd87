//! Durable key-value storage
//!
//! The whole book lives under a single key and is always read and written
//! as one value. Implementations only need to store opaque strings.

use std::{
    collections::HashMap,
    fs, io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
};

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::PersistenceError;

/// Key the recipe collection is stored under
pub const RECIPES_KEY: &str = "recipes";

pub trait Storage: Send + 'static {
    /// Reads the value of `key`, `None` if it was never written
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replaces the value of `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Where the data is kept, if it is on disk
    fn location(&self) -> Option<&Utf8Path> {
        None
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }

    fn location(&self) -> Option<&Utf8Path> {
        (**self).location()
    }
}

/// Stores every key as `<key>.json` inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: Utf8PathBuf,
}

impl FileStorage {
    /// The directory is created on the first write
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    pub fn path(&self, key: &str) -> Utf8PathBuf {
        self.dir.join(key).with_extension("json")
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Read {
                key: key.to_string(),
                path,
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path(key);
        let write_err = |source: io::Error| PersistenceError::Write {
            key: key.to_string(),
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;
        // written aside and renamed so readers never see half a book
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(write_err)?;
        fs::rename(&tmp, &path).map_err(write_err)?;
        tracing::trace!(%path, bytes = value.len(), "stored");
        Ok(())
    }

    fn location(&self) -> Option<&Utf8Path> {
        Some(&self.dir)
    }
}

/// In-process storage
///
/// Clones share the same data, so a clone kept aside can inspect what the
/// store wrote or be handed to a new store to simulate a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
    read_only: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.insert(key, value);
        storage
    }

    pub fn insert(&self, key: &str, value: impl Into<String>) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Makes every following write fail
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.value(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(PersistenceError::ReadOnly(key.to_string()));
        }
        self.insert(key, value);
        Ok(())
    }
}

/// Memory storage whose writes take a while
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct SlowStorage {
    pub inner: MemoryStorage,
    pub delay: std::time::Duration,
    pub writes: Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(test)]
impl SlowStorage {
    pub fn new(delay: std::time::Duration) -> Self {
        Self {
            inner: MemoryStorage::new(),
            delay,
            writes: Default::default(),
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
impl Storage for SlowStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        std::thread::sleep(self.delay);
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> (tempfile::TempDir, FileStorage) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("book")).unwrap();
        (dir, FileStorage::new(path))
    }

    #[test]
    fn test_file_missing_key() {
        let (_dir, storage) = temp_storage();
        assert!(storage.get(RECIPES_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_set_get() {
        let (_dir, mut storage) = temp_storage();
        storage.set(RECIPES_KEY, "[]").unwrap();
        assert_eq!(storage.get(RECIPES_KEY).unwrap().as_deref(), Some("[]"));
        assert!(storage.path(RECIPES_KEY).ends_with("recipes.json"));
        assert!(storage.path(RECIPES_KEY).is_file());

        storage.set(RECIPES_KEY, "[1]").unwrap();
        assert_eq!(storage.get(RECIPES_KEY).unwrap().as_deref(), Some("[1]"));
        assert!(!storage.path(RECIPES_KEY).with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_write_error() {
        let (dir, _) = temp_storage();
        // a regular file where the directory should be
        let blocker = Utf8PathBuf::from_path_buf(dir.path().join("file")).unwrap();
        fs::write(&blocker, "").unwrap();
        let mut storage = FileStorage::new(blocker.join("book"));
        let err = storage.set(RECIPES_KEY, "[]").unwrap_err();
        assert!(matches!(err, PersistenceError::Write { .. }));
    }

    #[test]
    fn test_memory_shared() {
        let storage = MemoryStorage::new();
        let mut other = storage.clone();
        other.set(RECIPES_KEY, "x").unwrap();
        assert_eq!(storage.value(RECIPES_KEY).as_deref(), Some("x"));

        storage.set_read_only(true);
        assert!(matches!(
            other.set(RECIPES_KEY, "y"),
            Err(PersistenceError::ReadOnly(_))
        ));
        assert_eq!(storage.get(RECIPES_KEY).unwrap().as_deref(), Some("x"));
    }
}
