use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::debug;

use crate::{KeyValueStore, StorageError};

const FILE_NAME: &str = "storage.json";

/// Store persisted as a single JSON object file.
///
/// The file is read on first access and rewritten in full on every change,
/// through a temporary file that is renamed over the original. The in-memory
/// copy only changes once the write has reached the disk.
///
/// File I/O is synchronous and runs on the calling task. The file holds a
/// handful of small values, so this is cheap, but avoid sharing a `FileStore`
/// with latency-sensitive work on a single-threaded executor.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<Option<BTreeMap<String, String>>>,
}

impl FileStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
        }
    }

    /// Creates a store under the per-user data directory, in a folder named after the app.
    ///
    /// # Errors
    /// Returns [`StorageError::NoDataDir`] if the platform has no data directory.
    pub fn for_app(app_name: &str) -> Result<Self, StorageError> {
        let dir = dirs::data_local_dir().ok_or(StorageError::NoDataDir)?;
        Ok(Self::new(dir.join(app_name).join(FILE_NAME)))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn with_entries<T>(
        &self,
        action: impl FnOnce(&mut BTreeMap<String, String>) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            *guard = Some(load(&self.path)?);
        }
        let entries = guard.get_or_insert_with(BTreeMap::new);
        action(entries)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("wrote {} keys to {}", entries.len(), self.path.display());
        Ok(())
    }
}

fn load(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
    match fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(err) => Err(err.into()),
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.with_entries(|entries| Ok(entries.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.with_entries(|entries| {
            if entries.get(key).map(String::as_str) == Some(value) {
                return Ok(());
            }
            let mut updated = entries.clone();
            updated.insert(key.to_owned(), value.to_owned());
            self.persist(&updated)?;
            *entries = updated;
            Ok(())
        })
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.with_entries(|entries| {
            if !entries.contains_key(key) {
                return Ok(());
            }
            let mut updated = entries.clone();
            updated.remove(key);
            self.persist(&updated)?;
            *entries = updated;
            Ok(())
        })
    }
}
