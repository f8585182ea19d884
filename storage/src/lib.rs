//! Persistent key-value storage.
//!
//! A string-to-string store in the spirit of mobile "async storage": the
//! location service keeps its cached city and coordinates here so the UI has
//! something to show before the first GPS fix of a session.

#![warn(missing_docs)]

mod file;
mod memory;

use std::future::Future;
use std::sync::Arc;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors that can occur when reading or writing the store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    /// The backing file is not a JSON object of strings.
    #[error("corrupt storage file: {0}")]
    Serde(#[from] serde_json::Error),
    /// The platform has no per-user data directory.
    #[error("no data directory available on this platform")]
    NoDataDir,
}

/// A string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete the value stored under `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl<T: KeyValueStore> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).remove(key)
    }
}
