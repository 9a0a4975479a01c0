//! Key-value storage substrate
//!
//! String keys mapping to string values, the shape of browser local storage. Carts are
//! persisted into a single slot of one of these stores.

use std::{io, sync::Arc};

use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a storage substrate.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing the value would exceed the store's quota.
    #[error("storage quota exceeded writing {key}: {size} bytes, quota {quota}")]
    QuotaExceeded {
        /// Key being written.
        key: String,

        /// Bytes the store would hold after the write.
        size: usize,

        /// Maximum bytes the store may hold.
        quota: usize,
    },

    /// The key cannot be used with this store.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The store cannot currently be accessed.
    #[error("storage unavailable")]
    Unavailable,

    /// Wrapped I/O error.
    #[error("storage I/O error")]
    Io(#[from] io::Error),
}

/// A durable string key-value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if the slot is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the slot for `key`. Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the slot cannot be deleted.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
