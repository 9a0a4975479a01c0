//! File-backed storage.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use super::{KeyValueStore, StorageError};

/// Store keeping one file per key under a directory.
///
/// Writes land in a temporary sibling file that is renamed over the slot, so readers see
/// either the previous value or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the slots.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'));

        if valid {
            Ok(self.root.join(format!("{key}.json")))
        } else {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.slot_path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let staging = path.with_extension("json.tmp");

        fs::create_dir_all(&self.root)?;
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.slot_path(key)?) {
            Err(error) if error.kind() != ErrorKind::NotFound => Err(error.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn get_missing_slot_returns_none() -> TestResult {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path());

        assert_eq!(store.get("cart")?, None);

        Ok(())
    }

    #[test]
    fn set_creates_directory_and_slot() -> TestResult {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().join("nested").join("carts"));

        store.set("cart", "[]")?;

        assert_eq!(store.get("cart")?.as_deref(), Some("[]"));
        assert!(store.root().join("cart.json").is_file());
        assert!(!store.root().join("cart.json.tmp").exists());

        Ok(())
    }

    #[test]
    fn set_overwrites_previous_value() -> TestResult {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path());

        store.set("cart", "[1]")?;
        store.set("cart", "[2]")?;

        assert_eq!(store.get("cart")?.as_deref(), Some("[2]"));

        Ok(())
    }

    #[test]
    fn remove_is_idempotent() -> TestResult {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path());

        store.set("cart", "[]")?;
        store.remove("cart")?;
        store.remove("cart")?;

        assert_eq!(store.get("cart")?, None);

        Ok(())
    }

    #[test]
    fn path_like_keys_are_rejected() -> TestResult {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path());

        for key in ["", "../cart", ".hidden", "a/b", "cart key"] {
            let result = store.set(key, "[]");

            assert!(
                matches!(result, Err(StorageError::InvalidKey(_))),
                "expected InvalidKey for {key:?}, got {result:?}"
            );
        }

        Ok(())
    }
}
