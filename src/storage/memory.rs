//! In-memory storage.

use std::sync::{Mutex, MutexGuard};

use rustc_hash::FxHashMap;

use super::{KeyValueStore, StorageError};

/// Thread-safe in-memory store with an optional byte quota.
///
/// The quota counts key and value bytes across all slots, like browser storage does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<FxHashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store holding at most `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            slots: Mutex::default(),
            quota: Some(quota),
        }
    }

    fn slots(&self) -> Result<MutexGuard<'_, FxHashMap<String, String>>, StorageError> {
        self.slots.lock().map_err(|_poisoned| StorageError::Unavailable)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots()?;

        if let Some(quota) = self.quota {
            let size = slots
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, stored)| existing.len() + stored.len())
                .sum::<usize>()
                + key.len()
                + value.len();

            if size > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    size,
                    quota,
                });
            }
        }

        slots.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.slots()?.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn get_missing_key_returns_none() -> TestResult {
        let store = MemoryStore::new();

        assert_eq!(store.get("cart")?, None);

        Ok(())
    }

    #[test]
    fn set_then_get_returns_value() -> TestResult {
        let store = MemoryStore::new();

        store.set("cart", "[]")?;

        assert_eq!(store.get("cart")?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn set_replaces_value() -> TestResult {
        let store = MemoryStore::new();

        store.set("cart", "first")?;
        store.set("cart", "second")?;

        assert_eq!(store.get("cart")?.as_deref(), Some("second"));

        Ok(())
    }

    #[test]
    fn remove_missing_key_succeeds() -> TestResult {
        let store = MemoryStore::new();

        store.remove("cart")?;
        store.set("cart", "[]")?;
        store.remove("cart")?;

        assert_eq!(store.get("cart")?, None);

        Ok(())
    }

    #[test]
    fn writes_over_quota_fail_and_keep_previous_value() -> TestResult {
        let store = MemoryStore::with_quota(10);

        store.set("cart", "[]")?;

        let result = store.set("cart", "[1,2,3,4,5]");

        assert!(
            matches!(
                result,
                Err(StorageError::QuotaExceeded {
                    size: 15,
                    quota: 10,
                    ..
                })
            ),
            "expected QuotaExceeded, got {result:?}"
        );
        assert_eq!(store.get("cart")?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn quota_does_not_double_count_replaced_slot() -> TestResult {
        let store = MemoryStore::with_quota(8);

        store.set("cart", "[1]")?;
        store.set("cart", "[12]")?;

        assert_eq!(store.get("cart")?.as_deref(), Some("[12]"));

        Ok(())
    }
}
