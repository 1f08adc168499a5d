use dashmap::DashMap;

use crate::core::error::StorageError;

/// String-keyed, string-valued storage holding persisted snapshots.
///
/// Writes are synchronous; a failed write is reported to the caller and never
/// retried.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage. Nothing survives a restart.
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Test store whose writes can be made to fail for one key or for all keys
#[cfg(test)]
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    failing: std::sync::Mutex<Option<String>>,
}

#[cfg(test)]
impl FlakyStore {
    pub const ALL_KEYS: &'static str = "*";

    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            failing: std::sync::Mutex::new(None),
        }
    }

    /// Fail every later `set` and `remove` on `key`, or on any key for `ALL_KEYS`
    pub fn fail_writes(&self, key: &str) {
        *self.failing.lock().unwrap() = Some(key.to_string());
    }

    pub fn heal(&self) {
        *self.failing.lock().unwrap() = None;
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn check(&self, key: &str) -> Result<(), StorageError> {
        match self.failing.lock().unwrap().as_deref() {
            Some(failing) if failing == Self::ALL_KEYS || failing == key => {
                Err(StorageError::Io(std::io::Error::other(format!(
                    "write to {} refused",
                    key
                ))))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("user", "{}".to_string()).unwrap();
        assert_eq!(store.get("user").unwrap().as_deref(), Some("{}"));
        assert_eq!(store.len(), 1);

        store.remove("user").unwrap();
        assert_eq!(store.get("user").unwrap(), None);
    }

    #[test]
    fn test_memory_store_overwrite() {
        let store = MemoryStore::new();
        store.set("k", "a".to_string()).unwrap();
        store.set("k", "b".to_string()).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("missing").is_ok());
    }

    #[test]
    fn test_flaky_store_fails_only_the_chosen_key() {
        let store = FlakyStore::new();
        store.fail_writes("user");

        assert!(matches!(store.set("user", "{}".to_string()), Err(StorageError::Io(_))));
        assert!(store.set("registeredUsers", "[]".to_string()).is_ok());

        store.heal();
        assert!(store.set("user", "{}".to_string()).is_ok());
    }
}
