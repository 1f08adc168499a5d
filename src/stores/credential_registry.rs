use tracing::debug;

use crate::core::error::StorageError;
use crate::models::credential::CredentialRecord;
use crate::storage::kv::KeyValueStore;
use crate::storage::snapshot;

/// Registered accounts, persisted as one blob.
///
/// Lookups are linear scans on exact email match; the list is demo-sized.
#[derive(Debug, Default)]
pub struct CredentialRegistry {
    records: Vec<CredentialRecord>,
}

impl CredentialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry blob, or start empty when none was saved
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, StorageError> {
        let records: Vec<CredentialRecord> = snapshot::load(store)?.unwrap_or_default();
        debug!(records = records.len(), "Credential registry loaded");
        Ok(Self { records })
    }

    pub fn find_by_email(&self, email: &str) -> Option<&CredentialRecord> {
        self.records.iter().find(|record| record.email == email)
    }

    pub fn contains_email(&self, email: &str) -> bool {
        self.find_by_email(email).is_some()
    }

    /// Append a record and persist the whole registry.
    ///
    /// The record is dropped again if the write fails, so memory matches what
    /// was last stored.
    pub fn append(
        &mut self,
        record: CredentialRecord,
        store: &dyn KeyValueStore,
    ) -> Result<(), StorageError> {
        self.records.push(record);
        if let Err(e) = snapshot::save(store, &self.records) {
            self.records.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Remove the record with `id` and persist the registry.
    ///
    /// If the write fails the record is put back where it was.
    pub fn discard(&mut self, id: &str, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        let Some(index) = self.records.iter().position(|record| record.id == id) else {
            return Ok(());
        };

        let record = self.records.remove(index);
        if let Err(e) = snapshot::save(store, &self.records) {
            self.records.insert(index, record);
            return Err(e);
        }

        debug!(record_id = %id, "Credential record discarded");
        Ok(())
    }

    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::{FlakyStore, MemoryStore};

    fn record(email: &str) -> CredentialRecord {
        CredentialRecord {
            id: format!("id-{}", email),
            email: email.to_string(),
            password: "secret1".to_string(),
            name: "Anna".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_append_and_find() {
        let store = MemoryStore::new();
        let mut registry = CredentialRegistry::new();
        assert!(registry.is_empty());

        registry.append(record("a@x.com"), &store).unwrap();
        registry.append(record("b@x.com"), &store).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find_by_email("b@x.com").unwrap().id, "id-b@x.com");
        assert!(registry.contains_email("a@x.com"));
        assert!(!registry.contains_email("c@x.com"));
    }

    #[test]
    fn test_email_match_is_exact() {
        let store = MemoryStore::new();
        let mut registry = CredentialRegistry::new();
        registry.append(record("a@x.com"), &store).unwrap();

        assert!(registry.find_by_email("A@X.COM").is_none());
        assert!(registry.find_by_email(" a@x.com").is_none());
    }

    #[test]
    fn test_registry_persists() {
        let store = MemoryStore::new();
        let mut registry = CredentialRegistry::new();
        registry.append(record("a@x.com"), &store).unwrap();

        let reloaded = CredentialRegistry::load(&store).unwrap();
        assert_eq!(reloaded.records(), registry.records());
    }

    #[test]
    fn test_load_empty_store() {
        let store = MemoryStore::new();
        let registry = CredentialRegistry::load(&store).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_discard_removes_and_persists() {
        let store = MemoryStore::new();
        let mut registry = CredentialRegistry::new();
        registry.append(record("a@x.com"), &store).unwrap();
        registry.append(record("b@x.com"), &store).unwrap();

        registry.discard("id-a@x.com", &store).unwrap();
        registry.discard("id-missing", &store).unwrap();

        let reloaded = CredentialRegistry::load(&store).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.contains_email("b@x.com"));
    }

    #[test]
    fn test_failed_writes_leave_registry_unchanged() {
        let store = FlakyStore::new();
        let mut registry = CredentialRegistry::new();
        registry.append(record("a@x.com"), &store).unwrap();

        store.fail_writes(FlakyStore::ALL_KEYS);
        assert!(registry.append(record("b@x.com"), &store).is_err());
        assert!(registry.discard("id-a@x.com", &store).is_err());

        assert_eq!(registry.len(), 1);
        assert!(registry.contains_email("a@x.com"));
        assert_eq!(CredentialRegistry::load(&store).unwrap().records(), registry.records());
    }
}
