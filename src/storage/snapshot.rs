//! Versioned snapshots of session state.
//!
//! Values are stored as `{"version": 1, "data": ...}`. Blobs written by the
//! browser portal carry no version and use camelCase field names; they are
//! migrated on read. Anything else is rejected as corrupt.

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::StorageError;
use crate::models::credential::CredentialRecord;
use crate::models::membership::Membership;
use crate::models::user::User;
use crate::storage::kv::KeyValueStore;
use crate::utils::ids::generate_id;

pub const USER_KEY: &str = "user";
pub const REGISTRY_KEY: &str = "registeredUsers";

pub const CURRENT_VERSION: u32 = 1;

/// Validity assumed for legacy memberships that only recorded one date
const LEGACY_VALIDITY_DAYS: i64 = 30;

/// A value persisted under a fixed storage key
pub trait Snapshot: Serialize + DeserializeOwned + Sized {
    const KEY: &'static str;

    /// Unversioned shape written by the browser portal
    type Legacy: DeserializeOwned;

    fn migrate(legacy: Self::Legacy) -> Result<Self, String>;
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    version: u32,
    data: Value,
}

pub fn encode<T: Snapshot>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(&EnvelopeRef {
        version: CURRENT_VERSION,
        data: value,
    })
    .map_err(|e| StorageError::Serialize {
        key: T::KEY.to_string(),
        source: e,
    })
}

pub fn decode<T: Snapshot>(raw: &str) -> Result<T, StorageError> {
    let corrupt = |reason: String| StorageError::Corrupt {
        key: T::KEY.to_string(),
        reason,
    };

    let value: Value = serde_json::from_str(raw).map_err(|e| corrupt(e.to_string()))?;

    let versioned = value
        .as_object()
        .is_some_and(|object| object.contains_key("version"));

    if !versioned {
        let legacy: T::Legacy = serde_json::from_value(value).map_err(|e| corrupt(e.to_string()))?;
        return T::migrate(legacy).map_err(corrupt);
    }

    let envelope: Envelope = serde_json::from_value(value).map_err(|e| corrupt(e.to_string()))?;
    if envelope.version != CURRENT_VERSION {
        return Err(StorageError::UnsupportedVersion {
            key: T::KEY.to_string(),
            version: envelope.version,
        });
    }

    serde_json::from_value(envelope.data).map_err(|e| corrupt(e.to_string()))
}

pub fn load<T: Snapshot>(store: &dyn KeyValueStore) -> Result<Option<T>, StorageError> {
    match store.get(T::KEY)? {
        Some(raw) => decode(&raw).map(Some),
        None => Ok(None),
    }
}

pub fn save<T: Snapshot>(store: &dyn KeyValueStore, value: &T) -> Result<(), StorageError> {
    store.set(T::KEY, encode(value)?)
}

pub fn clear<T: Snapshot>(store: &dyn KeyValueStore) -> Result<(), StorageError> {
    store.remove(T::KEY)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyMembership {
    plan: String,
    #[serde(default)]
    style: Option<String>,
    #[serde(default)]
    remaining_classes: Option<u32>,
    #[serde(default)]
    total_classes: Option<u32>,
    #[serde(default)]
    purchase_date: Option<DateTime<Utc>>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyUser {
    id: String,
    name: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    membership: Option<LegacyMembership>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCredential {
    #[serde(default)]
    id: Option<String>,
    email: String,
    password: String,
    name: String,
    #[serde(default)]
    phone: Option<String>,
}

impl TryFrom<LegacyMembership> for Membership {
    type Error = String;

    fn try_from(legacy: LegacyMembership) -> Result<Self, Self::Error> {
        let validity = Duration::days(LEGACY_VALIDITY_DAYS);
        let (purchased_at, expires_at) = match (legacy.purchase_date, legacy.expires_at) {
            (Some(purchased), Some(expires)) => (purchased, expires),
            (Some(purchased), None) => (purchased, purchased + validity),
            (None, Some(expires)) => (expires - validity, expires),
            (None, None) => return Err("membership has no purchase or expiry date".to_string()),
        };

        let total_classes = legacy.total_classes.unwrap_or(0);
        let remaining_classes = legacy.remaining_classes.unwrap_or(total_classes);

        Ok(Membership {
            plan: legacy.plan,
            style: legacy.style,
            remaining_classes,
            total_classes,
            purchased_at,
            expires_at,
        })
    }
}

impl Snapshot for User {
    const KEY: &'static str = USER_KEY;
    type Legacy = LegacyUser;

    fn migrate(legacy: LegacyUser) -> Result<Self, String> {
        let membership = legacy.membership.map(Membership::try_from).transpose()?;
        Ok(User {
            id: legacy.id,
            name: legacy.name,
            email: legacy.email,
            phone: legacy.phone,
            membership,
        })
    }
}

impl Snapshot for Vec<CredentialRecord> {
    const KEY: &'static str = REGISTRY_KEY;
    type Legacy = Vec<LegacyCredential>;

    fn migrate(legacy: Vec<LegacyCredential>) -> Result<Self, String> {
        Ok(legacy
            .into_iter()
            .map(|record| CredentialRecord {
                id: record.id.unwrap_or_else(generate_id),
                email: record.email,
                password: record.password,
                name: record.name,
                phone: record.phone,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryStore;
    use chrono::TimeZone;

    fn anna_with_membership() -> User {
        let purchased = Utc.with_ymd_and_hms(2026, 5, 4, 18, 30, 15).unwrap();
        let mut user = User::new(
            "u1".to_string(),
            "Anna".to_string(),
            "a@x.com".to_string(),
            Some("+1 555 0100".to_string()),
        );
        user.membership = Some(Membership::new(
            "Premium",
            Some("Ballet".to_string()),
            16,
            purchased,
            30,
        ));
        user
    }

    #[test]
    fn test_user_round_trip_preserves_timestamps() {
        let store = MemoryStore::new();
        let user = anna_with_membership();

        save(&store, &user).unwrap();
        let loaded: User = load(&store).unwrap().unwrap();

        let original = user.membership.as_ref().unwrap();
        let restored = loaded.membership.as_ref().unwrap();
        assert_eq!(restored.purchased_at.timestamp(), original.purchased_at.timestamp());
        assert_eq!(restored.expires_at, original.expires_at);
        assert_eq!(loaded, user);
    }

    #[test]
    fn test_encoded_value_is_versioned() {
        let raw = encode(&anna_with_membership()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 1);
        assert!(value["data"]["membership"]["purchased_at"]
            .as_str()
            .unwrap()
            .starts_with("2026-05-04T18:30:15"));
    }

    #[test]
    fn test_missing_key_loads_none() {
        let store = MemoryStore::new();
        assert!(load::<User>(&store).unwrap().is_none());
    }

    #[test]
    fn test_legacy_user_is_migrated() {
        let raw = r#"{
            "id": "1",
            "name": "Anna",
            "email": "a@x.com",
            "membership": {
                "plan": "Premium",
                "style": "Ballet",
                "remainingClasses": 10,
                "totalClasses": 16,
                "expiresAt": "2026-06-03T18:30:15.000Z"
            }
        }"#;

        let user: User = decode(raw).unwrap();
        let membership = user.membership.unwrap();
        assert_eq!(membership.remaining_classes, 10);
        assert_eq!(membership.total_classes, 16);
        assert_eq!(
            membership.purchased_at,
            Utc.with_ymd_and_hms(2026, 5, 4, 18, 30, 15).unwrap()
        );
    }

    #[test]
    fn test_legacy_membership_without_dates_is_corrupt() {
        let raw = r#"{"id":"1","name":"Anna","email":"a@x.com","membership":{"plan":"Basic"}}"#;
        assert!(matches!(
            decode::<User>(raw),
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_legacy_registry_is_migrated() {
        let raw = r#"[{"email":"a@x.com","password":"secret1","name":"Anna"}]"#;
        let records: Vec<CredentialRecord> = decode(raw).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].email, "a@x.com");
        assert_eq!(records[0].id.len(), 16);
    }

    #[test]
    fn test_unsupported_version() {
        let raw = r#"{"version": 7, "data": {}}"#;
        assert!(matches!(
            decode::<User>(raw),
            Err(StorageError::UnsupportedVersion { version: 7, .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_corrupt() {
        assert!(matches!(
            decode::<User>("{not json"),
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_current_version_rejects_unknown_fields() {
        let raw = r#"{"version":1,"data":{"id":"1","name":"A","email":"a@x.com","isAdmin":true}}"#;
        assert!(matches!(
            decode::<User>(raw),
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_clear_removes_snapshot() {
        let store = MemoryStore::new();
        save(&store, &anna_with_membership()).unwrap();
        clear::<User>(&store).unwrap();
        assert!(load::<User>(&store).unwrap().is_none());
    }
}
