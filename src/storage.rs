//! Expiring key/value storage.
//!
//! The host injects a plain string store (the browser `localStorage` seam);
//! this module layers the expiring-entry envelope on top of it. Every entry
//! is persisted as `{"value": …, "expiration": <epoch millis>}` and a read
//! past its expiration evicts the entry and reports it as absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Plain string key/value store provided by the host environment.
///
/// Implementations must use interior mutability: all components of the bridge
/// share one store and call it from `&self` contexts.
pub trait KeyValueStorage: Send + Sync {
    /// Read the raw value stored under `key`
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str);

    /// Remove the entry stored under `key`, if any
    fn remove_item(&self, key: &str);
}

/// Time-to-live for an expiring entry: a relative duration or an explicit instant
#[derive(Debug, Clone, Copy)]
pub enum StorageTtl {
    /// Expire this many seconds from now
    Seconds(i64),
    /// Expire at the given instant
    Until(DateTime<Utc>),
}

#[derive(Serialize, Deserialize)]
struct ItemWithExpiration {
    value: String,
    expiration: i64,
}

/// Reads an entry written by [`set_with_expiration`]. An entry past its
/// expiration is deleted as a side effect of the read and reported absent.
pub fn get_with_expiration(storage: &dyn KeyValueStorage, key: &str) -> Option<String> {
    let raw = storage.get_item(key)?;
    let Ok(item) = serde_json::from_str::<ItemWithExpiration>(&raw) else {
        log::warn!("discarding malformed storage entry: {key}");
        storage.remove_item(key);
        return None;
    };
    if item.expiration > Utc::now().timestamp_millis() {
        Some(item.value)
    } else {
        log::debug!("storage entry expired: {key}");
        storage.remove_item(key);
        None
    }
}

/// Stores `value` under `key` wrapped in the expiring-entry envelope
pub fn set_with_expiration(storage: &dyn KeyValueStorage, key: &str, value: &str, ttl: StorageTtl) {
    let expiration = match ttl {
        StorageTtl::Seconds(seconds) => Utc::now().timestamp_millis() + seconds * 1000,
        StorageTtl::Until(instant) => instant.timestamp_millis(),
    };
    let item = ItemWithExpiration {
        value: value.to_owned(),
        expiration,
    };
    match serde_json::to_string(&item) {
        Ok(data) => storage.set_item(key, &data),
        Err(err) => log::error!("failed to serialize storage entry {key}: {err}"),
    }
}

/// In-memory [`KeyValueStorage`] backed by a mutex-guarded map.
///
/// The default store for hosts without a persistence layer, and the store the
/// test suite runs against.
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(std::sync::PoisonError::into_inner).len()
    }

    /// True when no entries are held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove_item(&self, key: &str) {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn round_trips_an_unexpired_entry() {
        let storage = MemoryStorage::new();
        set_with_expiration(&storage, "k", "v", StorageTtl::Seconds(60));
        assert_eq!(get_with_expiration(&storage, "k"), Some("v".to_owned()));
    }

    #[test]
    fn honors_an_explicit_expiration_instant() {
        let storage = MemoryStorage::new();
        let at = Utc::now() + Duration::minutes(5);
        set_with_expiration(&storage, "k", "v", StorageTtl::Until(at));
        assert_eq!(get_with_expiration(&storage, "k"), Some("v".to_owned()));
    }

    #[test]
    fn evicts_an_expired_entry_on_read() {
        let storage = MemoryStorage::new();
        let past = Utc::now() - Duration::seconds(1);
        set_with_expiration(&storage, "k", "v", StorageTtl::Until(past));
        assert_eq!(get_with_expiration(&storage, "k"), None);
        // the raw entry is gone, not merely masked
        assert_eq!(storage.get_item("k"), None);
    }

    #[test]
    fn discards_a_malformed_entry() {
        let storage = MemoryStorage::new();
        storage.set_item("k", "not json");
        assert_eq!(get_with_expiration(&storage, "k"), None);
        assert_eq!(storage.get_item("k"), None);
    }

    #[test]
    fn missing_key_reads_absent() {
        let storage = MemoryStorage::new();
        assert_eq!(get_with_expiration(&storage, "missing"), None);
    }

    #[test]
    fn envelope_shape_is_value_and_expiration() {
        let storage = MemoryStorage::new();
        set_with_expiration(&storage, "k", "v", StorageTtl::Seconds(60));
        let raw = storage.get_item("k").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["value"], "v");
        assert!(parsed["expiration"].as_i64().unwrap() > Utc::now().timestamp_millis());
    }
}
