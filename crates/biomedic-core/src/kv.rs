// ABOUTME: Persistent store adapter: string-keyed get/set of JSON blobs behind the KeyValueStore trait.
// ABOUTME: Ships MemoryStore for tests and embedding, plus typed read/write helpers over any adapter.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised by a persistent store adapter.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// The sole abstraction over durable storage. Values are JSON-encoded strings.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError>;
}

/// Volatile adapter backed by a HashMap.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Result of reading a typed value from the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    Found(T),
    Absent,
    /// A payload exists under the key but does not parse as `T`.
    Unreadable,
}

/// Read and decode the value under `key`. A payload that fails to parse is
/// reported as `Loaded::Unreadable` rather than an error so callers can fall
/// back to their default state.
pub fn read_json<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> Result<Loaded<T>, KvError> {
    let Some(raw) = kv.get(key)? else {
        return Ok(Loaded::Absent);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Loaded::Found(value)),
        Err(e) => {
            tracing::warn!("stored payload under {:?} is unreadable: {}", key, e);
            Ok(Loaded::Unreadable)
        }
    }
}

/// Encode `value` as JSON and store it under `key`.
pub fn write_json<T: Serialize + ?Sized>(
    kv: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), KvError> {
    let json = serde_json::to_string(value)?;
    kv.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_set() {
        let mut kv = MemoryStore::new();
        assert!(kv.get("theme").unwrap().is_none());

        kv.set("theme", "\"dark\"").unwrap();
        assert_eq!(kv.get("theme").unwrap().as_deref(), Some("\"dark\""));
    }

    #[test]
    fn read_json_distinguishes_absent_found_and_unreadable() {
        let mut kv = MemoryStore::new();

        let absent: Loaded<Vec<String>> = read_json(&kv, "names").unwrap();
        assert_eq!(absent, Loaded::Absent);

        write_json(&mut kv, "names", &["a", "b"]).unwrap();
        let found: Loaded<Vec<String>> = read_json(&kv, "names").unwrap();
        assert_eq!(found, Loaded::Found(vec!["a".to_string(), "b".to_string()]));

        kv.set("names", "[not json").unwrap();
        let broken: Loaded<Vec<String>> = read_json(&kv, "names").unwrap();
        assert_eq!(broken, Loaded::Unreadable);
    }
}
