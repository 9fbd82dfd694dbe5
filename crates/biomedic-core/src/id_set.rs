// ABOUTME: IdSet, a persisted set of record names used for both selection and favorites.
// ABOUTME: Every mutation writes the full membership back; reconcile() drops names with no record.

use std::collections::BTreeSet;

use crate::kv::{KeyValueStore, KvError, Loaded, read_json, write_json};

/// Storage key for the names selected for bulk export.
pub const SELECTED_KEY: &str = "selected_equipment";
/// Storage key for the names marked as favorites.
pub const FAVORITES_KEY: &str = "favorite_equipment";

/// A set of record identities (names) persisted under a single key. Members
/// are weak references: nothing here keeps a record alive.
#[derive(Debug, Clone)]
pub struct IdSet {
    key: &'static str,
    ids: BTreeSet<String>,
}

impl IdSet {
    /// An empty set bound to `key`, not yet persisted.
    pub fn empty(key: &'static str) -> Self {
        Self {
            key,
            ids: BTreeSet::new(),
        }
    }

    /// Read the membership stored under `key`. Absent or unreadable payloads
    /// yield an empty set; an unreadable one is overwritten.
    pub fn load(key: &'static str, kv: &mut dyn KeyValueStore) -> Result<Self, KvError> {
        match read_json::<Vec<String>>(kv, key)? {
            Loaded::Found(ids) => Ok(Self {
                key,
                ids: ids.into_iter().collect(),
            }),
            Loaded::Absent => Ok(Self::empty(key)),
            Loaded::Unreadable => {
                let set = Self::empty(key);
                set.persist(kv)?;
                Ok(set)
            }
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn has(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn add(&mut self, id: &str, kv: &mut dyn KeyValueStore) -> Result<(), KvError> {
        self.ids.insert(id.to_string());
        self.persist(kv)
    }

    pub fn remove(&mut self, id: &str, kv: &mut dyn KeyValueStore) -> Result<(), KvError> {
        self.ids.remove(id);
        self.persist(kv)
    }

    /// Flip membership of `id` and return the new state.
    pub fn toggle(&mut self, id: &str, kv: &mut dyn KeyValueStore) -> Result<bool, KvError> {
        let now_member = if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        };
        self.persist(kv)?;
        Ok(now_member)
    }

    /// Drop every member not present in `valid_ids`. Idempotent. Returns how
    /// many members were dropped.
    pub fn reconcile<'a, I>(
        &mut self,
        valid_ids: I,
        kv: &mut dyn KeyValueStore,
    ) -> Result<usize, KvError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let valid: BTreeSet<&str> = valid_ids.into_iter().collect();
        let before = self.ids.len();
        self.ids.retain(|id| valid.contains(id.as_str()));
        let dropped = before - self.ids.len();
        if dropped > 0 {
            tracing::debug!("reconciled {}: dropped {} orphaned names", self.key, dropped);
        }
        self.persist(kv)?;
        Ok(dropped)
    }

    pub fn persist(&self, kv: &mut dyn KeyValueStore) -> Result<(), KvError> {
        let ids: Vec<&str> = self.iter().collect();
        write_json(kv, self.key, &ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn stored(kv: &MemoryStore, key: &str) -> Vec<String> {
        serde_json::from_str(&kv.get(key).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn toggle_flips_and_persists_each_time() {
        let mut kv = MemoryStore::new();
        let mut favorites = IdSet::load(FAVORITES_KEY, &mut kv).unwrap();

        assert!(favorites.toggle("Z", &mut kv).unwrap());
        assert_eq!(stored(&kv, FAVORITES_KEY), vec!["Z"]);

        assert!(!favorites.toggle("Z", &mut kv).unwrap());
        assert!(stored(&kv, FAVORITES_KEY).is_empty());
    }

    #[test]
    fn add_remove_has() {
        let mut kv = MemoryStore::new();
        let mut selected = IdSet::empty(SELECTED_KEY);

        selected.add("A", &mut kv).unwrap();
        selected.add("A", &mut kv).unwrap();
        assert!(selected.has("A"));
        assert_eq!(selected.len(), 1);

        selected.remove("A", &mut kv).unwrap();
        assert!(!selected.has("A"));
        assert!(stored(&kv, SELECTED_KEY).is_empty());
    }

    #[test]
    fn reconcile_drops_orphans_and_is_idempotent() {
        let mut kv = MemoryStore::new();
        let mut selected = IdSet::empty(SELECTED_KEY);
        for id in ["A", "B", "C"] {
            selected.add(id, &mut kv).unwrap();
        }

        assert_eq!(selected.reconcile(["A", "C", "D"], &mut kv).unwrap(), 1);
        assert_eq!(selected.reconcile(["A", "C", "D"], &mut kv).unwrap(), 0);
        assert_eq!(stored(&kv, SELECTED_KEY), vec!["A", "C"]);
    }

    #[test]
    fn load_restores_membership_and_recovers_from_garbage() {
        let mut kv = MemoryStore::new();
        kv.set(FAVORITES_KEY, r#"["X","Y"]"#).unwrap();
        let favorites = IdSet::load(FAVORITES_KEY, &mut kv).unwrap();
        assert!(favorites.has("X") && favorites.has("Y"));

        kv.set(SELECTED_KEY, "nope").unwrap();
        let selected = IdSet::load(SELECTED_KEY, &mut kv).unwrap();
        assert!(selected.is_empty());
        assert!(stored(&kv, SELECTED_KEY).is_empty());
    }
}
