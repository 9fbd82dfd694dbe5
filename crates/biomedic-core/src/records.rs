// ABOUTME: RecordStore owns the canonical, most-recent-first list of equipment records.
// ABOUTME: Enforces the name+serial uniqueness rule on add/update and persists after every mutation.

use thiserror::Error;

use crate::kv::{KeyValueStore, KvError, Loaded, read_json, write_json};
use crate::record::{DeleteKey, EditKey, EquipmentRecord};

/// Storage key holding the record list.
pub const RECORDS_KEY: &str = "equipment";

/// Errors raised by record mutations.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("a record named {name:?} with serial number {serial_number:?} already exists")]
    Duplicate { name: String, serial_number: String },

    #[error("record being edited no longer exists: {0:?}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] KvError),
}

/// The canonical record list. Duplicate checks rescan the whole list; lists
/// are small, so an index keyed by (name, serial) is not kept.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<EquipmentRecord>,
}

impl RecordStore {
    /// Build a store over an existing list without touching persistence.
    pub fn from_records(records: Vec<EquipmentRecord>) -> Self {
        Self { records }
    }

    /// Read the persisted list. An absent key is initialized with the seed
    /// record; an unreadable payload falls back to the seed as well. In both
    /// cases the seeded list is written back immediately.
    pub fn load(kv: &mut dyn KeyValueStore) -> Result<Self, KvError> {
        match read_json::<Vec<EquipmentRecord>>(kv, RECORDS_KEY)? {
            Loaded::Found(records) => {
                tracing::debug!("loaded {} equipment records", records.len());
                Ok(Self { records })
            }
            Loaded::Absent | Loaded::Unreadable => {
                tracing::info!("initializing equipment list with seed record");
                let store = Self {
                    records: vec![EquipmentRecord::seed()],
                };
                store.persist(kv)?;
                Ok(store)
            }
        }
    }

    pub fn persist(&self, kv: &mut dyn KeyValueStore) -> Result<(), KvError> {
        write_json(kv, RECORDS_KEY, &self.records)
    }

    pub fn records(&self) -> &[EquipmentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&EquipmentRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn position_of(&self, key: &EditKey) -> Option<usize> {
        self.records.iter().position(|r| key.matches(r))
    }

    /// Insert at the front of the list and persist. A failed write leaves
    /// the list as it was; the same holds for every mutation below.
    pub fn add(
        &mut self,
        record: EquipmentRecord,
        kv: &mut dyn KeyValueStore,
    ) -> Result<(), RecordError> {
        self.ensure_unique(&record, None)?;
        self.records.insert(0, record);
        if let Err(e) = self.persist(kv) {
            self.records.remove(0);
            return Err(e.into());
        }
        Ok(())
    }

    /// Replace the record matching `original` in place and persist. The new
    /// (name, serial) pair may equal the edited record's own pair.
    pub fn update(
        &mut self,
        original: &EditKey,
        record: EquipmentRecord,
        kv: &mut dyn KeyValueStore,
    ) -> Result<(), RecordError> {
        let index = self
            .position_of(original)
            .ok_or_else(|| RecordError::NotFound(original.name.clone()))?;
        self.ensure_unique(&record, Some(index))?;
        let previous = std::mem::replace(&mut self.records[index], record);
        if let Err(e) = self.persist(kv) {
            self.records[index] = previous;
            return Err(e.into());
        }
        Ok(())
    }

    /// Remove the first record matching `key`. Returns the removed record, or
    /// None without persisting when nothing matched.
    pub fn remove(
        &mut self,
        key: &DeleteKey,
        kv: &mut dyn KeyValueStore,
    ) -> Result<Option<EquipmentRecord>, KvError> {
        let Some(index) = self.records.iter().position(|r| key.matches(r)) else {
            return Ok(None);
        };
        let removed = self.records.remove(index);
        if let Err(e) = self.persist(kv) {
            self.records.insert(index, removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    /// Prepend every candidate with a non-empty name that does not collide
    /// by name with an existing record. Returns how many were added; the
    /// list is persisted only when that count is non-zero.
    pub fn import_batch(
        &mut self,
        candidates: Vec<EquipmentRecord>,
        kv: &mut dyn KeyValueStore,
    ) -> Result<usize, KvError> {
        let mut added = 0;
        for candidate in candidates {
            if candidate.name.is_empty() || self.find_by_name(&candidate.name).is_some() {
                continue;
            }
            self.records.insert(0, candidate);
            added += 1;
        }
        if added > 0 {
            if let Err(e) = self.persist(kv) {
                self.records.drain(..added);
                return Err(e);
            }
        }
        Ok(added)
    }

    fn ensure_unique(
        &self,
        record: &EquipmentRecord,
        skip_index: Option<usize>,
    ) -> Result<(), RecordError> {
        let key = record.duplicate_key();
        let collides = self
            .records
            .iter()
            .enumerate()
            .any(|(idx, existing)| Some(idx) != skip_index && existing.duplicate_key() == key);

        if collides {
            return Err(RecordError::Duplicate {
                name: record.name.clone(),
                serial_number: record.serial_number.clone(),
            });
        }
        Ok(())
    }
}
