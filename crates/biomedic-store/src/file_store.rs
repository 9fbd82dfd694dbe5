// ABOUTME: FileStore persists each key as <dir>/<key>.json with an atomic write-then-rename.
// ABOUTME: Implements the core KeyValueStore adapter so the inventory survives process restarts.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use biomedic_core::kv::{KeyValueStore, KvError};

/// A durable key-value store: one JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (or create) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, KvError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, KvError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(KvError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to `<key>.tmp`, fsync, then rename over `<key>.json` so readers
    /// never observe a half-written value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        let final_path = self.path_for(key)?;
        let tmp_path = final_path.with_extension("tmp");

        let mut file = File::create(&tmp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &final_path)?;
        tracing::trace!("persisted {} ({} bytes)", key, value.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biomedic_core::kv::{Loaded, read_json, write_json};
    use tempfile::TempDir;

    #[test]
    fn set_then_get_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        assert!(store.get("equipment").unwrap().is_none());
        store.set("equipment", "[]").unwrap();
        assert_eq!(store.get("equipment").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("equipment.json").exists());
        assert!(!dir.path().join("equipment.tmp").exists());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = FileStore::open(dir.path()).unwrap();
            write_json(&mut store, "favorite_equipment", &["Pump", "ECG"]).unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        let loaded: Loaded<Vec<String>> = read_json(&store, "favorite_equipment").unwrap();
        assert_eq!(
            loaded,
            Loaded::Found(vec!["Pump".to_string(), "ECG".to_string()])
        );
    }

    #[test]
    fn overwrite_replaces_value() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.set("theme", "\"light\"").unwrap();
        store.set("theme", "\"dark\"").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("\"dark\""));
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        for key in ["../outside", "a/b", "", "dot.key"] {
            assert!(
                matches!(store.set(key, "1"), Err(KvError::InvalidKey(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }

    #[test]
    fn open_creates_nested_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("deep").join("state");
        FileStore::open(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
