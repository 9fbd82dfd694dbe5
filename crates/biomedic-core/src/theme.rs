// ABOUTME: Light/dark theme preference persisted under the theme key.

use serde::{Deserialize, Serialize};

use crate::kv::{KeyValueStore, KvError, Loaded, read_json, write_json};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stored theme, or light when absent or unreadable.
    pub fn load(kv: &dyn KeyValueStore) -> Result<Self, KvError> {
        match read_json::<Self>(kv, THEME_KEY)? {
            Loaded::Found(theme) => Ok(theme),
            Loaded::Absent | Loaded::Unreadable => Ok(Self::default()),
        }
    }

    pub fn persist(self, kv: &mut dyn KeyValueStore) -> Result<(), KvError> {
        write_json(kv, THEME_KEY, &self)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    #[test]
    fn theme_persists_as_lowercase_literal() {
        let mut kv = MemoryStore::new();
        assert_eq!(Theme::load(&kv).unwrap(), Theme::Light);

        Theme::Light.toggled().persist(&mut kv).unwrap();
        assert_eq!(kv.get(THEME_KEY).unwrap().as_deref(), Some("\"dark\""));
        assert_eq!(Theme::load(&kv).unwrap(), Theme::Dark);

        kv.set(THEME_KEY, "\"sepia\"").unwrap();
        assert_eq!(Theme::load(&kv).unwrap(), Theme::Light);
    }
}
