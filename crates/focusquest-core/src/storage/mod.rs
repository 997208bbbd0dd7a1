mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, ProgressionConfig, RewardsConfig, SoundConfig, TimerConfig};
pub use database::Database;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Result, StorageError};

/// Persisted key names.
pub mod keys {
    pub const EXPERIENCE: &str = "fq_xp";
    pub const CURRENCY: &str = "fq_coins";
    pub const UNLOCKED_THEMES: &str = "fq_themes";
    pub const EQUIPPED_THEME: &str = "fq_theme";
    pub const SESSION_HISTORY: &str = "fq_quests";
    pub const SCHEMA_VERSION: &str = "fq_schema_version";
}

/// String-keyed, string-valued durable store.
///
/// Reads and writes are synchronous; a successful `set` is durable before
/// the next `get` observes it.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Write several entries as one unit.
    ///
    /// Stores that can fail partway should override this so a failed batch
    /// leaves every key as it was. The default writes one entry at a time.
    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        (**self).set_many(entries)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        (**self).set_many(entries)
    }
}

/// In-memory store for tests and throwaway profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Returns the FocusQuest data directory.
///
/// `FOCUSQUEST_HOME` wins when set. Otherwise `~/.config/focusquest[-dev]/`
/// based on `FOCUSQUEST_ENV` (set it to `dev` for a development profile).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("FOCUSQUEST_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSQUEST_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusquest-dev")
            } else {
                base_dir.join("focusquest")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
