//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Timer tick cadence
//! - Experience rewards for finished focus sessions
//! - Whether the session history log is kept
//! - Sound cues
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::progression::LedgerOptions;
use crate::rewards::RewardPolicy;
use crate::timer::DEFAULT_TICK_PERIOD;

/// Timer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// How often a running countdown is re-evaluated, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Reward configuration. Applied by the caller, never by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardsConfig {
    #[serde(default = "default_focus_xp")]
    pub focus_xp: u64,
    /// Extra experience for naming the session before it finishes.
    #[serde(default = "default_named_session_bonus")]
    pub named_session_bonus: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionConfig {
    #[serde(default = "default_true")]
    pub keep_history: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub rewards: RewardsConfig,
    #[serde(default)]
    pub progression: ProgressionConfig,
    #[serde(default)]
    pub sound: SoundConfig,
}

// Default functions
fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_PERIOD.as_millis() as u64
}
fn default_focus_xp() -> u64 {
    250
}
fn default_named_session_bonus() -> u64 {
    50
}
fn default_true() -> bool {
    true
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            focus_xp: default_focus_xp(),
            named_session_bonus: default_named_session_bonus(),
        }
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self { keep_history: true }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// or if the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(load_failed(e.to_string()).into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value has the wrong type.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        Ok(())
    }

    /// Set a config value by key and persist. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    pub fn ledger_options(&self) -> LedgerOptions {
        LedgerOptions {
            keep_history: self.progression.keep_history,
        }
    }

    pub fn reward_policy(&self) -> RewardPolicy {
        RewardPolicy {
            focus_xp: self.rewards.focus_xp,
            named_session_bonus: self.rewards.named_session_bonus,
        }
    }

    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timer.tick_interval_ms.max(10))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.timer.tick_interval_ms, 100);
        assert_eq!(cfg.tick_period(), DEFAULT_TICK_PERIOD);
        assert_eq!(cfg.rewards.focus_xp, 250);
        assert_eq!(cfg.rewards.named_session_bonus, 50);
        assert!(cfg.progression.keep_history);
        assert!(cfg.sound.enabled);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[rewards]\nfocus_xp = 300\n").unwrap();
        assert_eq!(parsed.rewards.focus_xp, 300);
        assert_eq!(parsed.rewards.named_session_bonus, 50);
        assert_eq!(parsed.timer.tick_interval_ms, 100);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("sound.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("rewards.focus_xp").as_deref(), Some("250"));
        assert!(cfg.get("sound.volume").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("sound.enabled", "false").unwrap();
        cfg.apply("rewards.named_session_bonus", "75").unwrap();
        assert!(!cfg.sound.enabled);
        assert_eq!(cfg.reward_policy().named_session_bonus, 75);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.apply("timer.nonexistent", "1").unwrap_err();
        assert!(matches!(
            err,
            crate::error::CoreError::Config(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.apply("progression.keep_history", "maybe").is_err());
        assert!(cfg.apply("rewards.focus_xp", "-5").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_reads_saved_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.apply("rewards.focus_xp", "400").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().rewards.focus_xp, 400);
    }

    #[test]
    fn unreadable_file_is_an_error_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let bytes = [0xff, 0xfe, b'[', b't', b'i', b'm', b'e', b'r', b']'];
        std::fs::write(&path, bytes).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CoreError::Config(ConfigError::LoadFailed { .. })
        ));
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn malformed_toml_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[rewards\nfocus_xp = ").unwrap();
        assert!(matches!(
            Config::load_from(&path).unwrap_err(),
            crate::error::CoreError::Config(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn derived_settings() {
        let mut cfg = Config::default();
        cfg.progression.keep_history = false;
        cfg.timer.tick_interval_ms = 0;
        assert!(!cfg.ledger_options().keep_history);
        assert_eq!(cfg.tick_period(), std::time::Duration::from_millis(10));
    }
}
