//! Versioned migrations for persisted progression records.
//!
//! Migrations run once per store when the ledger opens. The version lives
//! under [`keys::SCHEMA_VERSION`]; a store without one is version 0.
//!
//! Values that cannot be parsed are left untouched here. The ledger's
//! per-field fallback deals with them at load time.

use serde_json::Value;

use super::{keys, KeyValueStore};
use crate::error::Result;
use crate::progression::dedupe_themes;
use crate::themes::DEFAULT_THEME_ID;

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const CURRENT_VERSION: u32 = 2;

/// Apply all pending migrations. Returns the resulting version.
///
/// # Errors
/// Returns an error if the store cannot be read or written.
pub fn migrate<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<u32> {
    let current_version = schema_version(store)?;

    if current_version < 1 {
        migrate_v1(store)?;
    }
    if current_version < 2 {
        migrate_v2(store)?;
    }

    if current_version < CURRENT_VERSION {
        tracing::info!(
            from = current_version,
            to = CURRENT_VERSION,
            "migrated progression store"
        );
    }
    Ok(CURRENT_VERSION.max(current_version))
}

/// Read the stored schema version. Missing or unreadable means 0.
pub fn schema_version<S: KeyValueStore + ?Sized>(store: &S) -> Result<u32> {
    let Some(raw) = store.get(keys::SCHEMA_VERSION)? else {
        return Ok(0);
    };
    Ok(raw.trim().parse::<u32>().unwrap_or_else(|e| {
        tracing::warn!(value = %raw, error = %e, "failed to read schema version, assuming 0");
        0
    }))
}

fn set_schema_version<S: KeyValueStore + ?Sized>(store: &mut S, version: u32) -> Result<()> {
    store.set(keys::SCHEMA_VERSION, &version.to_string())
}

/// Migration v1: baseline. Profiles written before versioning already use
/// the v1 layout.
fn migrate_v1<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<()> {
    set_schema_version(store, 1)
}

/// Migration v2: normalize records written by older builds.
///
/// - session records: `text` -> `label`, `xp` -> `experienceAwarded`
/// - unlocked themes: duplicates removed, default theme guaranteed
/// - equipped theme: reset to default when it is not unlocked
///
/// The rewrites and the version bump are written as one batch.
fn migrate_v2<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<()> {
    let mut writes: Vec<(&str, String)> = Vec::new();

    if let Some(raw) = store.get(keys::SESSION_HISTORY)? {
        if let Ok(mut entries) = serde_json::from_str::<Vec<Value>>(&raw) {
            let mut changed = false;
            for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
                changed |= rename_field(entry, "text", "label");
                changed |= rename_field(entry, "xp", "experienceAwarded");
            }
            if changed {
                writes.push((keys::SESSION_HISTORY, serde_json::to_string(&entries)?));
            }
        }
    }

    let themes = match store.get(keys::UNLOCKED_THEMES)? {
        Some(raw) => serde_json::from_str::<Vec<String>>(&raw).ok().map(|mut themes| {
            let before = themes.clone();
            dedupe_themes(&mut themes);
            (themes != before, themes)
        }),
        None => None,
    };
    if let Some((changed, themes)) = themes {
        if changed {
            writes.push((keys::UNLOCKED_THEMES, serde_json::to_string(&themes)?));
        }
        if let Some(equipped) = store.get(keys::EQUIPPED_THEME)? {
            if !themes.iter().any(|t| *t == equipped) {
                writes.push((keys::EQUIPPED_THEME, DEFAULT_THEME_ID.to_string()));
            }
        }
    }

    writes.push((keys::SCHEMA_VERSION, 2.to_string()));
    let entries: Vec<(&str, &str)> = writes.iter().map(|(k, v)| (*k, v.as_str())).collect();
    store.set_many(&entries)
}

fn rename_field(entry: &mut serde_json::Map<String, Value>, from: &str, to: &str) -> bool {
    if entry.contains_key(to) {
        return entry.remove(from).is_some();
    }
    match entry.remove(from) {
        Some(value) => {
            entry.insert(to.to_string(), value);
            true
        }
        None => false,
    }
}
