//! Experience, currency and theme bookkeeping.
//!
//! The ledger owns [`ProgressionState`] and writes the whole state back to
//! its [`KeyValueStore`] on every mutation. A failed write rolls the
//! in-memory state back, so memory and storage agree after every call that
//! returns `Ok`.
//!
//! The ledger never looks at the timer. Whoever wires a finished countdown
//! to [`ProgressionLedger::award_experience`] decides how much a session is
//! worth (see [`crate::rewards`]).

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::history::SessionRecord;
use super::levels;
use crate::error::Result;
use crate::storage::{keys, migrations, KeyValueStore};
use crate::themes::DEFAULT_THEME_ID;

/// One coin for every ten experience points awarded.
pub const XP_PER_COIN: u64 = 10;

/// The persisted progression record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    pub experience: u64,
    pub currency: u64,
    /// Derived from `experience`; recomputed, never loaded.
    pub level: u32,
    /// Unlock order is preserved; always contains the default theme.
    pub unlocked_themes: Vec<String>,
    pub equipped_theme: String,
    /// Newest first.
    pub session_history: Vec<SessionRecord>,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self {
            experience: 0,
            currency: 0,
            level: 1,
            unlocked_themes: vec![DEFAULT_THEME_ID.to_string()],
            equipped_theme: DEFAULT_THEME_ID.to_string(),
            session_history: Vec::new(),
        }
    }
}

impl ProgressionState {
    fn recompute_level(&mut self) {
        self.level = levels::level_for(self.experience);
    }

    pub fn is_unlocked(&self, theme_id: &str) -> bool {
        self.unlocked_themes.iter().any(|t| t == theme_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerOptions {
    /// Keep the session history log. Without it `record_session` still
    /// builds the record but nothing is stored.
    pub keep_history: bool,
}

impl Default for LedgerOptions {
    fn default() -> Self {
        Self { keep_history: true }
    }
}

/// Result of an experience award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardOutcome {
    pub previous_level: u32,
    pub new_level: u32,
    pub leveled_up: bool,
    pub currency_earned: u64,
}

pub struct ProgressionLedger<S: KeyValueStore> {
    store: S,
    state: ProgressionState,
    options: LedgerOptions,
}

impl<S: KeyValueStore> ProgressionLedger<S> {
    /// Migrate the store if needed and rehydrate state from it.
    ///
    /// Missing keys take their defaults. A corrupt value only resets its own
    /// field; the rest of the profile still loads.
    ///
    /// # Errors
    /// Returns an error only if the store itself cannot be read or written.
    pub fn open(mut store: S, options: LedgerOptions) -> Result<Self> {
        migrations::migrate(&mut store)?;
        let state = load_state(&store, options)?;
        tracing::debug!(
            experience = state.experience,
            currency = state.currency,
            level = state.level,
            "progression loaded"
        );
        Ok(Self {
            store,
            state,
            options,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn experience(&self) -> u64 {
        self.state.experience
    }

    pub fn currency(&self) -> u64 {
        self.state.currency
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn unlocked_themes(&self) -> &[String] {
        &self.state.unlocked_themes
    }

    pub fn is_unlocked(&self, theme_id: &str) -> bool {
        self.state.is_unlocked(theme_id)
    }

    pub fn equipped_theme(&self) -> &str {
        &self.state.equipped_theme
    }

    pub fn session_history(&self) -> &[SessionRecord] {
        &self.state.session_history
    }

    pub fn options(&self) -> LedgerOptions {
        self.options
    }

    /// Percentage through the current level, in `[0, 100]`.
    pub fn level_progress(&self) -> f64 {
        levels::progress_percent(self.state.experience)
    }

    /// Experience at which the next level starts.
    pub fn next_level_threshold(&self) -> u64 {
        levels::next_threshold(self.state.level)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Add `amount` experience and `amount / 10` coins.
    ///
    /// An award of zero changes nothing but is still written through.
    pub fn award_experience(&mut self, amount: u64) -> Result<AwardOutcome> {
        let snapshot = self.state.clone();
        let previous_level = self.state.level;
        let currency_earned = amount / XP_PER_COIN;

        self.state.experience = self.state.experience.saturating_add(amount);
        self.state.currency = self.state.currency.saturating_add(currency_earned);
        self.state.recompute_level();
        self.commit(snapshot)?;

        let outcome = AwardOutcome {
            previous_level,
            new_level: self.state.level,
            leveled_up: self.state.level > previous_level,
            currency_earned,
        };
        if outcome.leveled_up {
            tracing::info!(from = previous_level, to = outcome.new_level, "level up");
        }
        Ok(outcome)
    }

    /// Buy `theme_id` for `cost` coins.
    ///
    /// Returns `Ok(false)` without touching state when the balance is short
    /// or the theme is already owned.
    pub fn purchase_theme(&mut self, theme_id: &str, cost: u64) -> Result<bool> {
        if self.state.is_unlocked(theme_id) || self.state.currency < cost {
            tracing::debug!(theme_id, cost, currency = self.state.currency, "purchase denied");
            return Ok(false);
        }
        let snapshot = self.state.clone();
        self.state.currency -= cost;
        self.state.unlocked_themes.push(theme_id.to_string());
        self.state.recompute_level();
        self.commit(snapshot)?;
        Ok(true)
    }

    /// Equip an unlocked theme. Locked themes are ignored (`Ok(false)`).
    pub fn equip_theme(&mut self, theme_id: &str) -> Result<bool> {
        if !self.state.is_unlocked(theme_id) {
            return Ok(false);
        }
        let snapshot = self.state.clone();
        self.state.equipped_theme = theme_id.to_string();
        self.state.recompute_level();
        self.commit(snapshot)?;
        Ok(true)
    }

    /// Prepend a session to the history log. Does not award experience.
    pub fn record_session(&mut self, label: &str, experience_awarded: u64) -> Result<SessionRecord> {
        self.record_session_at(label, experience_awarded, Local::now())
    }

    pub fn record_session_at(
        &mut self,
        label: &str,
        experience_awarded: u64,
        at: DateTime<Local>,
    ) -> Result<SessionRecord> {
        let record =
            SessionRecord::new_head(&self.state.session_history, label, experience_awarded, at);
        if !self.options.keep_history {
            return Ok(record);
        }
        let snapshot = self.state.clone();
        self.state.session_history.insert(0, record.clone());
        self.commit(snapshot)?;
        Ok(record)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Write the state through; restore `snapshot` if the store refuses.
    fn commit(&mut self, snapshot: ProgressionState) -> Result<()> {
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "failed to persist progression, rolling back");
            self.state = snapshot;
            return Err(e);
        }
        Ok(())
    }

    /// Write every field in a single batch so a failed write cannot leave
    /// some keys ahead of the others.
    fn persist(&mut self) -> Result<()> {
        let state = &self.state;
        tracing::debug!(
            experience = state.experience,
            currency = state.currency,
            themes = state.unlocked_themes.len(),
            "persisting progression"
        );
        let experience = state.experience.to_string();
        let currency = state.currency.to_string();
        let themes = serde_json::to_string(&state.unlocked_themes)?;
        let history = if self.options.keep_history {
            Some(serde_json::to_string(&state.session_history)?)
        } else {
            None
        };

        let mut entries = vec![
            (keys::EXPERIENCE, experience.as_str()),
            (keys::CURRENCY, currency.as_str()),
            (keys::UNLOCKED_THEMES, themes.as_str()),
            (keys::EQUIPPED_THEME, state.equipped_theme.as_str()),
        ];
        if let Some(history) = history.as_deref() {
            entries.push((keys::SESSION_HISTORY, history));
        }
        self.store.set_many(&entries)
    }
}

fn load_state<S: KeyValueStore + ?Sized>(
    store: &S,
    options: LedgerOptions,
) -> Result<ProgressionState> {
    let mut state = ProgressionState {
        experience: load_counter(store, keys::EXPERIENCE)?,
        currency: load_counter(store, keys::CURRENCY)?,
        unlocked_themes: load_themes(store)?,
        ..ProgressionState::default()
    };

    if let Some(equipped) = store.get(keys::EQUIPPED_THEME)? {
        if state.is_unlocked(&equipped) {
            state.equipped_theme = equipped;
        } else {
            tracing::warn!(theme = %equipped, "equipped theme is not unlocked, using default");
        }
    }

    if options.keep_history {
        state.session_history = load_history(store)?;
    }
    state.recompute_level();
    Ok(state)
}

fn load_counter<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<u64> {
    let Some(raw) = store.get(key)? else {
        return Ok(0);
    };
    match raw.trim().parse::<u64>() {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "corrupt counter, resetting to 0");
            Ok(0)
        }
    }
}

fn load_themes<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<String>> {
    let mut themes = match store.get(keys::UNLOCKED_THEMES)? {
        None => Vec::new(),
        Some(raw) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|e| {
            tracing::warn!(value = %raw, error = %e, "corrupt theme list, resetting");
            Vec::new()
        }),
    };
    dedupe_themes(&mut themes);
    Ok(themes)
}

/// Drop duplicate ids (first wins) and make sure the default theme is owned.
pub(crate) fn dedupe_themes(themes: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    themes.retain(|t| seen.insert(t.clone()));
    if !themes.iter().any(|t| t == DEFAULT_THEME_ID) {
        themes.insert(0, DEFAULT_THEME_ID.to_string());
    }
}

fn load_history<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<SessionRecord>> {
    let Some(raw) = store.get(keys::SESSION_HISTORY)? else {
        return Ok(Vec::new());
    };
    let entries = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "corrupt session history, starting empty");
            return Ok(Vec::new());
        }
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<SessionRecord>(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable session record");
                None
            }
        })
        .collect())
}
