//! # FocusQuest Core Library
//!
//! This library provides the core logic for FocusQuest, a focus timer that
//! turns finished sessions into experience, levels and coins to spend on
//! cosmetic themes.
//!
//! ## Architecture
//!
//! - **Countdown Timer**: A wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()`; remaining time is derived from a
//!   fixed end instant so it never drifts
//! - **Progression Ledger**: Experience, currency, levels, theme unlocks and
//!   the session log, written through to a key-value store on every change
//! - **Storage**: SQLite-backed key-value store, versioned migrations and
//!   TOML-based configuration
//!
//! The timer and the ledger never call each other. The caller wires a
//! completed countdown to an award using [`RewardPolicy`].
//!
//! ## Key Components
//!
//! - [`CountdownTimer`]: Core timer state machine
//! - [`ProgressionLedger`]: Progression bookkeeping
//! - [`KeyValueStore`]: Storage seam; [`Database`] and [`MemoryStore`] implement it
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod progression;
pub mod rewards;
pub mod sound;
pub mod storage;
pub mod themes;
pub mod timer;

pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use progression::{
    AwardOutcome, LedgerOptions, ProgressionLedger, ProgressionState, SessionRecord,
};
pub use rewards::RewardPolicy;
pub use sound::{play_cue, Cue, SilentSynthesizer, TerminalBell, Tone, ToneSynthesizer, Waveform};
pub use storage::{data_dir, Config, Database, KeyValueStore, MemoryStore};
pub use themes::{Theme, CATALOG, DEFAULT_THEME_ID};
pub use timer::{
    drive, format_clock, Clock, CompletionSink, CountdownTimer, ManualClock, SystemClock,
    TimerMode, TimerSnapshot, TimerState,
};
