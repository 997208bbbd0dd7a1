use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progression::SessionRecord;
use crate::timer::TimerMode;

/// Every state change in the system produces an Event.
/// The CLI prints them; a GUI layer would render from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ModeChanged {
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// The whole-second remaining value changed.
    TimerTicked {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    ExperienceAwarded {
        amount: u64,
        currency_earned: u64,
        experience: u64,
        level: u32,
        at: DateTime<Utc>,
    },
    LevelUp {
        from_level: u32,
        to_level: u32,
        at: DateTime<Utc>,
    },
    ThemePurchased {
        theme_id: String,
        cost: u64,
        currency_left: u64,
        at: DateTime<Utc>,
    },
    ThemeEquipped {
        theme_id: String,
        at: DateTime<Utc>,
    },
    SessionRecorded {
        record: SessionRecord,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Completion events carry the mode that just finished.
    pub fn completed_mode(&self) -> Option<TimerMode> {
        match self {
            Event::TimerCompleted { mode, .. } => Some(*mode),
            _ => None,
        }
    }
}
