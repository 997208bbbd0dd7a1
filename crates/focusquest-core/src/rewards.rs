//! What a finished countdown is worth.
//!
//! This is caller policy. The ledger accepts any award; deciding that only
//! focus runs pay, and that naming a session pays extra, happens here.

use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPolicy {
    pub focus_xp: u64,
    pub named_session_bonus: u64,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            focus_xp: 250,
            named_session_bonus: 50,
        }
    }
}

impl RewardPolicy {
    /// Experience for completing a run in `mode`. Breaks earn nothing.
    pub fn reward_for(&self, mode: TimerMode, label: Option<&str>) -> Option<u64> {
        if mode.is_break() {
            return None;
        }
        let named = label.is_some_and(|l| !l.trim().is_empty());
        let bonus = if named { self.named_session_bonus } else { 0 };
        Some(self.focus_xp.saturating_add(bonus))
    }
}
