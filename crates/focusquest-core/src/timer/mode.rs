use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three fixed countdown modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerMode {
    #[default]
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    /// Canonical duration of the mode in seconds.
    pub fn duration_secs(self) -> u64 {
        match self {
            TimerMode::Focus => 25 * 60,
            TimerMode::ShortBreak => 5 * 60,
            TimerMode::LongBreak => 15 * 60,
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, TimerMode::Focus)
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimerMode {
    type Err = String;

    /// Accepts `focus`, `short-break`, `long_break`, `SHORT_BREAK` and similar spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "focus" => Ok(TimerMode::Focus),
            "short_break" | "short" => Ok(TimerMode::ShortBreak),
            "long_break" | "long" => Ok(TimerMode::LongBreak),
            _ => Err(format!("unknown timer mode: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_durations() {
        assert_eq!(TimerMode::Focus.duration_secs(), 1500);
        assert_eq!(TimerMode::ShortBreak.duration_secs(), 300);
        assert_eq!(TimerMode::LongBreak.duration_secs(), 900);
    }

    #[test]
    fn default_mode_is_focus() {
        assert_eq!(TimerMode::default(), TimerMode::Focus);
        assert!(!TimerMode::default().is_break());
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("focus".parse::<TimerMode>().unwrap(), TimerMode::Focus);
        assert_eq!("short-break".parse::<TimerMode>().unwrap(), TimerMode::ShortBreak);
        assert_eq!("LONG_BREAK".parse::<TimerMode>().unwrap(), TimerMode::LongBreak);
        assert!("nap".parse::<TimerMode>().is_err());
    }

    #[test]
    fn serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&TimerMode::ShortBreak).unwrap();
        assert_eq!(json, "\"SHORT_BREAK\"");
    }
}
