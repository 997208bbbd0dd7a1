//! Countdown timer implementation.
//!
//! The countdown is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()`
//! periodically (see [`drive`](super::drive)).
//!
//! Remaining time is always derived from a fixed target instant rather than
//! decremented per tick, so slow or missed ticks never accumulate drift.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (pause | reach zero) -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = CountdownTimer::new().on_complete(|mode: TimerMode| println!("{mode} done"));
//! timer.toggle();
//! // In a loop:
//! timer.tick(); // Returns Some(Event::TimerCompleted) exactly once per run
//! ```

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use super::mode::TimerMode;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
}

/// Receives the mode of every countdown that runs to zero.
pub trait CompletionSink {
    fn complete(&mut self, mode: TimerMode);
}

impl<F: FnMut(TimerMode)> CompletionSink for F {
    fn complete(&mut self, mode: TimerMode) {
        self(mode)
    }
}

/// Serializable view of the timer for status output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub state: TimerState,
    pub remaining_secs: u64,
    pub duration_secs: u64,
    pub display: String,
}

/// Drift-correcting countdown for one of the three [`TimerMode`]s.
pub struct CountdownTimer<C: Clock = SystemClock> {
    clock: C,
    mode: TimerMode,
    /// Duration the countdown was last reset to.
    duration_secs: u64,
    /// Remaining time at the last evaluation, millisecond precision so
    /// pause/resume cycles lose nothing to rounding.
    remaining_ms: u64,
    /// Wall-clock instant (ms since epoch) the run ends. Present only while running.
    target_end_ms: Option<u64>,
    on_complete: Option<Box<dyn CompletionSink>>,
}

impl CountdownTimer<SystemClock> {
    /// Create an idle Focus countdown on the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for CountdownTimer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> CountdownTimer<C> {
    pub fn with_clock(clock: C) -> Self {
        let mode = TimerMode::Focus;
        Self {
            clock,
            mode,
            duration_secs: mode.duration_secs(),
            remaining_ms: mode.duration_secs().saturating_mul(1000),
            target_end_ms: None,
            on_complete: None,
        }
    }

    /// Register the sink invoked once per run that reaches zero.
    pub fn on_complete(mut self, sink: impl CompletionSink + 'static) -> Self {
        self.on_complete = Some(Box::new(sink));
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn state(&self) -> TimerState {
        if self.target_end_ms.is_some() {
            TimerState::Running
        } else {
            TimerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.target_end_ms.is_some()
    }

    /// Whole seconds left, rounded up.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms.div_ceil(1000)
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn target_end_ms(&self) -> Option<u64> {
        self.target_end_ms
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            state: self.state(),
            remaining_secs: self.remaining_secs(),
            duration_secs: self.duration_secs,
            display: format_clock(self.remaining_secs()),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Flip between running and paused.
    ///
    /// Returns `None` when there is nothing to start (zero remaining).
    /// Pausing re-evaluates the clock first, so a pause that lands on the
    /// end of the run reports the completion instead.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_running() {
            if let Some(event @ Event::TimerCompleted { .. }) = self.tick() {
                return Some(event);
            }
            self.target_end_ms = None;
            return Some(Event::TimerPaused {
                mode: self.mode,
                remaining_secs: self.remaining_secs(),
                at: Utc::now(),
            });
        }

        if self.remaining_ms == 0 {
            return None;
        }
        if self.target_end_ms.is_none() {
            self.target_end_ms = Some(self.clock.now_ms().saturating_add(self.remaining_ms));
        }
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Stop and set the countdown to `duration_secs`.
    pub fn reset(&mut self, duration_secs: u64) -> Event {
        self.target_end_ms = None;
        self.duration_secs = duration_secs;
        self.remaining_ms = duration_secs.saturating_mul(1000);
        Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        }
    }

    /// Switch mode, discarding any in-progress countdown.
    pub fn set_mode(&mut self, mode: TimerMode) -> Event {
        self.mode = mode;
        self.reset(mode.duration_secs());
        Event::ModeChanged {
            mode,
            duration_secs: mode.duration_secs(),
            at: Utc::now(),
        }
    }

    /// Call periodically while running.
    ///
    /// Returns `Some(Event::TimerTicked)` when the whole-second value changes
    /// and `Some(Event::TimerCompleted)` once when the run reaches zero.
    /// A no-op when idle, so a stale tick after completion does nothing.
    pub fn tick(&mut self) -> Option<Event> {
        let target = self.target_end_ms?;
        let before = self.remaining_secs();

        // A clock stepping backwards must not hand time back.
        let left = target.saturating_sub(self.clock.now_ms());
        self.remaining_ms = left.min(self.remaining_ms);

        if self.remaining_ms == 0 {
            self.target_end_ms = None;
            if let Some(sink) = self.on_complete.as_mut() {
                sink.complete(self.mode);
            }
            return Some(Event::TimerCompleted {
                mode: self.mode,
                at: Utc::now(),
            });
        }

        let after = self.remaining_secs();
        (after != before).then(|| Event::TimerTicked {
            remaining_secs: after,
            at: Utc::now(),
        })
    }
}

impl<C: Clock> fmt::Debug for CountdownTimer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownTimer")
            .field("mode", &self.mode)
            .field("duration_secs", &self.duration_secs)
            .field("remaining_ms", &self.remaining_ms)
            .field("target_end_ms", &self.target_end_ms)
            .field("has_completion_sink", &self.on_complete.is_some())
            .finish()
    }
}

/// `MM:SS` rendering of a second count.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
