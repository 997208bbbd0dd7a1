//! Periodic tick scheduling for a running countdown.

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use super::clock::Clock;
use super::engine::CountdownTimer;
use crate::events::Event;

/// Default tick period. Faster than once a second so the display never
/// visibly skips a second.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(100);

/// Tick `timer` every `period` until it leaves the running state.
///
/// Every event produced by a tick is handed to `observer`. Returns the
/// completion event if the run reached zero, `None` if the timer was not
/// running to begin with. Dropping the future stops further ticks.
pub async fn drive<C, F>(
    timer: &mut CountdownTimer<C>,
    period: Duration,
    mut observer: F,
) -> Option<Event>
where
    C: Clock,
    F: FnMut(&Event),
{
    let mut ticker = interval(period.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while timer.is_running() {
        ticker.tick().await;
        if let Some(event) = timer.tick() {
            observer(&event);
            if matches!(event, Event::TimerCompleted { .. }) {
                return Some(event);
            }
        }
    }
    None
}
