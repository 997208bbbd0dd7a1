mod clock;
mod driver;
mod engine;
mod mode;

pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::{drive, DEFAULT_TICK_PERIOD};
pub use engine::{format_clock, CompletionSink, CountdownTimer, TimerSnapshot, TimerState};
pub use mode::TimerMode;
