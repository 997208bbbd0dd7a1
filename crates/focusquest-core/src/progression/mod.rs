mod history;
mod ledger;
pub mod levels;

pub(crate) use ledger::dedupe_themes;

pub use history::{SessionRecord, DEFAULT_SESSION_LABEL};
pub use ledger::{AwardOutcome, LedgerOptions, ProgressionLedger, ProgressionState, XP_PER_COIN};
pub use levels::{level_for, progress_percent, LEVEL_THRESHOLDS};
