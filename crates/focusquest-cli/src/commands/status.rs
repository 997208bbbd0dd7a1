use focusquest_core::Config;
use serde::Serialize;

use super::{open_ledger, CliResult};

#[derive(Serialize)]
struct Profile<'a> {
    experience: u64,
    level: u32,
    currency: u64,
    level_progress_pct: f64,
    next_level_at: u64,
    unlocked_themes: &'a [String],
    equipped_theme: &'a str,
    sessions: usize,
}

pub fn run() -> CliResult {
    let config = Config::load_or_default();
    let ledger = open_ledger(&config)?;

    let profile = Profile {
        experience: ledger.experience(),
        level: ledger.level(),
        currency: ledger.currency(),
        level_progress_pct: (ledger.level_progress() * 10.0).round() / 10.0,
        next_level_at: ledger.next_level_threshold(),
        unlocked_themes: ledger.unlocked_themes(),
        equipped_theme: ledger.equipped_theme(),
        sessions: ledger.session_history().len(),
    };
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}
