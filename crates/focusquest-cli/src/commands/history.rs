use focusquest_core::Config;

use super::{open_ledger, CliResult};

pub fn run(limit: Option<usize>) -> CliResult {
    let config = Config::load_or_default();
    if !config.progression.keep_history {
        eprintln!("session history is disabled (progression.keep_history = false)");
    }
    let ledger = open_ledger(&config)?;

    let history = ledger.session_history();
    let shown = &history[..limit.unwrap_or(history.len()).min(history.len())];
    println!("{}", serde_json::to_string_pretty(shown)?);
    Ok(())
}
