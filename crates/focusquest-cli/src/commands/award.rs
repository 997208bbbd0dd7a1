use focusquest_core::Config;

use super::{open_ledger, report_award, synthesizer, CliResult};

pub fn run(amount: u64) -> CliResult {
    let config = Config::load_or_default();
    let mut ledger = open_ledger(&config)?;
    let mut synth = synthesizer(&config);

    let outcome = ledger.award_experience(amount)?;
    report_award(&ledger, amount, &outcome, synth.as_mut())
}
