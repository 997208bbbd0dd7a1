pub mod award;
pub mod config;
pub mod history;
pub mod run;
pub mod shop;
pub mod status;

use focusquest_core::{
    play_cue, Config, Cue, Database, Event, ProgressionLedger, SilentSynthesizer, TerminalBell,
    ToneSynthesizer,
};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the profile stored in the data directory.
pub fn open_ledger(config: &Config) -> Result<ProgressionLedger<Database>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(ProgressionLedger::open(db, config.ledger_options())?)
}

pub fn synthesizer(config: &Config) -> Box<dyn ToneSynthesizer> {
    if config.sound.enabled {
        Box::new(TerminalBell::stderr())
    } else {
        Box::new(SilentSynthesizer)
    }
}

/// Print one event as a JSON line on stdout.
pub fn emit(event: &Event) -> CliResult {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

/// Emit the events for an award and play the level-up cue when one happened.
pub fn report_award(
    ledger: &ProgressionLedger<Database>,
    amount: u64,
    outcome: &focusquest_core::AwardOutcome,
    synth: &mut dyn ToneSynthesizer,
) -> CliResult {
    let at = chrono::Utc::now();
    emit(&Event::ExperienceAwarded {
        amount,
        currency_earned: outcome.currency_earned,
        experience: ledger.experience(),
        level: outcome.new_level,
        at,
    })?;
    if outcome.leveled_up {
        emit(&Event::LevelUp {
            from_level: outcome.previous_level,
            to_level: outcome.new_level,
            at,
        })?;
        play_cue(synth, Cue::LevelUp);
    }
    Ok(())
}
