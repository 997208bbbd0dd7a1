//! Foreground countdown.
//!
//! This is where the timer and the ledger meet: a finished run is priced by
//! the reward policy and only then handed to the ledger.

use clap::Args;
use focusquest_core::{
    drive, format_clock, play_cue, Config, CountdownTimer, Cue, Database, Event,
    ProgressionLedger, TimerMode, ToneSynthesizer,
};

use super::{emit, open_ledger, report_award, synthesizer, CliResult};

#[derive(Args)]
pub struct RunArgs {
    /// focus, short-break or long-break
    #[arg(long, short, default_value = "focus")]
    mode: TimerMode,
    /// Name the session (focus runs earn a bonus)
    #[arg(long, short)]
    label: Option<String>,
    /// Override the countdown length in seconds
    #[arg(long)]
    seconds: Option<u64>,
    /// Do not draw the live countdown on stderr
    #[arg(long, short)]
    quiet: bool,
}

pub fn run(args: RunArgs) -> CliResult {
    let config = Config::load_or_default();
    let mut ledger = open_ledger(&config)?;
    let mut synth = synthesizer(&config);

    let mut timer = CountdownTimer::new();
    timer.set_mode(args.mode);
    if let Some(secs) = args.seconds {
        timer.reset(secs);
    }

    let Some(started) = timer.toggle() else {
        return Err("nothing to run: countdown length is zero".into());
    };
    emit(&started)?;
    play_cue(synth.as_mut(), Cue::Start);

    let quiet = args.quiet;
    let draw = |event: &Event| {
        if let Event::TimerTicked { remaining_secs, .. } = event {
            if !quiet {
                eprint!("\r{}", format_clock(*remaining_secs));
            }
        }
    };
    if !quiet {
        eprint!("{}", format_clock(timer.remaining_secs()));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let period = config.tick_period();
    let completed = runtime.block_on(async {
        tokio::select! {
            done = drive(&mut timer, period, draw) => done,
            _ = tokio::signal::ctrl_c() => None,
        }
    });
    if !quiet {
        eprintln!();
    }

    let completed = match completed {
        Some(event) => event,
        // Interrupted: freeze the countdown where it is.
        None => match timer.toggle() {
            Some(event @ Event::TimerCompleted { .. }) => event,
            Some(paused) => {
                emit(&paused)?;
                play_cue(synth.as_mut(), Cue::Pause);
                return Ok(());
            }
            None => return Ok(()),
        },
    };

    emit(&completed)?;
    settle(&mut ledger, &config, &completed, args.label.as_deref(), synth.as_mut())
}

/// Apply the reward for a completed run.
fn settle(
    ledger: &mut ProgressionLedger<Database>,
    config: &Config,
    completed: &Event,
    label: Option<&str>,
    synth: &mut dyn ToneSynthesizer,
) -> CliResult {
    play_cue(synth, Cue::Complete);
    let Some(mode) = completed.completed_mode() else {
        return Ok(());
    };
    let Some(amount) = config.reward_policy().reward_for(mode, label) else {
        tracing::debug!(%mode, "break finished, no reward");
        return Ok(());
    };

    let outcome = ledger.award_experience(amount)?;
    report_award(ledger, amount, &outcome, synth)?;
    let record = ledger.record_session(label.unwrap_or_default(), amount)?;
    emit(&Event::SessionRecorded {
        record,
        at: chrono::Utc::now(),
    })
}
