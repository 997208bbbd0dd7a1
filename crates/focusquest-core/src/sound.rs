//! Sound cues as tone sequences.
//!
//! Rendering a waveform is a platform concern behind [`ToneSynthesizer`];
//! this module only decides which tones make up each cue.

use std::io::Write;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A single scheduled tone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: f32,
    pub waveform: Waveform,
    pub duration_secs: f32,
    /// Delay from the start of the cue.
    pub start_offset_secs: f32,
}

const fn tone(frequency_hz: f32, waveform: Waveform, duration_secs: f32, start_offset_secs: f32) -> Tone {
    Tone {
        frequency_hz,
        waveform,
        duration_secs,
        start_offset_secs,
    }
}

static START: [Tone; 3] = [
    tone(220.0, Waveform::Square, 0.1, 0.0),
    tone(440.0, Waveform::Square, 0.1, 0.1),
    tone(880.0, Waveform::Square, 0.2, 0.2),
];

static PAUSE: [Tone; 2] = [
    tone(880.0, Waveform::Triangle, 0.1, 0.0),
    tone(440.0, Waveform::Triangle, 0.15, 0.1),
];

// C5 C5 C5 E5 C5 E5
static COMPLETE: [Tone; 6] = [
    tone(523.25, Waveform::Square, 0.1, 0.0),
    tone(523.25, Waveform::Square, 0.1, 0.1),
    tone(523.25, Waveform::Square, 0.1, 0.2),
    tone(659.25, Waveform::Square, 0.4, 0.3),
    tone(523.25, Waveform::Square, 0.1, 0.7),
    tone(659.25, Waveform::Square, 0.6, 0.8),
];

static LEVEL_UP: [Tone; 6] = [
    tone(440.0, Waveform::Sine, 0.1, 0.0),
    tone(554.0, Waveform::Sine, 0.1, 0.05),
    tone(659.0, Waveform::Sine, 0.1, 0.1),
    tone(880.0, Waveform::Sine, 0.1, 0.15),
    tone(1108.0, Waveform::Sine, 0.1, 0.2),
    tone(1318.0, Waveform::Sine, 0.1, 0.25),
];

static CLICK: [Tone; 1] = [tone(800.0, Waveform::Square, 0.05, 0.0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Rising power-up when a countdown starts.
    Start,
    /// Falling power-down on pause.
    Pause,
    /// Fanfare when a countdown reaches zero.
    Complete,
    /// Arpeggio on level-up and successful purchases.
    LevelUp,
    Click,
}

impl Cue {
    pub fn tones(self) -> &'static [Tone] {
        match self {
            Cue::Start => &START,
            Cue::Pause => &PAUSE,
            Cue::Complete => &COMPLETE,
            Cue::LevelUp => &LEVEL_UP,
            Cue::Click => &CLICK,
        }
    }

    /// Seconds until the last tone of the cue stops.
    pub fn duration_secs(self) -> f32 {
        self.tones()
            .iter()
            .map(|t| t.start_offset_secs + t.duration_secs)
            .fold(0.0, f32::max)
    }
}

/// Something that can play a tone.
pub trait ToneSynthesizer {
    fn play(&mut self, tone: &Tone);

    /// Called once before the tones of a cue are played.
    fn begin_cue(&mut self, _cue: Cue) {}
}

/// Schedule every tone of `cue` on `synth`.
pub fn play_cue<T: ToneSynthesizer + ?Sized>(synth: &mut T, cue: Cue) {
    synth.begin_cue(cue);
    for tone in cue.tones() {
        synth.play(tone);
    }
}

/// Plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSynthesizer;

impl ToneSynthesizer for SilentSynthesizer {
    fn play(&mut self, _tone: &Tone) {}
}

/// Rings the terminal bell once per cue. Individual tones are not rendered.
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self {
            out: std::io::stderr(),
        }
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ToneSynthesizer for TerminalBell<W> {
    fn play(&mut self, _tone: &Tone) {}

    fn begin_cue(&mut self, cue: Cue) {
        let result = self.out.write_all(b"\x07").and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::debug!(?cue, error = %e, "terminal bell failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        cues: Vec<Cue>,
        tones: Vec<Tone>,
    }

    impl ToneSynthesizer for Recorder {
        fn play(&mut self, tone: &Tone) {
            self.tones.push(*tone);
        }

        fn begin_cue(&mut self, cue: Cue) {
            self.cues.push(cue);
        }
    }

    #[test]
    fn start_cue_rises() {
        let freqs: Vec<f32> = Cue::Start.tones().iter().map(|t| t.frequency_hz).collect();
        assert_eq!(freqs, vec![220.0, 440.0, 880.0]);
        assert!(Cue::Pause.tones()[0].frequency_hz > Cue::Pause.tones()[1].frequency_hz);
    }

    #[test]
    fn play_cue_schedules_every_tone() {
        let mut rec = Recorder::default();
        play_cue(&mut rec, Cue::Complete);
        play_cue(&mut rec, Cue::Click);
        assert_eq!(rec.cues, vec![Cue::Complete, Cue::Click]);
        assert_eq!(rec.tones.len(), 7);
    }

    #[test]
    fn fanfare_lasts_1_4_seconds() {
        assert!((Cue::Complete.duration_secs() - 1.4).abs() < 1e-6);
    }

    #[test]
    fn bell_rings_once_per_cue() {
        let mut bell = TerminalBell::new(Vec::new());
        play_cue(&mut bell, Cue::LevelUp);
        play_cue(&mut bell, Cue::Start);
        assert_eq!(bell.into_inner(), b"\x07\x07".to_vec());
    }
}
