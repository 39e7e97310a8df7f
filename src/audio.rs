use std::io::{self, Write};

use crate::config::PreferenceStore;
use crate::session::SessionEvent;

pub const MUTED_KEY: &str = "audioMuted";
pub const DEFAULT_VOLUME: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Cue {
    Click,
    Spawn,
    Warning,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
}

/// A synthesized tone: a frequency sweep under a decaying gain envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f64,
    pub end_hz: f64,
    pub duration_ms: u64,
    /// Peak gain as a fraction of the master volume.
    pub gain: f64,
}

impl Cue {
    pub fn tone(&self) -> Tone {
        match self {
            Cue::Click => Tone {
                waveform: Waveform::Sine,
                start_hz: 1000.0,
                end_hz: 1000.0,
                duration_ms: 150,
                gain: 1.0,
            },
            Cue::Spawn => Tone {
                waveform: Waveform::Sine,
                start_hz: 400.0,
                end_hz: 600.0,
                duration_ms: 150,
                gain: 0.3,
            },
            Cue::Warning => Tone {
                waveform: Waveform::Square,
                start_hz: 880.0,
                end_hz: 880.0,
                duration_ms: 100,
                gain: 0.5,
            },
            Cue::GameOver => Tone {
                waveform: Waveform::Sine,
                start_hz: 1200.0,
                end_hz: 1200.0,
                duration_ms: 400,
                gain: 1.0,
            },
        }
    }

    /// Cue that accompanies a session event, if any.
    pub fn for_event(event: &SessionEvent) -> Option<Cue> {
        match event {
            SessionEvent::Started { .. } => Some(Cue::Spawn),
            SessionEvent::Hit(_) => Some(Cue::Click),
            SessionEvent::Warning { .. } => Some(Cue::Warning),
            SessionEvent::GameOver { .. } => Some(Cue::GameOver),
            SessionEvent::TargetSpawned(_) | SessionEvent::TargetExpired(_) => None,
        }
    }
}

/// Mute state and master volume, passed explicitly to whoever plays sounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioSettings {
    muted: bool,
    volume: f64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            muted: false,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl AudioSettings {
    pub fn load(store: &dyn PreferenceStore) -> Self {
        Self {
            muted: store.get_bool(MUTED_KEY).unwrap_or(false),
            ..Self::default()
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Flip mute and persist it. The new state applies even if saving fails.
    pub fn toggle_mute(&mut self, store: &mut dyn PreferenceStore) -> io::Result<bool> {
        self.set_muted(!self.muted, store)
    }

    pub fn set_muted(&mut self, muted: bool, store: &mut dyn PreferenceStore) -> io::Result<bool> {
        self.muted = muted;
        store.set(MUTED_KEY, &self.muted.to_string())?;
        Ok(self.muted)
    }
}

pub trait AudioSink {
    /// Play `tone` at absolute peak gain `gain`.
    fn play(&mut self, cue: Cue, tone: Tone, gain: f64);
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn play(&mut self, cue: Cue, tone: Tone, gain: f64) {
        (**self).play(cue, tone, gain)
    }
}

/// Rings the terminal bell for the cues that matter most mid-session.
pub struct BellSink<W: Write> {
    out: W,
}

impl<W: Write> BellSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> AudioSink for BellSink<W> {
    fn play(&mut self, cue: Cue, _tone: Tone, gain: f64) {
        if gain <= 0.0 || matches!(cue, Cue::Spawn) {
            return;
        }
        if let Err(e) = self.out.write_all(b"\x07").and_then(|_| self.out.flush()) {
            log::debug!("bell for {cue} failed: {e}");
        }
    }
}

#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _cue: Cue, _tone: Tone, _gain: f64) {}
}

/// Keeps every cue it is asked to play; useful for checking what a session sounded like.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub played: Vec<(Cue, f64)>,
}

impl AudioSink for RecordingSink {
    fn play(&mut self, cue: Cue, _tone: Tone, gain: f64) {
        self.played.push((cue, gain));
    }
}

pub struct CuePlayer<S: AudioSink> {
    pub settings: AudioSettings,
    sink: S,
}

impl<S: AudioSink> CuePlayer<S> {
    pub fn new(settings: AudioSettings, sink: S) -> Self {
        Self { settings, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn play(&mut self, cue: Cue) {
        if self.settings.is_muted() {
            return;
        }
        let tone = cue.tone();
        let gain = tone.gain * self.settings.volume();
        self.sink.play(cue, tone, gain);
    }

    pub fn handle(&mut self, events: &[SessionEvent]) {
        for cue in events.iter().filter_map(Cue::for_event) {
            self.play(cue);
        }
    }
}
