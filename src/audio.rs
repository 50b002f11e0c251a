//! Sound feedback
//!
//! The game only ever fires named cues and never waits on them. On the web
//! the cues and the background loop are generated procedurally with the Web
//! Audio API.

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// UI button press
    Click,
    /// Gate matched, coins awarded, skin purchased
    Match,
    /// Gate missed, purchase refused
    Miss,
    /// Previous best distance beaten
    Record,
    /// Run ended
    GameOver,
}

/// Fire-and-forget sound output
pub trait SoundSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every cue (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SoundSink for Silent {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Background loop melody (Hz), one note per step
pub const MUSIC_PATTERN: [f32; 8] = [262.0, 330.0, 392.0, 330.0, 294.0, 349.0, 440.0, 349.0];
/// Seconds between loop notes
pub const MUSIC_STEP: f64 = 0.25;
/// How far ahead of the audio clock notes are scheduled
const MUSIC_LOOKAHEAD: f64 = 0.2;

/// A loop note to schedule at audio-clock time `at`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledNote {
    pub freq: f32,
    pub at: f64,
}

/// Lookahead scheduler for the background loop.
///
/// Driven once per frame with the audio clock. Each call hands out the notes
/// that start before `now + MUSIC_LOOKAHEAD`, so playback stays gapless while
/// frames jitter.
#[derive(Debug, Clone, Default)]
pub struct MusicLoop {
    playing: bool,
    next_at: f64,
    step: usize,
}

impl MusicLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin at `now` from the top of the pattern. No-op if already playing.
    pub fn start(&mut self, now: f64) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.next_at = now;
        self.step = 0;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Notes due within the lookahead window
    pub fn due(&mut self, now: f64) -> Vec<ScheduledNote> {
        let mut notes = Vec::new();
        if !self.playing || !now.is_finite() {
            return notes;
        }
        // After a stall (suspended context, hidden tab) resume from now
        // instead of bursting every missed note at once
        if self.next_at < now {
            self.next_at = now;
        }
        while self.next_at < now + MUSIC_LOOKAHEAD {
            notes.push(ScheduledNote {
                freq: MUSIC_PATTERN[self.step],
                at: self.next_at,
            });
            self.step = (self.step + 1) % MUSIC_PATTERN.len();
            self.next_at += MUSIC_STEP;
        }
        notes
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    use super::{MUSIC_STEP, MusicLoop, SoundEffect, SoundSink};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
        music_enabled: bool,
        music: MusicLoop,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_sfx_volume(),
                muted: false,
                music_enabled: settings.music_audible(),
                music: MusicLoop::new(),
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_sfx_volume();
            self.music_enabled = settings.music_audible();
            if !self.music_enabled {
                self.music.stop();
            }
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.volume }
        }

        /// Keep the background loop fed; call once per frame
        pub fn update_music(&mut self) {
            let vol = self.effective_volume();
            let Some(ctx) = &self.ctx else { return };
            // The context only runs after a user gesture resumed it
            if !self.music_enabled || vol <= 0.0 || ctx.state() != AudioContextState::Running {
                self.music.stop();
                return;
            }
            let now = ctx.current_time();
            self.music.start(now);
            for note in self.music.due(now) {
                Self::play_note_at(
                    ctx,
                    note.freq,
                    note.at,
                    MUSIC_STEP * 0.9,
                    OscillatorType::Triangle,
                    vol * 0.06,
                );
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_note_at(
            ctx: &AudioContext,
            freq: f32,
            t: f64,
            length: f64,
            osc_type: OscillatorType,
            vol: f32,
        ) {
            let Some((osc, gain)) = Self::create_osc(ctx, freq, osc_type) else {
                return;
            };
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }

        /// Play a short sequence of notes, `step` seconds apart
        fn play_notes(
            ctx: &AudioContext,
            notes: &[f32],
            step: f64,
            length: f64,
            osc_type: OscillatorType,
            vol: f32,
        ) {
            let start = ctx.current_time();
            for (i, freq) in notes.iter().enumerate() {
                let t = start + i as f64 * step;
                Self::play_note_at(ctx, *freq, t, length, osc_type, vol);
            }
        }
    }

    impl SoundSink for AudioManager {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Click => {
                    Self::play_notes(ctx, &[660.0], 0.0, 0.05, OscillatorType::Square, vol * 0.15)
                }
                SoundEffect::Match => Self::play_notes(
                    ctx,
                    &[523.0, 784.0],
                    0.06,
                    0.12,
                    OscillatorType::Triangle,
                    vol * 0.3,
                ),
                SoundEffect::Miss => Self::play_notes(
                    ctx,
                    &[180.0, 120.0],
                    0.08,
                    0.15,
                    OscillatorType::Sawtooth,
                    vol * 0.25,
                ),
                SoundEffect::Record => Self::play_notes(
                    ctx,
                    &[500.0, 600.0, 700.0, 800.0, 1000.0],
                    0.08,
                    0.25,
                    OscillatorType::Triangle,
                    vol * 0.25,
                ),
                SoundEffect::GameOver => Self::play_notes(
                    ctx,
                    &[400.0, 350.0, 300.0, 200.0],
                    0.2,
                    0.3,
                    OscillatorType::Sine,
                    vol * 0.3,
                ),
            }
        }
    }
}
