//! Sound cues
//!
//! The engine only names cues; playback belongs to an [`AudioSink`]. Muting is
//! checked before a cue is emitted and never affects game logic.

use serde::{Deserialize, Serialize};

/// Named sound triggers emitted by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Food eaten
    Eat,
    /// Head hit a wall or the body
    Collision,
    /// Run ended
    GameOver,
}

impl SoundCue {
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::Eat => "eat",
            SoundCue::Collision => "collision",
            SoundCue::GameOver => "game_over",
        }
    }
}

/// Something that can play a named cue, optionally pitch-shifted
///
/// `pitch` is a playback-rate multiplier; 1.0 plays the cue unmodified.
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue, pitch: f32);
}

/// Discards every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue, _pitch: f32) {}
}

/// Decides whether cues are emitted at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioPolicy {
    /// Player-facing sound toggle
    pub sound_on: bool,
    /// Suppress effects on mobile devices
    pub mute_effects_on_mobile: bool,
    /// Host detected a mobile device
    pub is_mobile: bool,
}

impl Default for AudioPolicy {
    fn default() -> Self {
        Self {
            sound_on: true,
            mute_effects_on_mobile: true,
            is_mobile: false,
        }
    }
}

impl AudioPolicy {
    pub fn allows(&self, _cue: SoundCue) -> bool {
        self.sound_on && !(self.mute_effects_on_mobile && self.is_mobile)
    }
}

/// Cues waiting for their play time
#[derive(Debug, Clone, Default)]
pub struct CueQueue {
    pending: Vec<ScheduledCue>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScheduledCue {
    due_ms: f64,
    cue: SoundCue,
    pitch: f32,
}

impl CueQueue {
    pub fn schedule(&mut self, cue: SoundCue, pitch: f32, due_ms: f64) {
        self.pending.push(ScheduledCue { due_ms, cue, pitch });
    }

    /// Play every cue due at `now_ms`, in scheduling order
    pub fn flush(&mut self, now_ms: f64, sink: &mut dyn AudioSink) -> usize {
        let mut played = 0;
        self.pending.retain(|scheduled| {
            if scheduled.due_ms <= now_ms {
                sink.play(scheduled.cue, scheduled.pitch);
                played += 1;
                false
            } else {
                true
            }
        });
        played
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

/// Procedurally generated cues on the Web Audio API - no sound files needed
#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundCue};

    #[derive(Clone)]
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 0.8 }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        fn create_osc(
            &self,
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

        /// Eat - quick rising blip
        fn play_eat(&self, ctx: &AudioContext, vol: f32, pitch: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 440.0 * pitch, OscillatorType::Square)
            else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency().set_value_at_time(440.0 * pitch, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(880.0 * pitch, t + 0.06)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Collision - dull thump
        fn play_collision(&self, ctx: &AudioContext, vol: f32, pitch: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0 * pitch, OscillatorType::Sine)
            else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.6, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.frequency().set_value_at_time(150.0 * pitch, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0 * pitch, t + 0.15)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        /// Game over - sad descending
        fn play_game_over(&self, ctx: &AudioContext, vol: f32, pitch: f32) {
            for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                let delay = i as f64 * 0.2;
                if let Some((osc, gain)) =
                    self.create_osc(ctx, freq * pitch, OscillatorType::Sine)
                {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.4).ok();
                }
            }
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: SoundCue, pitch: f32) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                SoundCue::Eat => self.play_eat(ctx, self.volume, pitch),
                SoundCue::Collision => self.play_collision(ctx, self.volume, pitch),
                SoundCue::GameOver => self.play_game_over(ctx, self.volume, pitch),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(SoundCue, f32)>);

    impl AudioSink for Recorder {
        fn play(&mut self, cue: SoundCue, pitch: f32) {
            self.0.push((cue, pitch));
        }
    }

    #[test]
    fn test_cue_names() {
        assert_eq!(SoundCue::Eat.name(), "eat");
        assert_eq!(SoundCue::Collision.name(), "collision");
        assert_eq!(SoundCue::GameOver.name(), "game_over");
    }

    #[test]
    fn test_policy() {
        let mut policy = AudioPolicy::default();
        assert!(policy.allows(SoundCue::Eat));

        policy.is_mobile = true;
        assert!(!policy.allows(SoundCue::Eat));

        policy.mute_effects_on_mobile = false;
        assert!(policy.allows(SoundCue::Collision));

        policy.sound_on = false;
        assert!(!policy.allows(SoundCue::GameOver));
    }

    #[test]
    fn test_queue_flushes_due_cues_in_order() {
        let mut queue = CueQueue::default();
        let mut sink = Recorder::default();
        queue.schedule(SoundCue::Collision, 1.0, 100.0);
        queue.schedule(SoundCue::GameOver, 1.0, 300.0);

        assert_eq!(queue.flush(50.0, &mut sink), 0);
        assert_eq!(queue.flush(100.0, &mut sink), 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.flush(300.0, &mut sink), 1);
        assert!(queue.is_empty());
        assert_eq!(
            sink.0,
            vec![(SoundCue::Collision, 1.0), (SoundCue::GameOver, 1.0)]
        );
    }

    #[test]
    fn test_queue_clear() {
        let mut queue = CueQueue::default();
        queue.schedule(SoundCue::GameOver, 1.0, 100.0);
        queue.clear();
        let mut sink = Recorder::default();
        assert_eq!(queue.flush(1_000.0, &mut sink), 0);
        assert!(sink.0.is_empty());
    }
}
