//! Audio output
//!
//! The session talks to an injected [`AudioSink`]; the sim never plays sound
//! itself. On the web, [`WebAudio`] synthesizes every effect procedurally with
//! Web Audio oscillators, so no sound files are needed.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Lasso thrown, player starts eating
    Eat,
    /// Player step
    Footstep,
    /// Food dropped into the basket
    Delivered,
    /// Start screen loop
    MenuMusic,
}

/// Sound output capability handed to the session
pub trait AudioSink {
    /// Play an effect once
    fn play_once(&mut self, effect: SoundEffect);

    /// Start an effect looping until [`AudioSink::stop`]
    fn play_loop(&mut self, effect: SoundEffect);

    /// Stop a looping effect. Stopping something that is not playing is a no-op.
    fn stop(&mut self, effect: SoundEffect);
}

/// Sink that only traces what would have played (headless runs and tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_once(&mut self, effect: SoundEffect) {
        log::trace!("sfx {:?}", effect);
    }

    fn play_loop(&mut self, effect: SoundEffect) {
        log::trace!("loop {:?}", effect);
    }

    fn stop(&mut self, effect: SoundEffect) {
        log::trace!("stop {:?}", effect);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};
    use crate::settings::Settings;

    /// Web Audio backend
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        sfx_volume: f32,
        music_volume: f32,
        music_muted: bool,
        /// Voices of the running menu loop
        music: Vec<(OscillatorNode, GainNode)>,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let mut audio = Self {
                ctx,
                sfx_volume: 0.0,
                music_volume: 0.0,
                music_muted: false,
                music: Vec::new(),
            };
            audio.apply_settings(settings);
            audio
        }

        /// Pick up changed volumes; a running loop follows the new level
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.sfx_volume = settings.effective_sfx_volume();
            self.music_volume = settings.effective_music_volume();
            self.music_muted = settings.music_muted;
            if self.music_muted {
                self.stop_music();
            } else {
                for (_, gain) in &self.music {
                    gain.gain().set_value(self.music_volume * 0.08);
                }
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn live_ctx(&self) -> Option<&AudioContext> {
            let ctx = self.ctx.as_ref()?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some(ctx)
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

        /// Eat - two quick chomps
        fn play_eat(ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            for (offset, freq) in [(0.0, 220.0), (0.12, 180.0)] {
                let Some((osc, gain)) = Self::create_osc(ctx, freq, OscillatorType::Square) else {
                    return;
                };
                let start = t + offset;
                gain.gain().set_value_at_time(0.0001, t).ok();
                gain.gain().set_value_at_time(vol * 0.25, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.08)
                    .ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(freq * 0.5, start + 0.08)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(start + 0.1).ok();
            }
        }

        /// Footstep - short low tap
        fn play_footstep(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 90.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.05)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.06).ok();
        }

        /// Delivered - rising chime
        fn play_delivered(ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            let notes = [523.25, 659.25, 783.99];
            for (i, freq) in notes.iter().enumerate() {
                let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Sine) else {
                    return;
                };
                let start = t + i as f64 * 0.06;
                gain.gain().set_value_at_time(0.0001, t).ok();
                gain.gain().set_value_at_time(vol * 0.3, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.2)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(start + 0.22).ok();
            }
        }

        /// Menu loop - soft sustained chord, runs until stopped
        fn start_music(&mut self) {
            if !self.music.is_empty() || self.music_muted {
                return;
            }
            let vol = self.music_volume * 0.08;
            let Some(ctx) = self.live_ctx() else { return };
            let mut voices = Vec::new();
            for freq in [196.0, 246.94, 293.66] {
                if let Some((osc, gain)) = Self::create_osc(ctx, freq, OscillatorType::Triangle) {
                    gain.gain().set_value(vol);
                    osc.start().ok();
                    voices.push((osc, gain));
                }
            }
            self.music = voices;
        }

        fn stop_music(&mut self) {
            for (osc, gain) in self.music.drain(..) {
                osc.stop().ok();
                gain.disconnect().ok();
            }
        }
    }

    impl AudioSink for WebAudio {
        fn play_once(&mut self, effect: SoundEffect) {
            let vol = self.sfx_volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = self.live_ctx() else { return };

            match effect {
                SoundEffect::Eat => Self::play_eat(ctx, vol),
                SoundEffect::Footstep => Self::play_footstep(ctx, vol),
                SoundEffect::Delivered => Self::play_delivered(ctx, vol),
                SoundEffect::MenuMusic => {}
            }
        }

        fn play_loop(&mut self, effect: SoundEffect) {
            if effect == SoundEffect::MenuMusic {
                self.start_music();
            }
        }

        fn stop(&mut self, effect: SoundEffect) {
            if effect == SoundEffect::MenuMusic {
                self.stop_music();
            }
        }
    }
}
