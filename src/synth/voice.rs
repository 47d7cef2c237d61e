use super::oscillator::{Oscillator, Waveshape};
use super::SampleGenerator;
use crate::session::AudioSession;
use crate::util::ratio_from_octaves;
use std::sync::Arc;

#[derive(Clone, Copy, Debug)]
pub struct VoiceOpts {
    /// Carrier frequency in Hz, before frequency modulation.
    pub base_frequency: f64,
    /// Carrier wave form.
    pub base_waveshape: Waveshape,
    /// Frequency modulator rate in Hz. Zero disables FM.
    pub fm_frequency: f64,
    pub fm_waveshape: Waveshape,
    /// Amplitude modulator rate in Hz. Zero disables AM.
    pub am_frequency: f64,
    pub am_waveshape: Waveshape,
    /// Per-voice volume, applied on top of the session's master volume.
    pub volume: f64,
}

impl Default for VoiceOpts {
    fn default() -> Self {
        Self {
            base_frequency: 440.0,
            base_waveshape: Waveshape::Sine,
            fm_frequency: 0.0,
            fm_waveshape: Waveshape::Sine,
            am_frequency: 0.0,
            am_waveshape: Waveshape::Sine,
            volume: 1.0,
        }
    }
}

/// A carrier oscillator modulated in frequency and amplitude by two low-rate oscillators.
///
/// Each modulator is only consulted while its frequency is above zero, so changing a
/// modulator's waveshape has no audible effect until it is also given a frequency.
#[derive(Clone, Debug)]
pub struct ModulatedVoice {
    session: Arc<AudioSession>,
    base_frequency: f64,
    carrier: Oscillator,
    fm: Oscillator,
    am: Oscillator,
    volume: f64,
}

impl ModulatedVoice {
    pub fn new(session: Arc<AudioSession>) -> Self {
        Self::with_opts(session, VoiceOpts::default())
    }

    pub fn with_opts(session: Arc<AudioSession>, opts: VoiceOpts) -> Self {
        let mut voice = Self {
            session,
            base_frequency: 0.0,
            carrier: Oscillator::new(),
            fm: Oscillator::new(),
            am: Oscillator::new(),
            volume: 1.0,
        };
        voice.apply(opts);
        voice
    }

    /// Applies every setting in `opts` to the voice.
    pub fn apply(&mut self, opts: VoiceOpts) {
        self.set_base_frequency(opts.base_frequency);
        self.set_base_waveshape(opts.base_waveshape);
        self.set_fm_frequency(opts.fm_frequency);
        self.set_fm_waveshape(opts.fm_waveshape);
        self.set_am_frequency(opts.am_frequency);
        self.set_am_waveshape(opts.am_waveshape);
        self.set_volume(opts.volume);
    }

    pub fn set_base_frequency(&mut self, frequency: f64) {
        self.base_frequency = frequency;
    }

    pub fn base_frequency(&self) -> f64 {
        self.base_frequency
    }

    pub fn set_base_waveshape(&mut self, waveshape: Waveshape) {
        self.carrier.set_waveshape(waveshape);
    }

    pub fn set_fm_frequency(&mut self, frequency: f64) {
        self.fm.set_frequency(frequency);
    }

    pub fn set_fm_waveshape(&mut self, waveshape: Waveshape) {
        self.fm.set_waveshape(waveshape);
    }

    pub fn set_am_frequency(&mut self, frequency: f64) {
        self.am.set_frequency(frequency);
    }

    pub fn set_am_waveshape(&mut self, waveshape: Waveshape) {
        self.am.set_waveshape(waveshape);
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn session(&self) -> &Arc<AudioSession> {
        &self.session
    }

    pub fn carrier(&self) -> &Oscillator {
        &self.carrier
    }

    pub fn fm(&self) -> &Oscillator {
        &self.fm
    }

    pub fn am(&self) -> &Oscillator {
        &self.am
    }
}

impl SampleGenerator for ModulatedVoice {
    fn next_sample(&mut self) -> f64 {
        let mut frequency = self.base_frequency;
        if self.fm.frequency() > 0.0 {
            // One octave of deviation per unit of modulator output
            frequency *= ratio_from_octaves(self.fm.next_sample());
        }
        self.carrier.set_frequency(frequency);

        let mut sample = self.carrier.next_sample();
        if self.am.frequency() > 0.0 {
            // Unipolar envelope between 0 and 1
            sample *= (self.am.next_sample() + 1.0) / 2.0;
        }

        sample * self.session.master_volume() * self.volume
    }
}
