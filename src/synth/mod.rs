pub use self::oscillator::{Oscillator, Waveshape, WaveshapeParseError};
pub use self::voice::{ModulatedVoice, VoiceOpts};

pub mod oscillator;
pub mod voice;

/// Something that produces an audio signal one sample at a time.
pub trait SampleGenerator {
    /// Produces the next sample, nominally in [-1.0, 1.0].
    fn next_sample(&mut self) -> f64;
}
