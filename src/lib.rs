pub mod convert;
pub mod encoder;
pub mod format;
pub mod player;
pub mod session;
pub mod sink;
pub mod synth;
mod util;

pub use encoder::{BufferEncoder, SampleSource, SharedSource};
pub use format::{AudioFormat, PlayerOpts};
pub use player::Player;
pub use session::AudioSession;
pub use synth::{ModulatedVoice, Oscillator, SampleGenerator, VoiceOpts, Waveshape};
