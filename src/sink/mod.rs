//! Output sinks: the destinations a player writes encoded PCM into.

pub use device::DeviceSinks;
pub use memory::{MemoryRecord, MemorySinks};
pub use wav::WavSinks;

use crate::format::AudioFormat;
use thiserror::Error;

mod device;
mod memory;
mod wav;

/// An open output accepting PCM bytes in the format it was opened with.
pub trait AudioSink {
    /// Writes a chunk of encoded audio, blocking until the sink has room for it.
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError>;

    /// Blocks until everything written so far has been played or persisted.
    fn drain(&mut self) -> Result<(), SinkError>;

    /// Releases the underlying resource. Further writes fail.
    fn close(&mut self) -> Result<(), SinkError>;
}

/// Opens a fresh sink for each playback episode.
///
/// Sinks are opened on the player's own thread, so the sink itself need not be `Send`.
pub trait SinkProvider: Send + Sync {
    fn open(&self, format: &AudioFormat) -> Result<Box<dyn AudioSink>, SinkError>;
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAV error: {0}")]
    Wav(hound::Error),
    #[error("No output device is available")]
    NoDevice,
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(&'static str),
    #[error("Could not query the output device: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("Could not build the output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("Could not start the output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("Could not pause the output stream: {0}")]
    PauseStream(#[from] cpal::PauseStreamError),
    #[error("The output device stopped consuming audio")]
    Stalled,
    #[error("The sink has been closed")]
    Closed,
    #[error("{0}")]
    Injected(String),
}

impl From<hound::Error> for SinkError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(inner) => SinkError::Io(inner),
            hound::Error::Unsupported => SinkError::UnsupportedFormat("Unsupported WAV format"),
            other => SinkError::Wav(other),
        }
    }
}

/// Rejects formats other than signed big-endian 16-bit PCM.
fn check_format(format: &AudioFormat) -> Result<(), SinkError> {
    if format.sample_size_bits != 16 {
        return Err(SinkError::UnsupportedFormat("Only 16-bit samples are supported"));
    }
    if !format.signed || !format.big_endian {
        return Err(SinkError::UnsupportedFormat("Samples must be signed and big-endian"));
    }
    if format.channels == 0 {
        return Err(SinkError::UnsupportedFormat("At least one channel is required"));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_check_format() {
        assert!(check_format(&AudioFormat::default()).is_ok());
        let little = AudioFormat {
            big_endian: false,
            ..Default::default()
        };
        assert!(matches!(check_format(&little), Err(SinkError::UnsupportedFormat(_))));
        let wide = AudioFormat {
            sample_size_bits: 24,
            ..Default::default()
        };
        assert!(check_format(&wide).is_err());
    }

    #[test]
    fn test_hound_error_mapping() {
        let err: SinkError = hound::Error::Unsupported.into();
        assert!(matches!(err, SinkError::UnsupportedFormat(_)));
        let err: SinkError = hound::Error::FormatError("bad").into();
        assert!(matches!(err, SinkError::Wav(_)));
    }
}
