/// Samples per second produced and consumed by every part of the engine.
pub const SAMPLE_RATE: u32 = 44100;
/// Size of one encoded sample, in bits.
pub const SAMPLE_SIZE_BITS: u16 = 16;
/// The engine only ever produces a mono signal.
pub const CHANNELS: u16 = 1;
/// Bytes handed to the sink per iteration of the playback loop.
pub const BUFFER_SIZE: usize = 1000;
/// Number of samples encoded into one buffer of `BUFFER_SIZE` bytes.
pub const SAMPLES_PER_BUFFER: usize = BUFFER_SIZE / (SAMPLE_SIZE_BITS as usize / 8);

/// The PCM layout of the byte buffers passed to an output sink.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub sample_size_bits: u16,
    pub channels: u16,
    pub signed: bool,
    pub big_endian: bool,
}

impl AudioFormat {
    pub fn bytes_per_sample(&self) -> usize {
        self.sample_size_bits as usize / 8
    }

    /// Number of bytes making up one frame (one sample for every channel).
    pub fn frame_size(&self) -> usize {
        self.bytes_per_sample() * self.channels as usize
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            sample_size_bits: SAMPLE_SIZE_BITS,
            channels: CHANNELS,
            signed: true,
            big_endian: true,
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} Hz, {}-bit {} {}, {} channel(s)",
            self.sample_rate,
            self.sample_size_bits,
            if self.signed { "signed" } else { "unsigned" },
            if self.big_endian { "big-endian" } else { "little-endian" },
            self.channels
        )
    }
}

#[derive(Copy, Clone, Debug)]
pub struct PlayerOpts {
    /// Format declared to the sink when it is opened.
    pub format: AudioFormat,
    /// Size in bytes of each chunk pulled from the sample source.
    pub buffer_size: usize,
}

impl PlayerOpts {
    pub fn samples_per_buffer(&self) -> usize {
        self.buffer_size / self.format.frame_size()
    }
}

impl Default for PlayerOpts {
    fn default() -> Self {
        Self {
            format: AudioFormat::default(),
            buffer_size: BUFFER_SIZE,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_format() {
        let format = AudioFormat::default();
        assert_eq!(format.sample_rate, 44100);
        assert_eq!(format.bytes_per_sample(), 2);
        assert_eq!(format.frame_size(), 2);
        assert!(format.signed && format.big_endian);
    }

    #[test]
    fn test_samples_per_buffer() {
        assert_eq!(PlayerOpts::default().samples_per_buffer(), 500);
        assert_eq!(SAMPLES_PER_BUFFER, 500);
    }
}
