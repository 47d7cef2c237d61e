use crate::convert::{sample_to_i16, write_i16_be};
use crate::synth::SampleGenerator;
use parking_lot::Mutex;
use std::sync::Arc;

/// The capability a player pulls audio from.
pub trait SampleSource {
    /// Fills `buffer` with the next chunk of encoded audio and returns the number of
    /// bytes written. A return value of zero ends playback.
    fn fill_buffer(&mut self, buffer: &mut [u8]) -> usize;
}

/// A sample source shared between a player thread and whoever configures it.
pub type SharedSource = Arc<Mutex<dyn SampleSource + Send>>;

/// Encodes a generator's samples as signed 16-bit big-endian PCM.
#[derive(Clone, Debug)]
pub struct BufferEncoder<G> {
    generator: G,
}

impl<G: SampleGenerator> BufferEncoder<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Wraps the encoder for sharing with a player.
    pub fn shared(generator: G) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::new(generator)))
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }

    pub fn into_inner(self) -> G {
        self.generator
    }

    /// Pulls `n_samples` samples and returns their encoding, `2 * n_samples` bytes long.
    pub fn encode(&mut self, n_samples: usize) -> Vec<u8> {
        let mut bytes = vec![0; 2 * n_samples];
        self.fill_buffer(&mut bytes);
        bytes
    }
}

impl<G: SampleGenerator> SampleSource for BufferEncoder<G> {
    fn fill_buffer(&mut self, buffer: &mut [u8]) -> usize {
        let mut written = 0;
        for pair in buffer.chunks_exact_mut(2) {
            write_i16_be(sample_to_i16(self.generator.next_sample()), pair);
            written += 2;
        }
        written
    }
}
