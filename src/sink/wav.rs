use super::{check_format, AudioSink, SinkError, SinkProvider};
use crate::convert::read_i16_be;
use crate::format::AudioFormat;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Renders playback into a WAV file instead of a device.
/// Each episode truncates and rewrites the file.
pub struct WavSinks {
    path: PathBuf,
}

impl WavSinks {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SinkProvider for WavSinks {
    fn open(&self, format: &AudioFormat) -> Result<Box<dyn AudioSink>, SinkError> {
        check_format(format)?;
        let spec = hound::WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: format.sample_size_bits,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = hound::WavWriter::create(&self.path, spec)?;
        log::debug!("Writing {} to {}", format, self.path.display());
        Ok(Box::new(WavSink {
            writer: Some(writer),
        }))
    }
}

struct WavSink {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
}

impl AudioSink for WavSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        let writer = self.writer.as_mut().ok_or(SinkError::Closed)?;
        for value in read_i16_be(bytes) {
            writer.write_sample(value)?;
        }
        Ok(())
    }

    fn drain(&mut self) -> Result<(), SinkError> {
        match self.writer.as_mut() {
            Some(writer) => Ok(writer.flush()?),
            None => Ok(()),
        }
    }

    fn close(&mut self) -> Result<(), SinkError> {
        match self.writer.take() {
            Some(writer) => Ok(writer.finalize()?),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wav_round_trip() {
        let path = std::env::temp_dir().join(format!("modsynth-wav-{}.wav", std::process::id()));
        let sinks = WavSinks::new(&path);
        let mut sink = sinks.open(&AudioFormat::default()).unwrap();
        sink.write(&[0x40, 0x00, 0x80, 0x01]).unwrap();
        sink.drain().unwrap();
        sink.close().unwrap();
        assert!(matches!(sink.write(&[0, 0]), Err(SinkError::Closed)));

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![16384, -32767]);
        std::fs::remove_file(&path).ok();
    }
}
