use super::{check_format, AudioSink, SinkError, SinkProvider};
use crate::convert::{i16_to_sample, mono_to_interleaved, read_i16_be};
use crate::format::AudioFormat;
use basedrop::Collector;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, OutputCallbackInfo, SampleRate, Stream, StreamConfig};
use ringbuf_basedrop as ringbuf;
use std::sync::mpsc;
use std::time::Duration;

/// How long a write or drain waits for the device to consume audio before giving up.
const STALL_TIMEOUT: Duration = Duration::from_secs(2);

/// Plays audio on the host's default output device through cpal.
pub struct DeviceSinks {
    /// Capacity of the ring buffer feeding the device, in frames.
    latency_frames: usize,
}

impl DeviceSinks {
    pub fn new() -> Self {
        Self {
            latency_frames: 4096,
        }
    }

    pub fn with_latency(latency_frames: usize) -> Self {
        Self {
            latency_frames: latency_frames.max(1),
        }
    }
}

impl Default for DeviceSinks {
    fn default() -> Self {
        Self::new()
    }
}

impl SinkProvider for DeviceSinks {
    fn open(&self, format: &AudioFormat) -> Result<Box<dyn AudioSink>, SinkError> {
        check_format(format)?;

        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(SinkError::NoDevice)?;

        // A mono signal is copied onto every channel the device has
        let channels = match format.channels {
            1 => device.default_output_config()?.channels(),
            n => n,
        };
        let config = StreamConfig {
            channels,
            sample_rate: SampleRate(format.sample_rate),
            buffer_size: BufferSize::Default,
        };

        let collector = Collector::new();
        let capacity = self.latency_frames * channels as usize;
        let (tx, mut rx) = ringbuf::RingBuffer::new(capacity).split(&collector.handle());
        let (notify_tx, notify_rx) = mpsc::sync_channel(0);

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &OutputCallbackInfo| {
                let read = rx.pop_slice(data);
                // Underflow is played as silence
                data[read..].fill(0.0);
                notify_tx.try_send(()).ok();
            },
            move |err| {
                log::error!("An error occurred on the output stream: {}", err);
            },
            None,
        )?;
        stream.play()?;
        log::debug!("Opened output device with {} channel(s) for {}", channels, format);

        Ok(Box::new(DeviceSink {
            stream: Some(stream),
            channel: tx,
            notify: notify_rx,
            collector,
            fan_out: (channels / format.channels) as usize,
            buffer: vec![],
        }))
    }
}

struct DeviceSink {
    stream: Option<Stream>,
    channel: ringbuf::Producer<f32>,
    notify: mpsc::Receiver<()>,
    collector: Collector,
    fan_out: usize,
    buffer: Vec<f32>,
}

impl DeviceSink {
    /// Blocks until the stream callback has run again.
    fn wait_for_device(&self) -> Result<(), SinkError> {
        self.notify
            .recv_timeout(STALL_TIMEOUT)
            .map_err(|_| SinkError::Stalled)
    }
}

impl AudioSink for DeviceSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        if self.stream.is_none() {
            return Err(SinkError::Closed);
        }

        let samples = read_i16_be(bytes).map(i16_to_sample);
        mono_to_interleaved(samples, self.fan_out, &mut self.buffer);

        let mut pending = &self.buffer[..];
        loop {
            let pushed = self.channel.push_slice(pending);
            pending = &pending[pushed..];
            if pending.is_empty() {
                return Ok(());
            }
            self.wait_for_device()?;
        }
    }

    fn drain(&mut self) -> Result<(), SinkError> {
        if self.stream.is_none() {
            return Ok(());
        }
        while !self.channel.is_empty() {
            self.wait_for_device()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        let Some(stream) = self.stream.take() else {
            return Ok(());
        };
        let paused = stream.pause();
        drop(stream);
        self.collector.collect();
        Ok(paused?)
    }
}
