use super::{check_format, AudioSink, SinkError, SinkProvider};
use crate::format::AudioFormat;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Everything observed by the sinks of a [`MemorySinks`] provider.
#[derive(Clone, Debug, Default)]
pub struct MemoryRecord {
    pub opens: usize,
    pub writes: usize,
    pub drains: usize,
    pub closes: usize,
    pub bytes: Vec<u8>,
    pub format: Option<AudioFormat>,
}

/// Captures written audio in memory. Used for offline rendering and in tests,
/// where it can also be told to fail.
#[derive(Clone, Default)]
pub struct MemorySinks {
    record: Arc<Mutex<MemoryRecord>>,
    fail_open: bool,
    fail_after: Option<usize>,
    write_delay: Duration,
}

impl MemorySinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every open attempt fail.
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Makes each sink fail on its write after `writes` successful ones.
    pub fn failing_after(mut self, writes: usize) -> Self {
        self.fail_after = Some(writes);
        self
    }

    /// Simulates a device by sleeping on every write.
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = delay;
        self
    }

    pub fn record(&self) -> MemoryRecord {
        self.record.lock().clone()
    }
}

impl SinkProvider for MemorySinks {
    fn open(&self, format: &AudioFormat) -> Result<Box<dyn AudioSink>, SinkError> {
        check_format(format)?;
        let mut record = self.record.lock();
        record.opens += 1;
        if self.fail_open {
            return Err(SinkError::Injected("open refused".into()));
        }
        record.format = Some(*format);
        Ok(Box::new(MemorySink {
            record: Arc::clone(&self.record),
            writes_left: self.fail_after,
            write_delay: self.write_delay,
            closed: false,
        }))
    }
}

struct MemorySink {
    record: Arc<Mutex<MemoryRecord>>,
    writes_left: Option<usize>,
    write_delay: Duration,
    closed: bool,
}

impl AudioSink for MemorySink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        if let Some(left) = self.writes_left.as_mut() {
            if *left == 0 {
                return Err(SinkError::Injected("write refused".into()));
            }
            *left -= 1;
        }
        if !self.write_delay.is_zero() {
            std::thread::sleep(self.write_delay);
        }
        let mut record = self.record.lock();
        record.writes += 1;
        record.bytes.extend_from_slice(bytes);
        Ok(())
    }

    fn drain(&mut self) -> Result<(), SinkError> {
        self.record.lock().drains += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.closed = true;
        self.record.lock().closes += 1;
        Ok(())
    }
}
