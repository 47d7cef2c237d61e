use super::SampleGenerator;
use crate::format::SAMPLE_RATE;
use std::f64::consts::PI;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Waveshape {
    #[default]
    Sine,
    Square,
    Saw,
}

impl Waveshape {
    /// Evaluates one sample of the waveform at `index` out of a period of `period` samples.
    fn evaluate(self, index: u64, period: u64) -> f64 {
        let x = index as f64 / period as f64;
        match self {
            Waveshape::Sine => (2.0 * PI * x).sin(),
            Waveshape::Square => {
                if index < period / 2 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveshape::Saw => 2.0 * (x - (x + 0.5).floor()),
        }
    }
}

impl std::fmt::Display for Waveshape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Waveshape::Sine => "sine",
            Waveshape::Square => "square",
            Waveshape::Saw => "saw",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown waveshape: {0}")]
pub struct WaveshapeParseError(String);

impl FromStr for Waveshape {
    type Err = WaveshapeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sine" | "sin" => Ok(Waveshape::Sine),
            "square" | "squ" => Ok(Waveshape::Square),
            "saw" | "sawtooth" => Ok(Waveshape::Saw),
            _ => Err(WaveshapeParseError(s.to_owned())),
        }
    }
}

/// A periodic waveform generator whose period is a whole number of samples.
///
/// The period is `floor(sample_rate / frequency)`, so the reproduced pitch is
/// quantized: 440 Hz at 44.1 kHz plays back with a 100-sample period (441 Hz).
/// A period of zero is the silence sentinel and always pairs with a zero frequency.
#[derive(Clone, Debug)]
pub struct Oscillator {
    sample_rate: u32,
    waveshape: Waveshape,
    frequency: f64,
    period_samples: u64,
    phase_index: u64,
}

impl Oscillator {
    /// Creates a 440 Hz sine oscillator at the engine sample rate.
    pub fn new() -> Self {
        Self::with_params(440.0, Waveshape::Sine, SAMPLE_RATE)
    }

    pub fn with_params(frequency: f64, waveshape: Waveshape, sample_rate: u32) -> Self {
        let mut osc = Self {
            sample_rate,
            waveshape,
            frequency: 0.0,
            period_samples: 0,
            phase_index: 0,
        };
        osc.set_frequency(frequency);
        osc
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn waveshape(&self) -> Waveshape {
        self.waveshape
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn period_samples(&self) -> u64 {
        self.period_samples
    }

    pub fn phase_index(&self) -> u64 {
        self.phase_index
    }

    /// Sets the frequency in Hz. Anything that is not a positive frequency with a
    /// period of at least one sample silences the oscillator.
    pub fn set_frequency(&mut self, frequency: f64) {
        let period = if frequency > 0.0 {
            (self.sample_rate as f64 / frequency) as u64
        } else {
            0
        };
        if period == 0 {
            self.frequency = 0.0;
            self.period_samples = 0;
            return;
        }
        self.frequency = frequency;
        self.period_samples = period;
        // The phase is kept as is across a change of period, only wrapped into range.
        if self.phase_index >= period {
            self.phase_index %= period;
        }
    }

    pub fn set_waveshape(&mut self, waveshape: Waveshape) {
        self.waveshape = waveshape;
    }

    /// Changes the sample rate, recomputing the period for the current frequency.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
        self.set_frequency(self.frequency);
    }

    /// Returns the oscillator to the start of its period.
    pub fn reset_phase(&mut self) {
        self.phase_index = 0;
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleGenerator for Oscillator {
    fn next_sample(&mut self) -> f64 {
        if self.period_samples == 0 {
            return 0.0;
        }
        let value = self.waveshape.evaluate(self.phase_index, self.period_samples);
        self.phase_index = (self.phase_index + 1) % self.period_samples;
        value
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn take(osc: &mut Oscillator, n: usize) -> Vec<f64> {
        (0..n).map(|_| osc.next_sample()).collect()
    }

    #[test]
    fn test_defaults() {
        let osc = Oscillator::new();
        assert_eq!(osc.waveshape(), Waveshape::Sine);
        assert_eq!(osc.frequency(), 440.0);
        assert_eq!(osc.period_samples(), 100);
        assert_eq!(osc.phase_index(), 0);
    }

    #[test]
    fn test_period_is_quantized() {
        let mut osc = Oscillator::new();
        osc.set_frequency(441.0);
        assert_eq!(osc.period_samples(), 100);
        osc.set_frequency(1000.0);
        assert_eq!(osc.period_samples(), 44);
        osc.set_frequency(5.0);
        assert_eq!(osc.period_samples(), 8820);
    }

    #[test]
    fn test_periodicity() {
        for frequency in [1.0, 5.0, 440.0, 997.0, 12345.6, 44100.0] {
            let mut osc = Oscillator::with_params(frequency, Waveshape::Saw, SAMPLE_RATE);
            for _ in 0..7 {
                osc.next_sample();
            }
            let start = osc.phase_index();
            let period = osc.period_samples() as usize;
            let first = take(&mut osc, period);
            assert_eq!(osc.phase_index(), start);
            let second = take(&mut osc, period);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_non_positive_frequency_is_silent() {
        for frequency in [0.0, -1.0, -440.0, f64::NAN] {
            let mut osc = Oscillator::new();
            osc.next_sample();
            osc.set_frequency(frequency);
            assert_eq!(osc.frequency(), 0.0);
            assert_eq!(osc.period_samples(), 0);
            let phase = osc.phase_index();
            assert!(take(&mut osc, 50).iter().all(|&s| s == 0.0));
            assert_eq!(osc.phase_index(), phase);
        }
    }

    #[test]
    fn test_frequency_above_sample_rate_is_silent() {
        let mut osc = Oscillator::new();
        osc.set_frequency(50000.0);
        assert_eq!(osc.frequency(), 0.0);
        assert_eq!(osc.period_samples(), 0);
        assert_eq!(osc.next_sample(), 0.0);
    }

    #[test]
    fn test_sine_shape() {
        let mut osc = Oscillator::new();
        let samples = take(&mut osc, 100);
        assert!(samples[0].abs() < EPSILON);
        assert!((samples[25] - 1.0).abs() < EPSILON);
        assert!(samples[50].abs() < EPSILON);
        assert!((samples[75] + 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_square_shape() {
        let mut osc = Oscillator::with_params(441.0, Waveshape::Square, SAMPLE_RATE);
        let samples = take(&mut osc, 100);
        assert!(samples[..50].iter().all(|&s| s == 1.0));
        assert!(samples[50..].iter().all(|&s| s == -1.0));
    }

    #[test]
    fn test_saw_shape() {
        let mut osc = Oscillator::with_params(441.0, Waveshape::Saw, SAMPLE_RATE);
        let samples = take(&mut osc, 100);
        assert!(samples[0].abs() < EPSILON);
        assert!((samples[25] - 0.5).abs() < EPSILON);
        assert!((samples[49] - 0.98).abs() < EPSILON);
        assert!((samples[50] + 1.0).abs() < EPSILON);
        assert!((samples[75] + 0.5).abs() < EPSILON);
        assert!(samples.iter().all(|&s| (-1.0..1.0).contains(&s)));
    }

    #[test]
    fn test_waveshape_change_keeps_phase() {
        let mut osc = Oscillator::with_params(441.0, Waveshape::Square, SAMPLE_RATE);
        take(&mut osc, 60);
        osc.set_waveshape(Waveshape::Sine);
        assert_eq!(osc.phase_index(), 60);
        let expected = (2.0 * PI * 0.6).sin();
        assert!((osc.next_sample() - expected).abs() < EPSILON);
    }

    #[test]
    fn test_phase_wraps_on_shorter_period() {
        let mut osc = Oscillator::with_params(441.0, Waveshape::Sine, SAMPLE_RATE);
        take(&mut osc, 90);
        osc.set_frequency(882.0);
        assert_eq!(osc.period_samples(), 50);
        assert_eq!(osc.phase_index(), 40);
    }

    #[test]
    fn test_set_sample_rate() {
        let mut osc = Oscillator::new();
        osc.set_sample_rate(48000);
        assert_eq!(osc.period_samples(), 109);
        assert_eq!(osc.sample_rate(), 48000);
    }

    #[test]
    fn test_parse_waveshape() {
        assert_eq!("SINE".parse::<Waveshape>(), Ok(Waveshape::Sine));
        assert_eq!("squ".parse::<Waveshape>(), Ok(Waveshape::Square));
        assert_eq!("Saw".parse::<Waveshape>(), Ok(Waveshape::Saw));
        assert!("triangle".parse::<Waveshape>().is_err());
        assert_eq!(Waveshape::Square.to_string(), "square");
    }
}
