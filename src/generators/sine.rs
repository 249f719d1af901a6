//! Sine wave generator

use std::f64::consts::PI;

use crate::audio::{Audio, Sample};
use crate::error::Result;
use crate::factory::{AudioCreator, AudioFactory, Tokens};
use crate::generators::{Generator, GeneratorAudio};

/// Sine wave of a fixed frequency, range [-1.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineGenerator {
    /// Frequency in Hz
    pub frequency: f64,
    /// Sample rate in Hz
    pub rate: f64,
}

impl Default for SineGenerator {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            rate: 44100.0,
        }
    }
}

impl SineGenerator {
    pub fn new(frequency: f64, rate: f64) -> Self {
        Self { frequency, rate }
    }
}

impl Generator for SineGenerator {
    fn generate(&self, index: usize) -> Result<Sample> {
        Ok((2.0 * PI * self.frequency * index as f64 / self.rate).sin())
    }

    fn name(&self) -> &'static str {
        "SineGenerator"
    }
}

impl GeneratorAudio<SineGenerator> {
    /// Sine tone at `frequency` lasting `duration` seconds
    pub fn sine(frequency: f64, rate: f64, duration: f64) -> Result<Self> {
        Self::new(rate, duration, SineGenerator::new(frequency, rate))
    }
}

/// Builds a sine tone from `SINE <frequency> <rate> <duration>`
#[derive(Debug, Default)]
pub struct SineCreator;

impl AudioCreator for SineCreator {
    fn command(&self) -> &'static str {
        "SINE"
    }

    fn create(&self, tokens: &mut Tokens, _factory: &AudioFactory) -> Result<Box<dyn Audio>> {
        let frequency: f64 = tokens.parse("sine frequency")?;
        let rate: f64 = tokens.parse("sine sample rate")?;
        let duration: f64 = tokens.parse("sine duration")?;
        Ok(Box::new(GeneratorAudio::sine(frequency, rate, duration)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_is_a440() {
        let sine = SineGenerator::default();
        assert_eq!(sine.frequency, 440.0);
        assert_eq!(sine.rate, 44100.0);
    }

    #[test]
    fn test_quarter_period_values() {
        // 1 Hz at 4 Hz sample rate: 0, 1, 0, -1
        let sine = SineGenerator::new(1.0, 4.0);
        assert_abs_diff_eq!(sine.generate(0).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sine.generate(1).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sine.generate(2).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sine.generate(3).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sine_audio_peak() {
        let tone = GeneratorAudio::sine(440.0, 44100.0, 0.1).unwrap();
        assert_eq!(tone.sample_size(), 4410);
        assert_abs_diff_eq!(tone.peak().unwrap(), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_sine_creator() {
        let factory = AudioFactory::with_defaults();
        let audio = factory.create_from_str("SINE 1 4 2").unwrap();
        assert_eq!(audio.sample_size(), 8);
        assert_abs_diff_eq!(audio.sample(5).unwrap(), 1.0, epsilon = 1e-12);

        let mut out = Vec::new();
        audio.write_to(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().ends_with("SineGenerator\n"));
    }
}
