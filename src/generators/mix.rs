//! Mixing several sources into one

use crate::audio::{Audio, Sample};
use crate::error::{DawError, Result};
use crate::factory::{AudioCreator, AudioFactory, Tokens};
use crate::generators::{Generator, GeneratorAudio};

/// Sums the sources sample by sample
///
/// A source shorter than the index contributes 0.0. No gain compensation
/// is applied; wrap the result in a normalize effect to tame peaks.
#[derive(Debug, Clone)]
pub struct MixGenerator {
    sources: Vec<Box<dyn Audio>>,
}

impl MixGenerator {
    /// All sources must share one sample rate
    pub fn new(sources: Vec<Box<dyn Audio>>) -> Result<Self> {
        let first = sources.first().ok_or(DawError::EmptyAudio)?;
        let rate = first.sample_rate();
        if let Some(other) = sources.iter().find(|s| s.sample_rate() != rate) {
            return Err(DawError::SampleRateMismatch {
                expected: rate,
                found: other.sample_rate(),
            });
        }
        Ok(Self { sources })
    }

    pub fn sources(&self) -> &[Box<dyn Audio>] {
        &self.sources
    }

    /// Shared sample rate of the sources
    pub fn sample_rate(&self) -> f64 {
        self.sources[0].sample_rate()
    }

    /// Length of the longest source
    pub fn sample_size(&self) -> usize {
        self.sources
            .iter()
            .map(|s| s.sample_size())
            .max()
            .unwrap_or(0)
    }
}

impl Generator for MixGenerator {
    fn generate(&self, index: usize) -> Result<Sample> {
        let mut sum = 0.0;
        for source in &self.sources {
            if index < source.sample_size() {
                sum += source.sample(index)?;
            }
        }
        Ok(sum)
    }

    fn name(&self) -> &'static str {
        "MixGenerator"
    }
}

impl GeneratorAudio<MixGenerator> {
    /// Mix `sources`; the result is as long as the longest source
    pub fn mix(sources: Vec<Box<dyn Audio>>) -> Result<Self> {
        let generator = MixGenerator::new(sources)?;
        Self::with_sample_size(generator.sample_rate(), generator.sample_size(), generator)
    }
}

/// Builds a mix from `MIXG <count> <audio>...`
#[derive(Debug, Default)]
pub struct MixCreator;

impl AudioCreator for MixCreator {
    fn command(&self) -> &'static str {
        "MIXG"
    }

    fn create(&self, tokens: &mut Tokens, factory: &AudioFactory) -> Result<Box<dyn Audio>> {
        let count: usize = tokens.parse("mix source count")?;
        if count == 0 {
            return Err(DawError::invalid_param("count", "a mix needs at least one source"));
        }
        let sources = (0..count)
            .map(|_| factory.create_audio(tokens))
            .collect::<Result<Vec<_>>>()?;
        Ok(Box::new(GeneratorAudio::mix(sources)?))
    }
}
