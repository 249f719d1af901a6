//! Looping a source

use crate::audio::{Audio, Sample};
use crate::error::{DawError, Result};
use crate::factory::{AudioCreator, AudioFactory, Tokens};
use crate::generators::{Generator, GeneratorAudio};

/// Plays its source over and over
#[derive(Debug, Clone)]
pub struct RepeatGenerator {
    source: Box<dyn Audio>,
}

impl RepeatGenerator {
    pub fn new(source: Box<dyn Audio>) -> Result<Self> {
        if source.sample_size() == 0 {
            return Err(DawError::EmptyAudio);
        }
        Ok(Self { source })
    }

    pub fn source(&self) -> &dyn Audio {
        self.source.as_ref()
    }
}

impl Generator for RepeatGenerator {
    fn generate(&self, index: usize) -> Result<Sample> {
        self.source.sample(index % self.source.sample_size())
    }

    fn name(&self) -> &'static str {
        "RepeatGenerator"
    }
}

impl GeneratorAudio<RepeatGenerator> {
    /// Loop `source` `times` times back to back
    pub fn repeat(source: Box<dyn Audio>, times: usize) -> Result<Self> {
        if times == 0 {
            return Err(DawError::invalid_param("times", "must repeat at least once"));
        }
        let rate = source.sample_rate();
        let size = source
            .sample_size()
            .checked_mul(times)
            .ok_or_else(|| DawError::invalid_param("times", "repeat length overflows"))?;
        Self::with_sample_size(rate, size, RepeatGenerator::new(source)?)
    }
}

/// Builds a loop from `REPT <times> <audio>`
#[derive(Debug, Default)]
pub struct RepeatCreator;

impl AudioCreator for RepeatCreator {
    fn command(&self) -> &'static str {
        "REPT"
    }

    fn create(&self, tokens: &mut Tokens, factory: &AudioFactory) -> Result<Box<dyn Audio>> {
        let times: usize = tokens.parse("repeat count")?;
        let source = factory.create_audio(tokens)?;
        Ok(Box::new(GeneratorAudio::repeat(source, times)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::FileAudio;

    #[test]
    fn test_repeat_loops_source() {
        let source = FileAudio::from_samples(vec![0.1, 0.2, 0.3], 3.0).unwrap();
        let looped = GeneratorAudio::repeat(Box::new(source), 3).unwrap();

        assert_eq!(looped.sample_size(), 9);
        assert_eq!(looped.duration(), 3.0);
        assert_eq!(
            looped.samples().unwrap(),
            vec![0.1, 0.2, 0.3, 0.1, 0.2, 0.3, 0.1, 0.2, 0.3]
        );
        assert_eq!(looped.sample(9).unwrap(), 0.0);
    }

    #[test]
    fn test_repeat_zero_times() {
        let source = FileAudio::from_samples(vec![0.1], 1.0).unwrap();
        assert!(matches!(
            GeneratorAudio::repeat(Box::new(source), 0),
            Err(DawError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_repeat_length_overflow() {
        let factory = AudioFactory::with_defaults();
        let err = factory
            .create_from_str("REPT 18446744073709551615 SLNC 1 4 4")
            .unwrap_err();
        assert!(matches!(err, DawError::InvalidParameter { .. }));
    }

    #[test]
    fn test_repeat_empty_source() {
        assert!(matches!(
            RepeatGenerator::new(Box::new(FileAudio::default())),
            Err(DawError::EmptyAudio)
        ));
    }

    #[test]
    fn test_repeat_creator() {
        let factory = AudioFactory::with_defaults();
        let audio = factory.create_from_str("REPT 4 SLNC 0.5 4 2").unwrap();
        assert_eq!(audio.sample_size(), 8);
        assert_eq!(audio.sample_rate(), 4.0);
        assert_eq!(audio.kind(), "GeneratorAudio");
    }
}
