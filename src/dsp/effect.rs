//! Effect operation trait and the effect wrapper
//!
//! An [`Effect`] owns its base audio and transforms every sample read
//! through an [`EffectOperation`]. Nothing is rendered up front.

use std::io::Write;

use crate::audio::{write_tabbed, Audio, AudioHeader, Sample};
use crate::error::Result;

/// Per-sample transformation applied by an [`Effect`]
pub trait EffectOperation: Clone + Send + Sync + 'static {
    /// Transform `sample`, found at `index` of a base audio `total` samples long
    fn apply(&self, sample: Sample, index: usize, total: usize) -> Sample;

    /// Get the effect type identifier
    fn name(&self) -> &'static str;
}

/// Audio produced by running a base audio through an operation
#[derive(Debug, Clone)]
pub struct Effect<Op: EffectOperation> {
    header: AudioHeader,
    base: Box<dyn Audio>,
    operation: Op,
}

impl<Op: EffectOperation> Effect<Op> {
    /// Wrap a deep copy of `base`
    pub fn new(base: &dyn Audio, operation: Op) -> Result<Self> {
        Self::wrap(base.box_clone(), operation)
    }

    /// Take ownership of `base` without copying
    pub fn wrap(base: Box<dyn Audio>, operation: Op) -> Result<Self> {
        let mut header = AudioHeader::new(base.sample_rate(), base.duration(), base.sample_size())?;
        header.name = base.name().map(str::to_string);
        Ok(Self {
            header,
            base,
            operation,
        })
    }

    pub fn base(&self) -> &dyn Audio {
        self.base.as_ref()
    }

    pub fn operation(&self) -> &Op {
        &self.operation
    }
}

impl<Op: EffectOperation> Audio for Effect<Op> {
    fn header(&self) -> &AudioHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut AudioHeader {
        &mut self.header
    }

    fn kind(&self) -> &'static str {
        "Effect"
    }

    fn sample(&self, index: usize) -> Result<Sample> {
        let input = self.base.sample(index)?;
        Ok(self
            .operation
            .apply(input, index, self.base.sample_size()))
    }

    fn write_to(&self, out: &mut dyn Write) -> Result<()> {
        write_tabbed(self, out)
    }

    fn box_clone(&self) -> Box<dyn Audio> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{FileAudio, Silence};
    use crate::error::DawError;

    #[derive(Debug, Clone)]
    struct AddIndex;

    impl EffectOperation for AddIndex {
        fn apply(&self, sample: Sample, index: usize, _total: usize) -> Sample {
            sample + index as Sample
        }

        fn name(&self) -> &'static str {
            "add_index"
        }
    }

    #[test]
    fn test_effect_copies_header() {
        let base = Silence::new(2.0, 8.0, 16).unwrap();
        let effect = Effect::new(&base, AddIndex).unwrap();
        assert_eq!(effect.header(), base.header());
        assert_eq!(effect.operation().name(), "add_index");
    }

    #[test]
    fn test_effect_is_independent_of_original() {
        let mut base = FileAudio::from_samples(vec![1.0, 2.0], 2.0).unwrap();
        let effect = Effect::new(&base, AddIndex).unwrap();

        *base.sample_mut(0).unwrap() = 100.0;

        assert_eq!(effect.sample(0).unwrap(), 1.0);
        assert_eq!(effect.sample(1).unwrap(), 3.0);
        assert_eq!(effect.base().sample(0).unwrap(), 1.0);
    }

    #[test]
    fn test_effect_propagates_base_errors() {
        let base = FileAudio::from_samples(vec![1.0], 1.0).unwrap();
        let effect = Effect::wrap(Box::new(base), AddIndex).unwrap();
        assert!(matches!(
            effect.sample(3),
            Err(DawError::IndexOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_effect_rejects_unset_base() {
        let err = Effect::wrap(Box::new(FileAudio::default()), AddIndex).unwrap_err();
        assert!(matches!(err, DawError::InvalidSampleRate { .. }));
    }

    #[test]
    fn test_effect_is_read_only() {
        let base = Silence::new(1.0, 1.0, 1).unwrap();
        let mut effect = Effect::new(&base, AddIndex).unwrap();
        assert!(matches!(
            effect.sample_mut(0),
            Err(DawError::ImmutableAudio { kind: "Effect" })
        ));
    }

    #[test]
    fn test_effect_write_to() {
        let base = Silence::new(1.0, 3.0, 3).unwrap();
        let effect = Effect::new(&base, AddIndex).unwrap();
        let mut out = Vec::new();
        effect.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\t3\t3\t0 1 2\n");
    }
}
