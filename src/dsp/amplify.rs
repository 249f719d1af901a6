//! Amplify operation
//!
//! Scales every sample by a constant linear factor.

use crate::audio::Sample;
use crate::dsp::effect::EffectOperation;

/// Multiplies each sample by `factor`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amplify {
    factor: f64,
}

/// Name kept for the operation-style API
pub type AmplifyEffect = Amplify;

impl Amplify {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    /// Linear gain multiplier
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl Default for Amplify {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl EffectOperation for Amplify {
    fn apply(&self, sample: Sample, _index: usize, _total: usize) -> Sample {
        sample * self.factor
    }

    fn name(&self) -> &'static str {
        "amplify"
    }
}
