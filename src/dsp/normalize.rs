//! Normalize operation
//!
//! Scales audio so its peak absolute sample reaches a target amplitude.

use log::debug;

use crate::audio::{Audio, Sample};
use crate::dsp::effect::EffectOperation;
use crate::error::Result;

/// Peaks at or below this are treated as silence and left at unity gain
const SILENCE_PEAK: f64 = 1e-6;

/// Constant gain computed from a peak scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    gain: f64,
    target: f64,
}

impl Normalize {
    /// Scan `audio` and compute the gain that brings its peak to `target`
    pub fn analyze(audio: &dyn Audio, target: f64) -> Result<Self> {
        let peak = audio.peak()?;
        let gain = if peak > SILENCE_PEAK { target / peak } else { 1.0 };
        debug!("Normalize: peak {:.6} -> target {} (gain {:.6})", peak, target, gain);
        Ok(Self { gain, target })
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}

impl EffectOperation for Normalize {
    fn apply(&self, sample: Sample, _index: usize, _total: usize) -> Sample {
        sample * self.gain
    }

    fn name(&self) -> &'static str {
        "normalize"
    }
}
