//! Fade in and fade out operations
//!
//! Both are linear ramps `fade_duration * sample_rate` samples long.

use crate::audio::Sample;
use crate::dsp::effect::EffectOperation;

fn fade_samples(fade_duration: f64, sample_rate: f64) -> usize {
    (fade_duration * sample_rate).max(0.0).floor() as usize
}

/// Ramps from silence to full level over the first samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeIn {
    /// Fade length in seconds
    pub fade_duration: f64,
    /// Sample rate used to convert the length to samples
    pub sample_rate: f64,
}

/// Name kept for the operation-style API
pub type FadeInOperation = FadeIn;

impl FadeIn {
    pub fn new(fade_duration: f64, sample_rate: f64) -> Self {
        Self {
            fade_duration,
            sample_rate,
        }
    }

    /// Gain at `index`: `index / n` inside the ramp, 1.0 after it
    pub fn gain(&self, index: usize) -> f64 {
        let n = fade_samples(self.fade_duration, self.sample_rate);
        if n == 0 || index >= n {
            return 1.0;
        }
        index as f64 / n as f64
    }
}

impl EffectOperation for FadeIn {
    fn apply(&self, sample: Sample, index: usize, _total: usize) -> Sample {
        sample * self.gain(index)
    }

    fn name(&self) -> &'static str {
        "fade_in"
    }
}

/// Ramps from full level to silence over the last samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeOut {
    /// Fade length in seconds
    pub fade_duration: f64,
    /// Sample rate used to convert the length to samples
    pub sample_rate: f64,
}

impl FadeOut {
    pub fn new(fade_duration: f64, sample_rate: f64) -> Self {
        Self {
            fade_duration,
            sample_rate,
        }
    }

    /// Gain at `index` of `total`: `(total - index) / n` inside the ramp
    pub fn gain(&self, index: usize, total: usize) -> f64 {
        let n = fade_samples(self.fade_duration, self.sample_rate);
        if n == 0 {
            return 1.0;
        }
        if index >= total {
            return 0.0;
        }
        let remaining = total - index;
        if remaining <= n {
            remaining as f64 / n as f64
        } else {
            1.0
        }
    }
}

impl EffectOperation for FadeOut {
    fn apply(&self, sample: Sample, index: usize, total: usize) -> Sample {
        sample * self.gain(index, total)
    }

    fn name(&self) -> &'static str {
        "fade_out"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Audio, FileAudio};
    use crate::dsp::Effect;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fade_in_ramp() {
        // 4 fade samples
        let fade = FadeIn::new(1.0, 4.0);
        let gains: Vec<f64> = (0..6).map(|i| fade.gain(i)).collect();
        assert_eq!(gains, vec![0.0, 0.25, 0.5, 0.75, 1.0, 1.0]);
    }

    #[test]
    fn test_fade_in_zero_length() {
        let fade = FadeIn::new(0.0, 44100.0);
        assert_eq!(fade.gain(0), 1.0);
        let fade = FadeIn::new(0.1, 5.0);
        assert_eq!(fade.gain(0), 1.0);
    }

    #[test]
    fn test_fade_out_ramp() {
        let fade = FadeOut::new(0.5, 4.0);
        let gains: Vec<f64> = (0..6).map(|i| fade.gain(i, 6)).collect();
        assert_eq!(gains, vec![1.0, 1.0, 1.0, 1.0, 1.0, 0.5]);
        // Past the end
        assert_eq!(fade.gain(6, 6), 0.0);
    }

    #[test]
    fn test_fade_out_longer_than_audio() {
        let fade = FadeOut::new(1.0, 8.0);
        assert_eq!(fade.gain(0, 4), 0.5);
        assert_eq!(fade.gain(3, 4), 0.125);
    }

    #[test]
    fn test_fade_out_zero_length() {
        let fade = FadeOut::new(0.0, 8.0);
        assert_eq!(fade.gain(10, 4), 1.0);
    }

    #[test]
    fn test_fade_effects_over_constant_signal() {
        let base = FileAudio::from_samples(vec![1.0; 4], 4.0).unwrap();

        let fade_in = Effect::new(&base, FadeInOperation::new(1.0, 4.0)).unwrap();
        assert_eq!(fade_in.samples().unwrap(), vec![0.0, 0.25, 0.5, 0.75]);

        let fade_out = Effect::new(&base, FadeOut::new(1.0, 4.0)).unwrap();
        assert_eq!(fade_out.samples().unwrap(), vec![1.0, 0.75, 0.5, 0.25]);
    }
}
