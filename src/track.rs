//! Track
//!
//! A track is an ordered sequence of audio clips played back to back at a
//! single sample rate.

use uuid::Uuid;

use crate::audio::{Audio, FileAudio, Sample};
use crate::error::{DawError, Result};

/// An ordered list of clips with mixer settings
#[derive(Debug, Clone)]
pub struct Track {
    id: Uuid,
    name: String,
    sample_rate: f64,
    clips: Vec<Box<dyn Audio>>,
    volume: f64,
    pan: f64,
    muted: bool,
    soloed: bool,
}

impl Track {
    /// Create an empty track at `sample_rate`
    pub fn new(name: impl Into<String>, sample_rate: f64) -> Result<Self> {
        if !crate::audio::is_valid_sample_rate(sample_rate) {
            return Err(DawError::InvalidSampleRate { rate: sample_rate });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sample_rate,
            clips: Vec::new(),
            volume: 1.0,
            pan: 0.0,
            muted: false,
            soloed: false,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Linear playback gain
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Set the linear gain; must be finite and non-negative
    pub fn set_volume(&mut self, volume: f64) -> Result<()> {
        if !volume.is_finite() || volume < 0.0 {
            return Err(DawError::invalid_param(
                "volume",
                format!("{} is not a finite, non-negative gain", volume),
            ));
        }
        self.volume = volume;
        Ok(())
    }

    /// Stereo position in [-1.0, 1.0]; stored only, rendering is mono
    pub fn pan(&self) -> f64 {
        self.pan
    }

    pub fn set_pan(&mut self, pan: f64) {
        self.pan = pan.clamp(-1.0, 1.0);
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_soloed(&self) -> bool {
        self.soloed
    }

    pub fn set_soloed(&mut self, soloed: bool) {
        self.soloed = soloed;
    }

    fn check_rate(&self, clip: &dyn Audio) -> Result<()> {
        if clip.sample_rate() != self.sample_rate {
            return Err(DawError::SampleRateMismatch {
                expected: self.sample_rate,
                found: clip.sample_rate(),
            });
        }
        Ok(())
    }

    /// Append a clip; returns its index
    pub fn add_clip(&mut self, clip: Box<dyn Audio>) -> Result<usize> {
        self.check_rate(clip.as_ref())?;
        self.clips.push(clip);
        Ok(self.clips.len() - 1)
    }

    /// Insert a clip at `position`, clamped to the clip count
    pub fn insert_clip(&mut self, clip: Box<dyn Audio>, position: usize) -> Result<usize> {
        self.check_rate(clip.as_ref())?;
        let position = position.min(self.clips.len());
        self.clips.insert(position, clip);
        Ok(position)
    }

    pub fn remove_clip(&mut self, index: usize) -> Result<Box<dyn Audio>> {
        if index >= self.clips.len() {
            return Err(DawError::IndexOutOfRange {
                index,
                len: self.clips.len(),
            });
        }
        Ok(self.clips.remove(index))
    }

    pub fn clip(&self, index: usize) -> Option<&dyn Audio> {
        self.clips.get(index).map(|c| c.as_ref())
    }

    pub fn clips(&self) -> impl Iterator<Item = &dyn Audio> {
        self.clips.iter().map(|c| c.as_ref())
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Total length of all clips in seconds
    pub fn duration(&self) -> f64 {
        self.clips.iter().map(|c| c.duration()).sum()
    }

    /// Total number of samples across all clips
    pub fn sample_size(&self) -> usize {
        self.clips.iter().map(|c| c.sample_size()).sum()
    }

    /// Concatenate the clips and apply the track volume
    pub fn render(&self) -> Result<Vec<Sample>> {
        let mut output = Vec::with_capacity(self.sample_size());
        for clip in &self.clips {
            for i in 0..clip.sample_size() {
                output.push(clip.sample(i)? * self.volume);
            }
        }
        Ok(output)
    }

    /// Render into a stored buffer named after the track
    pub fn to_audio(&self) -> Result<FileAudio> {
        let samples = self.render()?;
        if samples.is_empty() {
            return Err(DawError::EmptyAudio);
        }
        let mut audio = FileAudio::from_samples(samples, self.sample_rate)?;
        audio.set_name(Some(self.name.clone()));
        Ok(audio)
    }
}
