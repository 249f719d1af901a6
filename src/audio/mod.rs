//! Core audio abstraction
//!
//! Every audio object, whether stored, generated or processed, exposes an
//! [`AudioHeader`] and indexed sample access through the [`Audio`] trait.
//! Samples are mono 64-bit floats.

mod file;
pub mod io;
mod silence;

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{DawError, Result};

pub use file::{export_audio, FileAudio, FileAudioCreator};
pub use io::WavSpecOptions;
pub use silence::{Silence, SilenceCreator};

/// A single mono sample
pub type Sample = f64;

// ============================================================================
// Validation
// ============================================================================

/// A sample rate is valid when strictly positive
#[inline]
pub fn is_valid_sample_rate(rate: f64) -> bool {
    rate > 0.0
}

/// A duration is valid when strictly positive
#[inline]
pub fn is_valid_duration(duration: f64) -> bool {
    duration > 0.0
}

/// A sample size is valid when at least one sample is present
#[inline]
pub fn is_valid_sample_size(size: usize) -> bool {
    size > 0
}

// ============================================================================
// Audio Header
// ============================================================================

/// Shared metadata carried by every audio object
///
/// The default header is all zeros: the "unset" state an audio object is in
/// before its setters have run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioHeader {
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Duration in seconds
    pub duration: f64,
    /// Number of samples
    pub sample_size: usize,
    /// Optional display name
    pub name: Option<String>,
}

impl AudioHeader {
    /// Build a header, validating all three values
    pub fn new(sample_rate: f64, duration: f64, sample_size: usize) -> Result<Self> {
        let mut header = Self::default();
        header.set_sample_rate(sample_rate)?;
        header.set_duration(duration)?;
        header.set_sample_size(sample_size)?;
        Ok(header)
    }

    /// Set the duration; fails without modification if not positive
    pub fn set_duration(&mut self, duration: f64) -> Result<()> {
        if !is_valid_duration(duration) {
            return Err(DawError::InvalidDuration { duration });
        }
        self.duration = duration;
        Ok(())
    }

    /// Set the sample rate; fails without modification if not positive
    pub fn set_sample_rate(&mut self, rate: f64) -> Result<()> {
        if !is_valid_sample_rate(rate) {
            return Err(DawError::InvalidSampleRate { rate });
        }
        self.sample_rate = rate;
        Ok(())
    }

    /// Set the sample count; fails without modification if zero
    pub fn set_sample_size(&mut self, size: usize) -> Result<()> {
        if !is_valid_sample_size(size) {
            return Err(DawError::InvalidSampleSize { size });
        }
        self.sample_size = size;
        Ok(())
    }
}

// ============================================================================
// Audio Trait
// ============================================================================

/// Base trait for all audio objects
///
/// Read access is available on every type. Write access through
/// [`Audio::sample_mut`] is only supported by stored audio; generated and
/// processed audio reject it with [`DawError::ImmutableAudio`].
pub trait Audio: Send + Sync {
    /// Header with rate, duration, size and name
    fn header(&self) -> &AudioHeader;

    /// Mutable header access for the provided setters
    fn header_mut(&mut self) -> &mut AudioHeader;

    /// Stable type tag used in logs and error messages
    fn kind(&self) -> &'static str;

    /// Read the sample at `index`
    fn sample(&self, index: usize) -> Result<Sample>;

    /// Get a mutable reference to the sample at `index`
    fn sample_mut(&mut self, _index: usize) -> Result<&mut Sample> {
        Err(DawError::ImmutableAudio { kind: self.kind() })
    }

    /// Print this audio in its textual dump format
    fn write_to(&self, out: &mut dyn Write) -> Result<()>;

    /// Clone the audio into a boxed trait object
    fn box_clone(&self) -> Box<dyn Audio>;

    fn sample_rate(&self) -> f64 {
        self.header().sample_rate
    }

    fn duration(&self) -> f64 {
        self.header().duration
    }

    fn sample_size(&self) -> usize {
        self.header().sample_size
    }

    fn name(&self) -> Option<&str> {
        self.header().name.as_deref()
    }

    fn set_sample_rate(&mut self, rate: f64) -> Result<()> {
        self.header_mut().set_sample_rate(rate)
    }

    fn set_duration(&mut self, duration: f64) -> Result<()> {
        self.header_mut().set_duration(duration)
    }

    fn set_sample_size(&mut self, size: usize) -> Result<()> {
        self.header_mut().set_sample_size(size)
    }

    fn set_name(&mut self, name: Option<String>) {
        self.header_mut().name = name;
    }

    /// Duration, sample rate and sample size, one per line
    fn describe(&self) -> String {
        format!(
            "{}\n{}\n{}\n",
            self.duration(),
            self.sample_rate(),
            self.sample_size()
        )
    }

    /// Render every sample in `0..sample_size`
    fn samples(&self) -> Result<Vec<Sample>> {
        (0..self.sample_size()).map(|i| self.sample(i)).collect()
    }

    /// Largest absolute sample value
    fn peak(&self) -> Result<Sample> {
        let mut peak: Sample = 0.0;
        for i in 0..self.sample_size() {
            peak = peak.max(self.sample(i)?.abs());
        }
        Ok(peak)
    }
}

impl Clone for Box<dyn Audio> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

impl fmt::Debug for dyn Audio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.kind())
            .field("header", self.header())
            .finish()
    }
}

/// Shared dump format for stored and processed audio:
/// `duration<TAB>rate<TAB>size<TAB>s0 s1 ... sN`
pub(crate) fn write_tabbed(audio: &dyn Audio, out: &mut dyn Write) -> Result<()> {
    write!(
        out,
        "{}\t{}\t{}\t",
        audio.duration(),
        audio.sample_rate(),
        audio.sample_size()
    )?;
    for i in 0..audio.sample_size() {
        if i > 0 {
            write!(out, " ")?;
        }
        write!(out, "{}", audio.sample(i)?)?;
    }
    writeln!(out)?;
    Ok(())
}
