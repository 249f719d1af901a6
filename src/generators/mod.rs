//! Generated audio
//!
//! [`GeneratorAudio`] stores no samples: each read asks its [`Generator`]
//! for the value at that index.

mod mix;
mod repeat;
mod sine;

use std::io::Write;

use crate::audio::{Audio, AudioHeader, Sample};
use crate::error::Result;

pub use mix::{MixCreator, MixGenerator};
pub use repeat::{RepeatCreator, RepeatGenerator};
pub use sine::{SineCreator, SineGenerator};

/// Produces the sample at a given index
pub trait Generator: Clone + Send + Sync + 'static {
    fn generate(&self, index: usize) -> Result<Sample>;

    /// Name shown when the audio is printed
    fn name(&self) -> &'static str;
}

/// Audio whose samples come from a [`Generator`]
///
/// Reads past the end yield 0.0. Generated audio is read-only.
#[derive(Debug, Clone)]
pub struct GeneratorAudio<G: Generator> {
    header: AudioHeader,
    generator: G,
}

impl<G: Generator> GeneratorAudio<G> {
    /// Create generated audio of `floor(rate * duration)` samples
    pub fn new(rate: f64, duration: f64, generator: G) -> Result<Self> {
        let mut header = AudioHeader::default();
        header.set_sample_rate(rate)?;
        header.set_duration(duration)?;
        header.set_sample_size((rate * duration).floor() as usize)?;
        Ok(Self { header, generator })
    }

    /// Create generated audio of exactly `size` samples
    pub fn with_sample_size(rate: f64, size: usize, generator: G) -> Result<Self> {
        let mut header = AudioHeader::default();
        header.set_sample_rate(rate)?;
        header.set_sample_size(size)?;
        header.set_duration(size as f64 / rate)?;
        Ok(Self { header, generator })
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }
}

impl<G: Generator> Audio for GeneratorAudio<G> {
    fn header(&self) -> &AudioHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut AudioHeader {
        &mut self.header
    }

    fn kind(&self) -> &'static str {
        "GeneratorAudio"
    }

    fn sample(&self, index: usize) -> Result<Sample> {
        if index < self.header.sample_size {
            self.generator.generate(index)
        } else {
            Ok(0.0)
        }
    }

    fn write_to(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(
            out,
            "GeneratorAudio: {} samples @ {}Hz, Generated by: {}",
            self.header.sample_size,
            self.header.sample_rate,
            self.generator.name()
        )?;
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn Audio> {
        Box::new(self.clone())
    }
}
