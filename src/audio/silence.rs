//! Silent audio segments

use std::io::Write;

use crate::audio::{Audio, AudioHeader, Sample};
use crate::error::Result;
use crate::factory::{AudioCreator, AudioFactory, Tokens};

/// A segment of audio where every sample is 0.0
#[derive(Debug, Clone, PartialEq)]
pub struct Silence {
    header: AudioHeader,
}

impl Silence {
    /// Create silence with an explicit sample count
    pub fn new(duration: f64, sample_rate: f64, sample_size: usize) -> Result<Self> {
        Ok(Self {
            header: AudioHeader::new(sample_rate, duration, sample_size)?,
        })
    }

    /// Create silence sized to `floor(duration * sample_rate)` samples
    pub fn from_duration(duration: f64, sample_rate: f64) -> Result<Self> {
        let size = (duration * sample_rate).floor() as usize;
        Self::new(duration, sample_rate, size)
    }
}

impl Audio for Silence {
    fn header(&self) -> &AudioHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut AudioHeader {
        &mut self.header
    }

    fn kind(&self) -> &'static str {
        "Silence"
    }

    fn sample(&self, _index: usize) -> Result<Sample> {
        Ok(0.0)
    }

    fn write_to(&self, out: &mut dyn Write) -> Result<()> {
        write!(
            out,
            "{} {} {} ",
            self.header.duration, self.header.sample_rate, self.header.sample_size
        )?;
        for _ in 0..self.header.sample_size {
            write!(out, "0 ")?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn Audio> {
        Box::new(self.clone())
    }
}

/// Builds [`Silence`] from `SLNC <duration> <rate> <size>`
#[derive(Debug, Default)]
pub struct SilenceCreator;

impl AudioCreator for SilenceCreator {
    fn command(&self) -> &'static str {
        "SLNC"
    }

    fn create(&self, tokens: &mut Tokens, _factory: &AudioFactory) -> Result<Box<dyn Audio>> {
        let duration: f64 = tokens.parse("silence duration")?;
        let rate: f64 = tokens.parse("silence sample rate")?;
        let size: usize = tokens.parse("silence sample size")?;
        Ok(Box::new(Silence::new(duration, rate, size)?))
    }
}
