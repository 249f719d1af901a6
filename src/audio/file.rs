//! Stored audio backed by a sample buffer

use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::audio::io::{self, AudioFormat, WavSpecOptions};
use crate::audio::{is_valid_sample_rate, write_tabbed, Audio, AudioHeader, Sample};
use crate::error::{DawError, Result};
use crate::factory::{AudioCreator, AudioFactory, Tokens};

/// Audio held in memory, loadable from and savable to TXT or WAV files
///
/// This is the only audio type whose samples can be modified in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileAudio {
    header: AudioHeader,
    samples: Vec<Sample>,
    file_name: Option<PathBuf>,
}

impl FileAudio {
    /// Load audio from a `.txt` or `.wav` file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut audio = Self::default();
        match AudioFormat::from_path(path)? {
            AudioFormat::Txt => audio.read_txt(path)?,
            AudioFormat::Wav => audio.read_wav(path)?,
        }
        Ok(audio)
    }

    /// Freeze any audio into a stored buffer
    pub fn from_audio(existing: &dyn Audio) -> Result<Self> {
        let mut header = AudioHeader::default();
        header.set_sample_rate(existing.sample_rate())?;
        header.set_duration(existing.duration())?;
        header.set_sample_size(existing.sample_size())?;
        header.name = existing.name().map(str::to_string);

        Ok(Self {
            samples: existing.samples()?,
            header,
            file_name: None,
        })
    }

    /// Build a buffer from raw samples; duration is `len / sample_rate`
    pub fn from_samples(samples: Vec<Sample>, sample_rate: f64) -> Result<Self> {
        let mut header = AudioHeader::default();
        header.set_sample_rate(sample_rate)?;
        header.set_sample_size(samples.len())?;
        header.set_duration(samples.len() as f64 / sample_rate)?;
        Ok(Self {
            header,
            samples,
            file_name: None,
        })
    }

    /// The file this audio was last read from, if any
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    /// Borrow the raw sample buffer
    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    /// Replace the contents with a TXT file
    pub fn read_txt(&mut self, path: &Path) -> Result<()> {
        let (header, samples) = io::read_txt(path)?;
        self.replace(header, samples, path);
        Ok(())
    }

    /// Replace the contents with the first channel of a WAV file
    pub fn read_wav(&mut self, path: &Path) -> Result<()> {
        let (header, samples) = io::read_wav(path)?;
        self.replace(header, samples, path);
        Ok(())
    }

    pub fn write_txt(&self, path: &Path) -> Result<()> {
        io::write_txt(path, &self.header, &self.samples)
    }

    pub fn write_wav(&self, path: &Path, options: WavSpecOptions) -> Result<()> {
        io::write_wav(path, self.header.sample_rate, &self.samples, options)
    }

    /// Save to `path`, choosing the format by extension
    pub fn save(&self, path: impl AsRef<Path>, options: WavSpecOptions) -> Result<()> {
        let path = path.as_ref();
        match AudioFormat::from_path(path)? {
            AudioFormat::Txt => self.write_txt(path),
            AudioFormat::Wav => self.write_wav(path, options),
        }
    }

    fn replace(&mut self, header: AudioHeader, samples: Vec<Sample>, path: &Path) {
        let name = self.header.name.take();
        self.header = header;
        self.header.name = name;
        self.samples = samples;
        self.file_name = Some(path.to_path_buf());
    }
}

impl Audio for FileAudio {
    fn header(&self) -> &AudioHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut AudioHeader {
        &mut self.header
    }

    fn kind(&self) -> &'static str {
        "FileAudio"
    }

    fn sample(&self, index: usize) -> Result<Sample> {
        self.samples
            .get(index)
            .copied()
            .ok_or(DawError::IndexOutOfRange {
                index,
                len: self.samples.len(),
            })
    }

    fn sample_mut(&mut self, index: usize) -> Result<&mut Sample> {
        let len = self.samples.len();
        self.samples
            .get_mut(index)
            .ok_or(DawError::IndexOutOfRange { index, len })
    }

    fn write_to(&self, out: &mut dyn Write) -> Result<()> {
        write_tabbed(self, out)
    }

    fn box_clone(&self) -> Box<dyn Audio> {
        Box::new(self.clone())
    }

    /// Resize the buffer to `size`; new samples are silent
    fn set_sample_size(&mut self, size: usize) -> Result<()> {
        self.header.set_sample_size(size)?;
        self.samples.resize(size, 0.0);
        if is_valid_sample_rate(self.header.sample_rate) {
            self.header.set_duration(size as f64 / self.header.sample_rate)?;
        }
        Ok(())
    }

    fn samples(&self) -> Result<Vec<Sample>> {
        Ok(self.samples.clone())
    }
}

/// Freeze `audio` and write it to `path`, format chosen by extension
pub fn export_audio(audio: &dyn Audio, path: &Path, options: WavSpecOptions) -> Result<()> {
    debug!("Exporting {} to {}", audio.kind(), path.display());
    FileAudio::from_audio(audio)?.save(path, options)
}

/// Builds [`FileAudio`] from `FILE <path>`
///
/// Relative paths resolve against the factory's base directory when set.
#[derive(Debug, Default)]
pub struct FileAudioCreator;

impl AudioCreator for FileAudioCreator {
    fn command(&self) -> &'static str {
        "FILE"
    }

    fn create(&self, tokens: &mut Tokens, factory: &AudioFactory) -> Result<Box<dyn Audio>> {
        let name = tokens.expect_word("file name")?;
        let path = factory.resolve_path(name);
        Ok(Box::new(FileAudio::from_path(path)?))
    }
}
