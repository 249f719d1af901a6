//! Runtime configuration
//!
//! Settings are read from an optional JSON file. Any field left out of the
//! file keeps its default.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::audio::WavSpecOptions;
use crate::error::{DawError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DawConfig {
    /// Sample rate for new projects
    pub default_sample_rate: f64,
    /// Bit depth used when writing WAV files
    pub wav_bit_depth: u16,
    /// Number of tracks in a new project
    pub default_track_count: usize,
    /// Default `env_logger` filter
    pub log_level: String,
}

impl Default for DawConfig {
    fn default() -> Self {
        Self {
            default_sample_rate: 44100.0,
            wav_bit_depth: 16,
            default_track_count: 1,
            log_level: "info".to_string(),
        }
    }
}

impl DawConfig {
    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| DawError::FileNotFound {
            path: path.to_path_buf(),
            source: Some(e),
        })?;
        let config: DawConfig = serde_json::from_str(&text)?;
        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Read `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn wav_options(&self) -> WavSpecOptions {
        WavSpecOptions::new(self.wav_bit_depth)
    }

    fn validate(&self) -> Result<()> {
        if !crate::audio::is_valid_sample_rate(self.default_sample_rate) {
            return Err(DawError::InvalidSampleRate {
                rate: self.default_sample_rate,
            });
        }
        if !matches!(self.wav_bit_depth, 16 | 24 | 32) {
            return Err(DawError::invalid_param(
                "wav_bit_depth",
                format!("{} is not one of 16, 24, 32", self.wav_bit_depth),
            ));
        }
        Ok(())
    }
}
