//! DAW - Composable Audio Processing Library
//!
//! Audio is built from small objects that all implement the [`audio::Audio`]
//! trait:
//! - Stored audio: [`audio::FileAudio`] (TXT/WAV) and [`audio::Silence`]
//! - Generated audio: sine, mix and repeat via [`generators::GeneratorAudio`]
//! - Processed audio: amplify, normalize and fades via [`dsp::Effect`]
//!
//! Objects can be built in code or from a whitespace-separated command
//! language through [`factory::AudioFactory`]. Clips are arranged on
//! [`track::Track`]s inside a [`project::Project`], which mixes down and
//! persists to disk.

pub mod audio;
pub mod cli;
pub mod config;
pub mod dsp;
pub mod error;
pub mod factory;
pub mod generators;
pub mod project;
pub mod track;

pub use error::{DawError, Result};
