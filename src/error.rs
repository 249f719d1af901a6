//! Error handling for the DAW library
//!
//! Every fallible operation returns [`DawError`] through the crate-wide
//! [`Result`] alias.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for DAW operations
pub type Result<T> = std::result::Result<T, DawError>;

/// Main error type for DAW operations
#[derive(Error, Debug)]
pub enum DawError {
    // Header Validation Errors
    #[error("Invalid sample rate: {rate} (must be > 0)")]
    InvalidSampleRate { rate: f64 },

    #[error("Invalid duration: {duration}s (must be > 0)")]
    InvalidDuration { duration: f64 },

    #[error("Invalid sample size: {size} (must be > 0)")]
    InvalidSampleSize { size: usize },

    // Sample Access Errors
    #[error("Sample index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{kind} does not support sample modification")]
    ImmutableAudio { kind: &'static str },

    // Command Language Errors
    #[error("Could not find an audio creator for command '{command}'")]
    UnknownCommand { command: String },

    #[error("Unknown effect type: {effect}")]
    UnknownEffect { effect: String },

    #[error("Unexpected end of input: expected {expected}")]
    MissingToken { expected: String },

    #[error("Invalid {expected}: '{found}'")]
    InvalidToken { expected: String, found: String },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("File name has no extension: {path}")]
    MissingExtension { path: PathBuf },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Audio contains no samples")]
    EmptyAudio,

    // Composition Errors
    #[error("Sample rate mismatch: expected {expected}Hz, found {found}Hz")]
    SampleRateMismatch { expected: f64, found: f64 },

    #[error("Track not found: {index}")]
    TrackNotFound { index: usize },

    #[error("Checksum mismatch for clip file: {path}")]
    ChecksumMismatch { path: PathBuf },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DawError {
    /// Shorthand for an [`DawError::InvalidAudio`] without an underlying cause
    pub fn invalid_audio(reason: impl Into<String>) -> Self {
        DawError::InvalidAudio {
            reason: reason.into(),
            source: None,
        }
    }

    /// Shorthand for an [`DawError::InvalidParameter`]
    pub fn invalid_param(name: impl Into<String>, reason: impl Into<String>) -> Self {
        DawError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            DawError::InvalidSampleRate { .. } => "INVALID_SAMPLE_RATE",
            DawError::InvalidDuration { .. } => "INVALID_DURATION",
            DawError::InvalidSampleSize { .. } => "INVALID_SAMPLE_SIZE",
            DawError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            DawError::ImmutableAudio { .. } => "IMMUTABLE_AUDIO",
            DawError::UnknownCommand { .. } => "UNKNOWN_COMMAND",
            DawError::UnknownEffect { .. } => "UNKNOWN_EFFECT",
            DawError::MissingToken { .. } => "MISSING_TOKEN",
            DawError::InvalidToken { .. } => "INVALID_TOKEN",
            DawError::InvalidParameter { .. } => "INVALID_PARAMETER",
            DawError::FileNotFound { .. } => "FILE_NOT_FOUND",
            DawError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            DawError::MissingExtension { .. } => "MISSING_EXTENSION",
            DawError::InvalidAudio { .. } => "INVALID_AUDIO",
            DawError::EmptyAudio => "EMPTY_AUDIO",
            DawError::SampleRateMismatch { .. } => "SAMPLE_RATE_MISMATCH",
            DawError::TrackNotFound { .. } => "TRACK_NOT_FOUND",
            DawError::ChecksumMismatch { .. } => "CHECKSUM_MISMATCH",
            DawError::Io(_) => "IO_ERROR",
            DawError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if a batch run may continue past this error
    ///
    /// Errors caused by one bad expression or one bad file are recoverable;
    /// I/O and serialization failures are not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DawError::Io(_) | DawError::Serialization(_))
    }
}
