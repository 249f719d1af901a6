//! CLI Module
//!
//! Command-line interface for rendering audio scripts and managing projects.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DAW command-line tool
#[derive(Parser, Debug)]
#[command(name = "daw-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate an audio script
    #[command(name = "render")]
    Render {
        /// Script file, or `-` for stdin
        script: PathBuf,

        /// Concatenate the results and save them here (.txt or .wav)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip expressions that fail instead of stopping
        #[arg(long)]
        keep_going: bool,
    },

    /// Print the header of an audio file
    #[command(name = "info")]
    Info {
        /// Audio file (.txt or .wav)
        path: PathBuf,
    },

    /// Convert between TXT and WAV
    #[command(name = "convert")]
    Convert {
        /// Input audio file
        input: PathBuf,

        /// Output audio file
        output: PathBuf,
    },

    /// Create a new project directory
    #[command(name = "create-project")]
    CreateProject {
        /// Path for the new project
        path: PathBuf,

        /// Project name
        #[arg(short, long)]
        name: Option<String>,

        /// Sample rate in Hz
        #[arg(short, long)]
        rate: Option<f64>,

        /// Number of empty tracks
        #[arg(short, long)]
        tracks: Option<usize>,
    },

    /// Append a clip built from an expression to a track
    #[command(name = "add-clip")]
    AddClip {
        /// Path to the project
        path: PathBuf,

        /// Track index (0-based)
        #[arg(short, long)]
        track: usize,

        /// Audio expression, e.g. `SINE 440 44100 1`
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        expression: Vec<String>,
    },

    /// Mix a project down to a single file
    #[command(name = "mixdown")]
    Mixdown {
        /// Path to the project
        path: PathBuf,

        /// Output audio file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print a project's tracks and clips
    #[command(name = "show-project")]
    ShowProject {
        /// Path to the project
        path: PathBuf,
    },
}
