//! DAW CLI - Audio Processing Tool
//!
//! Command-line interface for the DAW audio library.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use daw::cli::{commands, Cli, Commands};
use daw::config::DawConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = DawConfig::load_or_default(cli.config.as_deref())
        .with_context(|| format!("failed to load config {:?}", cli.config))?;

    // Initialize logger
    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    info!("DAW CLI v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd, &config),
        None => {
            println!("DAW CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, config: &DawConfig) -> Result<()> {
    match cmd {
        Commands::Render {
            script,
            output,
            keep_going,
        } => commands::render(&script, output.as_deref(), keep_going, config)
            .with_context(|| format!("failed to render {}", script.display())),
        Commands::Info { path } => commands::show_info(&path)
            .with_context(|| format!("failed to read {}", path.display())),
        Commands::Convert { input, output } => commands::convert(&input, &output, config)
            .with_context(|| format!("failed to convert {}", input.display())),
        Commands::CreateProject {
            path,
            name,
            rate,
            tracks,
        } => commands::create_project(&path, name.as_deref(), rate, tracks, config)
            .with_context(|| format!("failed to create project {}", path.display())),
        Commands::AddClip {
            path,
            track,
            expression,
        } => commands::add_clip(&path, track, &expression)
            .with_context(|| format!("failed to add clip to {}", path.display())),
        Commands::Mixdown { path, output } => commands::mixdown(&path, &output, config)
            .with_context(|| format!("failed to mix down {}", path.display())),
        Commands::ShowProject { path } => commands::show_project(&path)
            .with_context(|| format!("failed to load project {}", path.display())),
    }
}
