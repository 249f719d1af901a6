//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use log::{info, warn};

use crate::audio::{Audio, FileAudio};
use crate::config::DawConfig;
use crate::error::{DawError, Result};
use crate::factory::AudioFactory;
use crate::project::Project;
use crate::track::Track;

/// Evaluate a script and print or save the results.
pub fn render(script: &Path, output: Option<&Path>, keep_going: bool, config: &DawConfig) -> Result<()> {
    let (text, factory) = if script == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        (text, AudioFactory::with_defaults())
    } else {
        info!("Rendering script: {}", script.display());
        let text = fs::read_to_string(script).map_err(|e| DawError::FileNotFound {
            path: script.to_path_buf(),
            source: Some(e),
        })?;
        let factory = match script.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => AudioFactory::with_defaults().with_base_dir(dir),
            None => AudioFactory::with_defaults(),
        };
        (text, factory)
    };

    let results = if keep_going {
        let mut results = Vec::new();
        let mut failed = 0;
        for result in factory.create_all_lenient(&text) {
            match result {
                Ok(audio) => results.push(audio),
                Err(_) => failed += 1,
            }
        }
        if failed > 0 {
            warn!("{} expression(s) failed", failed);
        }
        results
    } else {
        factory.create_all(&text)?
    };

    match output {
        Some(path) => {
            let first = results.first().ok_or(DawError::EmptyAudio)?;
            let mut track = Track::new("Render", first.sample_rate())?;
            for audio in results {
                track.add_clip(audio)?;
            }
            let rendered = track.to_audio()?;
            rendered.save(path, config.wav_options())?;
            println!(
                "Rendered {} clip(s), {} samples @ {}Hz to {}",
                track.clip_count(),
                rendered.sample_size(),
                rendered.sample_rate(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for audio in &results {
                audio.write_to(&mut out)?;
            }
        }
    }

    Ok(())
}

/// Print the header of an audio file.
pub fn show_info(path: &Path) -> Result<()> {
    let audio = FileAudio::from_path(path)?;
    println!("File: {}", path.display());
    println!("Sample rate: {} Hz", audio.sample_rate());
    println!("Duration: {} s", audio.duration());
    println!("Samples: {}", audio.sample_size());
    println!("Peak: {:.6}", audio.peak()?);
    Ok(())
}

/// Convert an audio file to the format of `output`.
pub fn convert(input: &Path, output: &Path, config: &DawConfig) -> Result<()> {
    info!("Converting {} -> {}", input.display(), output.display());

    let audio = FileAudio::from_path(input)?;
    audio.save(output, config.wav_options())?;

    println!("Converted: {} -> {}", input.display(), output.display());
    Ok(())
}

/// Create a new project directory.
pub fn create_project(
    path: &Path,
    name: Option<&str>,
    rate: Option<f64>,
    tracks: Option<usize>,
    config: &DawConfig,
) -> Result<()> {
    info!("Creating new project at: {}", path.display());

    if path.join(crate::project::MANIFEST_FILE).exists() {
        return Err(DawError::invalid_param(
            "path",
            format!("{} already contains a project", path.display()),
        ));
    }

    let rate = rate.unwrap_or(config.default_sample_rate);
    let tracks = tracks.unwrap_or(config.default_track_count);
    let mut project = Project::new(rate, tracks)?;
    if let Some(name) = name {
        project.set_name(name);
    }

    fs::create_dir_all(path)?;
    project.save(path)?;

    println!("Project created: {}", path.display());
    println!("Sample rate: {} Hz, tracks: {}", rate, tracks);
    Ok(())
}

/// Append a clip to one of a project's tracks.
pub fn add_clip(path: &Path, track: usize, expression: &[String]) -> Result<()> {
    let expression = expression.join(" ");
    info!("Adding clip to track {} of {}: {}", track, path.display(), expression);

    let mut project = Project::load(path)?;
    let factory = AudioFactory::with_defaults().with_base_dir(path);
    let audio = factory.create_from_str(&expression)?;
    let samples = audio.sample_size();

    let index = project.track_mut(track)?.add_clip(audio)?;
    project.save(path)?;

    println!("Added clip {} ({} samples) to track {}", index, samples, track);
    Ok(())
}

/// Mix a project down to a file.
pub fn mixdown(path: &Path, output: &Path, config: &DawConfig) -> Result<()> {
    info!("Mixing down project: {}", path.display());

    let project = Project::load(path)?;
    let mix = project.mixdown()?;
    mix.save(output, config.wav_options())?;

    println!(
        "Mixdown written: {} ({} samples, peak {:.6})",
        output.display(),
        mix.sample_size(),
        mix.peak()?
    );
    Ok(())
}

/// Print a project's tracks and clips.
pub fn show_project(path: &Path) -> Result<()> {
    let project = Project::load(path)?;

    println!("=== Project: {} ===", project.name());
    println!("Sample rate: {} Hz", project.sample_rate());
    println!("Created: {}", project.created_at());
    println!("Modified: {}", project.modified_at());
    println!();

    for (i, track) in project.tracks().iter().enumerate() {
        let mut flags = Vec::new();
        if track.is_muted() {
            flags.push("muted");
        }
        if track.is_soloed() {
            flags.push("solo");
        }
        println!(
            "[{}] {} (vol {:.2}, pan {:+.2}){}{}",
            i,
            track.name(),
            track.volume(),
            track.pan(),
            if flags.is_empty() { "" } else { " " },
            flags.join(", ")
        );
        for (c, clip) in track.clips().enumerate() {
            println!(
                "    clip {}: {} samples, {:.3} s{}",
                c,
                clip.sample_size(),
                clip.duration(),
                clip.name().map(|n| format!(" ({})", n)).unwrap_or_default()
            );
        }
        if track.clip_count() == 0 {
            println!("    (empty)");
        }
    }

    Ok(())
}
