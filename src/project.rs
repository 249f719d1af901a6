//! Project Container
//!
//! A project owns a set of tracks sharing one sample rate. It can be mixed
//! down to a single buffer and persisted to a directory:
//!
//! ```text
//! project_dir/
//!   project.json            # Project manifest
//!   audio/
//!     track0_clip0.txt      # Every clip, frozen to lossless TXT
//!     track0_clip1.txt
//! ```

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::audio::io::format_txt;
use crate::audio::{Audio, FileAudio};
use crate::error::{DawError, Result};
use crate::track::Track;

/// Manifest file name inside a project directory
pub const MANIFEST_FILE: &str = "project.json";

/// Clip storage directory inside a project directory
pub const AUDIO_DIR: &str = "audio";

/// Sample rate used by [`Project::create_new`]
pub const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

const MANIFEST_VERSION: &str = "1.0";

/// Project manifest stored as JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProjectManifest {
    name: String,
    version: String,
    sample_rate: f64,
    created_at: String,
    modified_at: String,
    tracks: Vec<TrackManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TrackManifest {
    id: Uuid,
    name: String,
    volume: f64,
    pan: f64,
    muted: bool,
    soloed: bool,
    clips: Vec<ClipManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClipManifest {
    /// Path relative to the project directory
    path: PathBuf,
    /// SHA-256 of the clip file
    checksum: String,
    /// Audio kind the clip was frozen from
    kind: String,
    name: Option<String>,
}

/// A collection of tracks at one sample rate
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    sample_rate: f64,
    tracks: Vec<Track>,
    created_at: String,
    modified_at: String,
}

impl Project {
    /// Create a project with `track_amount` empty tracks named `Track 1..n`
    pub fn new(sample_rate: f64, track_amount: usize) -> Result<Self> {
        if !crate::audio::is_valid_sample_rate(sample_rate) {
            return Err(DawError::InvalidSampleRate { rate: sample_rate });
        }
        let tracks = (1..=track_amount)
            .map(|i| Track::new(format!("Track {}", i), sample_rate))
            .collect::<Result<Vec<_>>>()?;

        let timestamp = current_timestamp();
        Ok(Self {
            name: "Untitled".to_string(),
            sample_rate,
            tracks,
            created_at: timestamp.clone(),
            modified_at: timestamp,
        })
    }

    /// Create a named project at 44.1kHz with a single track
    pub fn create_new(name: &str) -> Result<Self> {
        let mut project = Self::new(DEFAULT_SAMPLE_RATE, 1)?;
        project.name = name.to_string();
        Ok(project)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// RFC 3339 creation timestamp
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// RFC 3339 timestamp of the last save
    pub fn modified_at(&self) -> &str {
        &self.modified_at
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> Result<&Track> {
        self.tracks
            .get(index)
            .ok_or(DawError::TrackNotFound { index })
    }

    pub fn track_mut(&mut self, index: usize) -> Result<&mut Track> {
        self.tracks
            .get_mut(index)
            .ok_or(DawError::TrackNotFound { index })
    }

    /// Append an empty track at the project rate; returns its index
    pub fn add_track(&mut self, name: impl Into<String>) -> Result<usize> {
        self.tracks.push(Track::new(name, self.sample_rate)?);
        Ok(self.tracks.len() - 1)
    }

    pub fn remove_track(&mut self, index: usize) -> Result<Track> {
        if index >= self.tracks.len() {
            return Err(DawError::TrackNotFound { index });
        }
        Ok(self.tracks.remove(index))
    }

    /// Tracks audible in a mixdown: soloed tracks if any, else unmuted ones
    pub fn audible_tracks(&self) -> impl Iterator<Item = &Track> {
        let any_solo = self.tracks.iter().any(|t| t.is_soloed());
        self.tracks
            .iter()
            .filter(move |t| if any_solo { t.is_soloed() } else { !t.is_muted() })
    }

    /// Sum every audible track into one buffer as long as the longest
    pub fn mixdown(&self) -> Result<FileAudio> {
        let mut mix: Vec<f64> = Vec::new();
        let mut played = 0;

        for track in self.audible_tracks() {
            let rendered = track.render()?;
            if rendered.len() > mix.len() {
                mix.resize(rendered.len(), 0.0);
            }
            for (out, sample) in mix.iter_mut().zip(rendered) {
                *out += sample;
            }
            played += 1;
        }

        if mix.is_empty() {
            return Err(DawError::EmptyAudio);
        }

        info!(
            "Mixed down {} track(s) of '{}' ({} samples)",
            played,
            self.name,
            mix.len()
        );

        let mut audio = FileAudio::from_samples(mix, self.sample_rate)?;
        audio.set_name(Some(self.name.clone()));
        Ok(audio)
    }

    /// Save the project state to `dir`
    ///
    /// Every clip is rendered before anything on disk changes. Clips and
    /// manifest are staged next to the live copies and renamed into place,
    /// so a failed save leaves the previous state loadable.
    pub fn save(&mut self, dir: &Path) -> Result<()> {
        let mut files = Vec::new();
        let mut tracks = Vec::with_capacity(self.tracks.len());
        for (t, track) in self.tracks.iter().enumerate() {
            let mut clips = Vec::with_capacity(track.clip_count());
            for (c, clip) in track.clips().enumerate() {
                let file_name = format!("track{}_clip{}.txt", t, c);
                let frozen = FileAudio::from_audio(clip)?;
                let mut bytes = Vec::new();
                format_txt(&mut bytes, frozen.header(), frozen.as_slice())?;

                clips.push(ClipManifest {
                    checksum: format!("{:x}", Sha256::digest(&bytes)),
                    path: Path::new(AUDIO_DIR).join(&file_name),
                    kind: clip.kind().to_string(),
                    name: clip.name().map(str::to_string),
                });
                files.push((file_name, bytes));
            }
            tracks.push(TrackManifest {
                id: track.id(),
                name: track.name().to_string(),
                volume: track.volume(),
                pan: track.pan(),
                muted: track.is_muted(),
                soloed: track.is_soloed(),
                clips,
            });
        }

        let modified_at = current_timestamp();
        let manifest = ProjectManifest {
            name: self.name.clone(),
            version: MANIFEST_VERSION.to_string(),
            sample_rate: self.sample_rate,
            created_at: self.created_at.clone(),
            modified_at: modified_at.clone(),
            tracks,
        };
        let manifest_json = serde_json::to_vec_pretty(&manifest)?;

        // Stage
        let audio_dir = dir.join(AUDIO_DIR);
        let staging_dir = dir.join(format!("{}.tmp", AUDIO_DIR));
        let old_dir = dir.join(format!("{}.old", AUDIO_DIR));
        let manifest_path = dir.join(MANIFEST_FILE);
        let staging_manifest = dir.join(format!("{}.tmp", MANIFEST_FILE));

        for stale in [&staging_dir, &old_dir] {
            if stale.exists() {
                fs::remove_dir_all(stale)?;
            }
        }
        fs::create_dir_all(&staging_dir)?;
        for (file_name, bytes) in &files {
            fs::write(staging_dir.join(file_name), bytes)?;
        }
        fs::write(&staging_manifest, &manifest_json)?;

        // Swap
        if audio_dir.exists() {
            fs::rename(&audio_dir, &old_dir)?;
        }
        fs::rename(&staging_dir, &audio_dir)?;
        fs::rename(&staging_manifest, &manifest_path)?;
        if old_dir.exists() {
            fs::remove_dir_all(&old_dir)?;
        }

        self.modified_at = modified_at;
        info!("Saved project '{}' to {}", self.name, dir.display());
        Ok(())
    }

    /// Load a project saved with [`Project::save`]
    pub fn load(dir: &Path) -> Result<Self> {
        let manifest_path = dir.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            return Err(DawError::FileNotFound {
                path: manifest_path,
                source: None,
            });
        }

        let file = File::open(&manifest_path)?;
        let manifest: ProjectManifest = serde_json::from_reader(BufReader::new(file))?;
        if manifest.version != MANIFEST_VERSION {
            warn!(
                "Project manifest version {} differs from {}",
                manifest.version, MANIFEST_VERSION
            );
        }

        let mut tracks = Vec::with_capacity(manifest.tracks.len());
        for entry in manifest.tracks {
            let mut track = Track::new(entry.name, manifest.sample_rate)?;
            track.set_id(entry.id);
            track.set_volume(entry.volume)?;
            track.set_pan(entry.pan);
            track.set_muted(entry.muted);
            track.set_soloed(entry.soloed);

            for clip in entry.clips {
                check_clip_path(&clip.path)?;
                let path = dir.join(&clip.path);
                if calculate_checksum(&path)? != clip.checksum {
                    return Err(DawError::ChecksumMismatch { path });
                }
                let mut audio = FileAudio::from_path(&path)?;
                audio.set_name(clip.name);
                track.add_clip(Box::new(audio))?;
            }
            tracks.push(track);
        }

        info!("Loaded project '{}' from {}", manifest.name, dir.display());
        Ok(Self {
            name: manifest.name,
            sample_rate: manifest.sample_rate,
            tracks,
            created_at: manifest.created_at,
            modified_at: manifest.modified_at,
        })
    }
}

/// Clip paths must stay inside the project directory
fn check_clip_path(path: &Path) -> Result<()> {
    let inside = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if path.as_os_str().is_empty() || !inside {
        return Err(DawError::invalid_param(
            "clip path",
            format!("{} is outside the project directory", path.display()),
        ));
    }
    Ok(())
}

/// SHA-256 checksum of a file as lowercase hex
fn calculate_checksum(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| DawError::FileNotFound {
        path: path.to_path_buf(),
        source: Some(e),
    })?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

fn current_timestamp() -> String {
    Utc::now().to_rfc3339()
}
