//! Audio file I/O
//!
//! Two on-disk formats are supported:
//! - TXT: a `duration rate size` header line followed by `size`
//!   whitespace-separated samples. Lossless, used for project clip storage.
//! - WAV: RIFF/WAVE via `hound`. Integer PCM (8/16/24/32-bit) and 32-bit
//!   float are read; only the first channel is kept. Files are written mono.

use std::fs;
use std::io::Write;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;

use crate::audio::{AudioHeader, Sample};
use crate::error::{DawError, Result};

/// File formats understood by [`crate::audio::FileAudio`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Txt,
    Wav,
}

impl AudioFormat {
    /// Pick the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| DawError::MissingExtension {
                path: path.to_path_buf(),
            })?;

        match extension.to_ascii_lowercase().as_str() {
            "txt" => Ok(AudioFormat::Txt),
            "wav" => Ok(AudioFormat::Wav),
            other => Err(DawError::UnsupportedFormat {
                format: format!("{} (file {})", other, path.display()),
            }),
        }
    }
}

/// WAV export configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpecOptions {
    /// Bit depth: 16, 24 (integer PCM) or 32 (float)
    pub bit_depth: u16,
}

impl Default for WavSpecOptions {
    fn default() -> Self {
        Self { bit_depth: 16 }
    }
}

impl WavSpecOptions {
    pub fn new(bit_depth: u16) -> Self {
        Self { bit_depth }
    }
}

fn wav_error(e: hound::Error) -> DawError {
    match e {
        hound::Error::IoError(io) => DawError::Io(io),
        other => DawError::InvalidAudio {
            reason: format!("WAV error: {}", other),
            source: Some(Box::new(other)),
        },
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(DawError::FileNotFound {
            path: path.to_path_buf(),
            source: None,
        });
    }
    Ok(())
}

// ============================================================================
// TXT
// ============================================================================

/// Parse TXT audio from a string
pub fn parse_txt(text: &str) -> Result<(AudioHeader, Vec<Sample>)> {
    let words: Vec<&str> = text.split_whitespace().collect();

    let field = |index: usize, what: &str| -> Result<String> {
        words
            .get(index)
            .map(|w| w.to_string())
            .ok_or_else(|| DawError::invalid_audio(format!("missing {}", what)))
    };
    let number = |word: &str, what: &str| -> Result<f64> {
        word.parse::<f64>()
            .map_err(|_| DawError::invalid_audio(format!("invalid {}: '{}'", what, word)))
    };

    let duration = number(&field(0, "duration")?, "duration")?;
    let rate = number(&field(1, "sample rate")?, "sample rate")?;
    let size_word = field(2, "sample size")?;
    let size = size_word.parse::<usize>().map_err(|_| {
        DawError::invalid_audio(format!("invalid sample size: '{}'", size_word))
    })?;

    let mut header = AudioHeader::default();
    header.set_duration(duration)?;
    header.set_sample_rate(rate)?;
    header.set_sample_size(size)?;

    // The header is untrusted; check it against the data before reading
    let body = &words[3..];
    if body.len() < size {
        return Err(DawError::invalid_audio(format!(
            "failed to read sample {} of {}: unexpected end of data",
            body.len(),
            size
        )));
    }
    let samples = body[..size]
        .iter()
        .map(|word| number(word, "sample"))
        .collect::<Result<Vec<_>>>()?;

    Ok((header, samples))
}

/// Read TXT audio from disk
pub fn read_txt(path: &Path) -> Result<(AudioHeader, Vec<Sample>)> {
    ensure_exists(path)?;
    let text = fs::read_to_string(path).map_err(|e| DawError::FileNotFound {
        path: path.to_path_buf(),
        source: Some(e),
    })?;
    debug!("Read TXT audio: {}", path.display());
    parse_txt(&text)
}

/// Write TXT audio to any writer
pub fn format_txt(out: &mut dyn Write, header: &AudioHeader, samples: &[Sample]) -> Result<()> {
    // The size is taken from the data so the file always reads back
    writeln!(
        out,
        "{} {} {}",
        header.duration,
        header.sample_rate,
        samples.len()
    )?;
    for (i, sample) in samples.iter().enumerate() {
        if i > 0 {
            write!(out, " ")?;
        }
        write!(out, "{}", sample)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Write TXT audio to disk
pub fn write_txt(path: &Path, header: &AudioHeader, samples: &[Sample]) -> Result<()> {
    let mut buffer = Vec::new();
    format_txt(&mut buffer, header, samples)?;
    fs::write(path, buffer)?;
    debug!("Wrote TXT audio: {} ({} samples)", path.display(), samples.len());
    Ok(())
}

// ============================================================================
// WAV
// ============================================================================

/// Read the first channel of a WAV file as normalised samples
pub fn read_wav(path: &Path) -> Result<(AudioHeader, Vec<Sample>)> {
    ensure_exists(path)?;

    let reader = WavReader::open(path).map_err(wav_error)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved = read_samples_as_f64(reader, spec.bits_per_sample, spec.sample_format)?;
    let samples: Vec<Sample> = interleaved.into_iter().step_by(channels).collect();

    if samples.is_empty() {
        return Err(DawError::EmptyAudio);
    }

    let mut header = AudioHeader::default();
    header.set_sample_rate(spec.sample_rate as f64)?;
    header.set_sample_size(samples.len())?;
    header.set_duration(samples.len() as f64 / spec.sample_rate as f64)?;

    debug!(
        "Read WAV audio: {} ({} frames, {} channel(s), {}-bit)",
        path.display(),
        samples.len(),
        channels,
        spec.bits_per_sample
    );

    Ok((header, samples))
}

/// Write mono samples to a WAV file
///
/// Samples are clamped to [-1.0, 1.0] before integer conversion.
pub fn write_wav(
    path: &Path,
    sample_rate: f64,
    samples: &[Sample],
    options: WavSpecOptions,
) -> Result<()> {
    let sample_format = match options.bit_depth {
        16 | 24 => SampleFormat::Int,
        32 => SampleFormat::Float,
        other => {
            return Err(DawError::UnsupportedFormat {
                format: format!("{}-bit audio (only 16, 24, 32 supported)", other),
            })
        }
    };

    let rate = sample_rate.round();
    if !(1.0..=u32::MAX as f64).contains(&rate) {
        return Err(DawError::InvalidSampleRate { rate: sample_rate });
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate: rate as u32,
        bits_per_sample: options.bit_depth,
        sample_format,
    };

    let mut writer = WavWriter::create(path, spec).map_err(wav_error)?;

    match options.bit_depth {
        16 => {
            for &sample in samples {
                let scaled = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
                writer.write_sample(scaled).map_err(wav_error)?;
            }
        }
        24 => {
            for &sample in samples {
                // 24-bit stored as i32 in hound
                let scaled = (sample.clamp(-1.0, 1.0) * 8_388_607.0) as i32;
                writer.write_sample(scaled).map_err(wav_error)?;
            }
        }
        _ => {
            for &sample in samples {
                writer
                    .write_sample(sample.clamp(-1.0, 1.0) as f32)
                    .map_err(wav_error)?;
            }
        }
    }

    writer.finalize().map_err(wav_error)?;
    debug!(
        "Wrote WAV audio: {} ({} samples, {}-bit)",
        path.display(),
        samples.len(),
        options.bit_depth
    );
    Ok(())
}

/// Read samples from a WAV reader and normalise to f64
fn read_samples_as_f64<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<Sample>> {
    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| v as f64))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(wav_error),
        SampleFormat::Int => {
            let scale = match bits_per_sample {
                8 => 128.0,
                16 => 32768.0,
                24 => 8_388_608.0,
                32 => 2_147_483_648.0,
                _ => {
                    return Err(DawError::UnsupportedFormat {
                        format: format!("{}-bit integer audio", bits_per_sample),
                    })
                }
            };
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(wav_error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;
    use test_case::test_case;

    #[test_case("song.txt", AudioFormat::Txt ; "lowercase txt")]
    #[test_case("SONG.TXT", AudioFormat::Txt ; "uppercase txt")]
    #[test_case("take.Wav", AudioFormat::Wav ; "mixed case wav")]
    fn test_format_from_path(name: &str, expected: AudioFormat) {
        assert_eq!(AudioFormat::from_path(Path::new(name)).unwrap(), expected);
    }

    #[test]
    fn test_format_errors() {
        assert!(matches!(
            AudioFormat::from_path(Path::new("noext")),
            Err(DawError::MissingExtension { .. })
        ));
        assert!(matches!(
            AudioFormat::from_path(Path::new("trailing.")),
            Err(DawError::MissingExtension { .. })
        ));
        assert!(matches!(
            AudioFormat::from_path(Path::new("track.mp3")),
            Err(DawError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_parse_txt() {
        let (header, samples) = parse_txt("15.5 17 3 1.5 2 4").unwrap();
        assert_eq!(header.duration, 15.5);
        assert_eq!(header.sample_rate, 17.0);
        assert_eq!(header.sample_size, 3);
        assert_eq!(samples, vec![1.5, 2.0, 4.0]);
    }

    #[test]
    fn test_parse_txt_truncated() {
        let err = parse_txt("1 4 4 0.1 0.2").unwrap_err();
        assert!(matches!(err, DawError::InvalidAudio { .. }));
    }

    #[test]
    fn test_parse_txt_invalid_header() {
        assert!(matches!(
            parse_txt("0 4 1 0.5").unwrap_err(),
            DawError::InvalidDuration { .. }
        ));
        assert!(matches!(
            parse_txt("1 4 2.5 0.5").unwrap_err(),
            DawError::InvalidAudio { .. }
        ));
    }

    #[test]
    fn test_parse_txt_oversized_header() {
        let err = parse_txt("1 4 1e20 0.5").unwrap_err();
        assert!(matches!(err, DawError::InvalidAudio { .. }));

        let err = parse_txt("1 4 18446744073709551615 0.5").unwrap_err();
        assert!(matches!(err, DawError::InvalidAudio { .. }));
    }

    #[test]
    fn test_txt_file_preserves_samples() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.txt");
        let header = AudioHeader::new(4.0, 1.0, 4).unwrap();
        let samples = vec![0.1, -0.25, 0.333333, 1.0];

        write_txt(&path, &header, &samples).unwrap();
        let (read_header, read_samples) = read_txt(&path).unwrap();

        assert_eq!(read_header.sample_size, 4);
        assert_eq!(read_samples, samples);
    }

    #[test]
    fn test_wav_16_bit_quantisation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples = vec![0.0, 0.5, -0.5, 2.0, -2.0];

        write_wav(&path, 8000.0, &samples, WavSpecOptions::default()).unwrap();
        let (header, read) = read_wav(&path).unwrap();

        assert_eq!(header.sample_rate, 8000.0);
        assert_eq!(header.sample_size, 5);
        assert_relative_eq!(header.duration, 5.0 / 8000.0);
        assert_relative_eq!(read[1], 0.5, epsilon = 1e-4);
        assert_relative_eq!(read[2], -0.5, epsilon = 1e-4);
        // Out-of-range samples are clamped on write
        assert_relative_eq!(read[3], 32767.0 / 32768.0, epsilon = 1e-9);
        assert_relative_eq!(read[4], -32767.0 / 32768.0, epsilon = 1e-9);
    }

    #[test]
    fn test_wav_float_and_24_bit() {
        let dir = tempdir().unwrap();
        for depth in [24u16, 32] {
            let path = dir.path().join(format!("tone{}.wav", depth));
            write_wav(&path, 44100.0, &[0.25, -0.75], WavSpecOptions::new(depth)).unwrap();
            let (_, read) = read_wav(&path).unwrap();
            assert_relative_eq!(read[0], 0.25, epsilon = 1e-6);
            assert_relative_eq!(read[1], -0.75, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_wav_unsupported_depth() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.wav");
        let err = write_wav(&path, 8000.0, &[0.0], WavSpecOptions::new(12)).unwrap_err();
        assert!(matches!(err, DawError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_wav_rejects_rate_below_one_hz() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slow.wav");
        let err = write_wav(&path, 0.4, &[0.1, 0.2], WavSpecOptions::default()).unwrap_err();
        assert!(matches!(err, DawError::InvalidSampleRate { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_wav_stereo_keeps_first_channel() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for (left, right) in [(16384i16, -100i16), (-16384, 100), (0, 5)] {
            writer.write_sample(left).unwrap();
            writer.write_sample(right).unwrap();
        }
        writer.finalize().unwrap();

        let (header, samples) = read_wav(&path).unwrap();
        assert_eq!(header.sample_size, 3);
        assert_eq!(samples, vec![0.5, -0.5, 0.0]);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_wav(Path::new("/nonexistent/none.wav")).unwrap_err();
        assert!(matches!(err, DawError::FileNotFound { .. }));
    }
}
