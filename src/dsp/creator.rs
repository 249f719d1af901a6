//! Effect creator for the command language

use log::debug;

use crate::audio::Audio;
use crate::dsp::{Amplify, Effect, FadeIn, FadeOut, Normalize};
use crate::error::{DawError, Result};
use crate::factory::{AudioCreator, AudioFactory, Tokens};

/// Builds effects from `EFCT <type> <params...> <audio>`
///
/// | type   | params              |
/// |--------|---------------------|
/// | `AMPL` | `<factor>`          |
/// | `NORM` | `<target>`          |
/// | `FDIN` | `<duration> <rate>` |
/// | `FOUT` | `<duration> <rate>` |
#[derive(Debug, Default)]
pub struct EffectCreator;

impl AudioCreator for EffectCreator {
    fn command(&self) -> &'static str {
        "EFCT"
    }

    fn create(&self, tokens: &mut Tokens, factory: &AudioFactory) -> Result<Box<dyn Audio>> {
        let effect_type = tokens.expect_word("effect type")?;
        debug!("Building {} effect", effect_type);

        match effect_type.as_str() {
            "AMPL" => {
                let factor: f64 = tokens.parse("amplify factor")?;
                let base = factory.create_audio(tokens)?;
                Ok(Box::new(Effect::wrap(base, Amplify::new(factor))?))
            }
            "NORM" => {
                let target: f64 = tokens.parse("normalize target amplitude")?;
                let base = factory.create_audio(tokens)?;
                let op = Normalize::analyze(base.as_ref(), target)?;
                Ok(Box::new(Effect::wrap(base, op)?))
            }
            "FDIN" => {
                let duration: f64 = tokens.parse("fade-in duration")?;
                let rate: f64 = tokens.parse("fade-in sample rate")?;
                let base = factory.create_audio(tokens)?;
                Ok(Box::new(Effect::wrap(base, FadeIn::new(duration, rate))?))
            }
            "FOUT" => {
                let duration: f64 = tokens.parse("fade-out duration")?;
                let rate: f64 = tokens.parse("fade-out sample rate")?;
                let base = factory.create_audio(tokens)?;
                Ok(Box::new(Effect::wrap(base, FadeOut::new(duration, rate))?))
            }
            _ => {
                tokens.skip_line();
                Err(DawError::UnknownEffect {
                    effect: effect_type,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_amplify_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("SONG.txt"), "15.5 17 3 1.5 2 4").unwrap();
        let factory = AudioFactory::with_defaults().with_base_dir(dir.path());

        let audio = factory.create_from_str("EFCT AMPL 2 FILE SONG.txt").unwrap();

        assert_eq!(audio.kind(), "Effect");
        assert_eq!(audio.duration(), 15.5);
        assert_eq!(audio.samples().unwrap(), vec![3.0, 4.0, 8.0]);
    }

    #[test]
    fn test_normalize_nested_effect() {
        let factory = AudioFactory::with_defaults();
        let audio = factory
            .create_from_str("EFCT NORM 0.5 EFCT AMPL 3 SINE 1 4 1")
            .unwrap();
        assert_relative_eq!(audio.peak().unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_fades() {
        let factory = AudioFactory::with_defaults();
        let fade_in = factory.create_from_str("EFCT FDIN 1 4 SINE 1 4 2").unwrap();
        assert_relative_eq!(fade_in.sample(1).unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(fade_in.sample(5).unwrap(), 1.0, epsilon = 1e-12);

        let fade_out = factory.create_from_str("EFCT FOUT 1 4 SINE 1 4 2").unwrap();
        assert_relative_eq!(fade_out.sample(1).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(fade_out.sample(5).unwrap(), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_effect_skips_line() {
        let factory = AudioFactory::with_defaults();
        let mut tokens = Tokens::new("EFCT ECHO 3 SLNC 1 1 1\nSLNC 1 2 2");

        let err = factory.create_audio(&mut tokens).unwrap_err();
        assert!(matches!(err, DawError::UnknownEffect { ref effect } if effect == "ECHO"));

        let next = factory.create_audio(&mut tokens).unwrap();
        assert_eq!(next.sample_size(), 2);
    }

    #[test]
    fn test_missing_parameters() {
        let factory = AudioFactory::with_defaults();
        assert!(matches!(
            factory.create_from_str("EFCT AMPL").unwrap_err(),
            DawError::MissingToken { .. }
        ));
        assert!(matches!(
            factory.create_from_str("EFCT FDIN 1 x SLNC 1 1 1").unwrap_err(),
            DawError::InvalidToken { .. }
        ));
        assert!(matches!(
            factory.create_from_str("EFCT AMPL 2").unwrap_err(),
            DawError::MissingToken { .. }
        ));
    }
}
