//! Audio Factory
//!
//! Builds audio objects from a whitespace-separated command language. The
//! first word of an expression names a registered [`AudioCreator`]; the
//! creator reads its own parameters and, for effects and generators,
//! recurses into the factory for the audio it wraps.
//!
//! ```text
//! SLNC <duration> <rate> <size>
//! FILE <path>
//! SINE <frequency> <rate> <duration>
//! EFCT AMPL <factor> <audio>
//! EFCT NORM <target> <audio>
//! EFCT FDIN <duration> <rate> <audio>
//! EFCT FOUT <duration> <rate> <audio>
//! MIXG <count> <audio>...
//! REPT <times> <audio>
//! ```

mod tokens;

use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::audio::{Audio, FileAudioCreator, SilenceCreator};
use crate::dsp::EffectCreator;
use crate::error::{DawError, Result};
use crate::generators::{MixCreator, RepeatCreator, SineCreator};

pub use tokens::Tokens;

/// Deepest expression nesting `create_audio` accepts
pub const MAX_NESTING: usize = 128;

/// Builds one kind of audio from the command language
pub trait AudioCreator: Send + Sync {
    /// Command word this creator handles
    fn command(&self) -> &'static str;

    /// Check if this creator handles `command`
    fn supports(&self, command: &str) -> bool {
        self.command() == command
    }

    /// Read parameters from `tokens` and build the audio
    ///
    /// The command word itself has already been consumed.
    fn create(&self, tokens: &mut Tokens, factory: &AudioFactory) -> Result<Box<dyn Audio>>;
}

/// Registry of [`AudioCreator`]s keyed by command word
#[derive(Default)]
pub struct AudioFactory {
    creators: Vec<Box<dyn AudioCreator>>,
    base_dir: Option<PathBuf>,
}

impl AudioFactory {
    /// Create an empty factory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory with every built-in creator registered
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register(Box::new(SilenceCreator));
        factory.register(Box::new(FileAudioCreator));
        factory.register(Box::new(EffectCreator));
        factory.register(Box::new(SineCreator));
        factory.register(Box::new(MixCreator));
        factory.register(Box::new(RepeatCreator));
        factory
    }

    /// Resolve relative `FILE` paths against `dir`
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Register a creator; the first creator registered for a command wins
    pub fn register(&mut self, creator: Box<dyn AudioCreator>) {
        if self.creator(creator.command()).is_some() {
            warn!(
                "Audio creator for '{}' already registered; new creator is shadowed",
                creator.command()
            );
        }
        self.creators.push(creator);
    }

    /// Registered command words in registration order
    pub fn commands(&self) -> Vec<&'static str> {
        self.creators.iter().map(|c| c.command()).collect()
    }

    /// Find the creator for `command`
    pub fn creator(&self, command: &str) -> Option<&dyn AudioCreator> {
        self.creators
            .iter()
            .find(|c| c.supports(command))
            .map(|c| c.as_ref())
    }

    pub(crate) fn resolve_path(&self, name: impl AsRef<Path>) -> PathBuf {
        let name = name.as_ref();
        match &self.base_dir {
            Some(dir) if name.is_relative() => dir.join(name),
            _ => name.to_path_buf(),
        }
    }

    /// Build one audio expression from the token stream
    ///
    /// An unknown command skips the rest of its line before failing.
    pub fn create_audio(&self, tokens: &mut Tokens) -> Result<Box<dyn Audio>> {
        let command = tokens.expect_word("audio command")?;
        match self.creator(&command) {
            Some(creator) => {
                if tokens.depth() >= MAX_NESTING {
                    return Err(DawError::invalid_param(
                        "expression",
                        format!("nested deeper than {} levels", MAX_NESTING),
                    ));
                }
                debug!("Creating audio via '{}' (line {})", command, tokens.line());
                tokens.enter();
                let result = creator.create(tokens, self);
                tokens.leave();
                result
            }
            None => {
                tokens.skip_line();
                Err(DawError::UnknownCommand { command })
            }
        }
    }

    /// Build exactly one expression; trailing words are an error
    pub fn create_from_str(&self, text: &str) -> Result<Box<dyn Audio>> {
        let mut tokens = Tokens::new(text);
        let audio = self.create_audio(&mut tokens)?;
        if let Some(extra) = tokens.peek() {
            return Err(DawError::InvalidToken {
                expected: "end of input".to_string(),
                found: extra.to_string(),
            });
        }
        Ok(audio)
    }

    /// Read everything from `reader` and build its first expression
    pub fn create_from_reader(&self, mut reader: impl Read) -> Result<Box<dyn Audio>> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.create_audio(&mut Tokens::new(&text))
    }

    /// Build every expression, stopping at the first error
    pub fn create_all(&self, text: &str) -> Result<Vec<Box<dyn Audio>>> {
        let mut tokens = Tokens::new(text);
        let mut audio = Vec::new();
        while !tokens.is_empty() {
            audio.push(self.create_audio(&mut tokens)?);
        }
        Ok(audio)
    }

    /// Build every expression, skipping to the next line after each failure
    pub fn create_all_lenient(&self, text: &str) -> Vec<Result<Box<dyn Audio>>> {
        let mut tokens = Tokens::new(text);
        let mut results = Vec::new();
        while !tokens.is_empty() {
            let line = tokens.line();
            let result = self.create_audio(&mut tokens);
            if let Err(e) = &result {
                warn!("Skipping expression on line {}: {}", line, e);
                tokens.skip_line();
            }
            results.push(result);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Silence;
    use pretty_assertions::assert_eq;

    struct FixedSilence;

    impl AudioCreator for FixedSilence {
        fn command(&self) -> &'static str {
            "SLNC"
        }

        fn create(&self, _tokens: &mut Tokens, _factory: &AudioFactory) -> Result<Box<dyn Audio>> {
            Ok(Box::new(Silence::new(9.0, 1.0, 9)?))
        }
    }

    #[test]
    fn test_default_commands() {
        let factory = AudioFactory::with_defaults();
        assert_eq!(
            factory.commands(),
            vec!["SLNC", "FILE", "EFCT", "SINE", "MIXG", "REPT"]
        );
        assert!(factory.creator("SLNC").is_some());
        assert!(factory.creator("slnc").is_none());
    }

    #[test]
    fn test_first_registered_creator_wins() {
        let mut factory = AudioFactory::new();
        factory.register(Box::new(FixedSilence));
        factory.register(Box::new(SilenceCreator));

        let audio = factory.create_from_str("SLNC").unwrap();
        assert_eq!(audio.duration(), 9.0);
    }

    #[test]
    fn test_unknown_command() {
        let factory = AudioFactory::with_defaults();
        let err = factory.create_from_str("WHAT 1 2 3").unwrap_err();
        assert!(matches!(err, DawError::UnknownCommand { ref command } if command == "WHAT"));
    }

    #[test]
    fn test_empty_input() {
        let factory = AudioFactory::with_defaults();
        assert!(matches!(
            factory.create_from_str("   ").unwrap_err(),
            DawError::MissingToken { .. }
        ));
    }

    #[test]
    fn test_create_from_str_rejects_trailing_words() {
        let factory = AudioFactory::with_defaults();
        let err = factory.create_from_str("SLNC 1 2 2 extra").unwrap_err();
        assert!(matches!(err, DawError::InvalidToken { .. }));
    }

    #[test]
    fn test_create_from_reader_takes_first_expression() {
        let factory = AudioFactory::with_defaults();
        let input = "SLNC 1 4 4\nSLNC 2 4 8\n".as_bytes();
        let audio = factory.create_from_reader(input).unwrap();
        assert_eq!(audio.sample_size(), 4);
    }

    #[test]
    fn test_create_all() {
        let factory = AudioFactory::with_defaults();
        let all = factory
            .create_all("SLNC 1 4 4\nSINE 440 8000 0.5\nEFCT AMPL 2 SLNC 1 2 2")
            .unwrap();
        let kinds: Vec<_> = all.iter().map(|a| a.kind()).collect();
        assert_eq!(kinds, vec!["Silence", "GeneratorAudio", "Effect"]);

        assert!(factory.create_all("SLNC 1 4 4\nNOPE\n").is_err());
    }

    #[test]
    fn test_create_all_lenient_skips_bad_lines() {
        let factory = AudioFactory::with_defaults();
        let results = factory.create_all_lenient(
            "SLNC 1 4 4\nNOPE 1 2 3\nSLNC 0 4 4 trailing words\nSLNC 2 4 8\n",
        );

        assert_eq!(results.len(), 4);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(DawError::UnknownCommand { .. })));
        assert!(matches!(results[2], Err(DawError::InvalidDuration { .. })));
        let last = results[3].as_ref().unwrap();
        assert_eq!(last.sample_size(), 8);
    }

    #[test]
    fn test_nesting_limit() {
        let factory = AudioFactory::with_defaults();

        let shallow = format!("{}SLNC 1 4 4", "EFCT AMPL 1 ".repeat(50));
        assert_eq!(factory.create_from_str(&shallow).unwrap().sample_size(), 4);

        let deep = format!("{}SLNC 1 4 4", "EFCT AMPL 1 ".repeat(MAX_NESTING + 10));
        assert!(matches!(
            factory.create_from_str(&deep),
            Err(DawError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_resolve_path() {
        let factory = AudioFactory::new().with_base_dir("/songs");
        assert_eq!(factory.resolve_path("a.txt"), PathBuf::from("/songs/a.txt"));
        assert_eq!(factory.resolve_path("/abs/b.txt"), PathBuf::from("/abs/b.txt"));
        assert_eq!(AudioFactory::new().resolve_path("a.txt"), PathBuf::from("a.txt"));
    }
}
