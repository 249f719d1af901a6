//! Whitespace token stream for the audio command language

use std::str::FromStr;

use crate::error::{DawError, Result};

/// A cursor over whitespace-separated words that remembers each word's line
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    words: Vec<(usize, String)>,
    pos: usize,
    depth: usize,
}

impl Tokens {
    pub fn new(text: &str) -> Self {
        let words = text
            .lines()
            .enumerate()
            .flat_map(|(line, content)| {
                content
                    .split_whitespace()
                    .map(move |word| (line + 1, word.to_string()))
            })
            .collect();
        Self {
            words,
            pos: 0,
            depth: 0,
        }
    }

    /// True once every word has been consumed
    pub fn is_empty(&self) -> bool {
        self.pos >= self.words.len()
    }

    /// Number of words not yet consumed
    pub fn remaining(&self) -> usize {
        self.words.len().saturating_sub(self.pos)
    }

    /// 1-based line of the next word, or of the last word at end of input
    pub fn line(&self) -> usize {
        self.words
            .get(self.pos)
            .or_else(|| self.words.last())
            .map(|(line, _)| *line)
            .unwrap_or(0)
    }

    /// Look at the next word without consuming it
    pub fn peek(&self) -> Option<&str> {
        self.words.get(self.pos).map(|(_, w)| w.as_str())
    }

    pub fn next_word(&mut self) -> Option<String> {
        let word = self.words.get(self.pos).map(|(_, w)| w.clone());
        if word.is_some() {
            self.pos += 1;
        }
        word
    }

    /// Consume the next word or fail naming what was expected
    pub fn expect_word(&mut self, what: &str) -> Result<String> {
        self.next_word().ok_or_else(|| DawError::MissingToken {
            expected: what.to_string(),
        })
    }

    /// Consume and parse the next word
    pub fn parse<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let word = self.expect_word(what)?;
        word.parse::<T>().map_err(|_| DawError::InvalidToken {
            expected: what.to_string(),
            found: word,
        })
    }

    /// Current expression nesting depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn enter(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Drop the remaining words on the line of the last consumed word
    ///
    /// At the start of input this drops the first line.
    pub fn skip_line(&mut self) {
        let current = if self.pos > 0 {
            self.words.get(self.pos - 1)
        } else {
            self.words.first()
        };
        let Some(&(line, _)) = current else {
            return;
        };
        while self
            .words
            .get(self.pos)
            .is_some_and(|(next_line, _)| *next_line == line)
        {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_words_across_lines() {
        let mut tokens = Tokens::new("SLNC 1 2\n  3\n\nFILE a.txt");
        let mut words = Vec::new();
        while let Some(word) = tokens.next_word() {
            words.push(word);
        }
        assert_eq!(words, vec!["SLNC", "1", "2", "3", "FILE", "a.txt"]);
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_parse_errors() {
        let mut tokens = Tokens::new("1.5 abc");
        assert_eq!(tokens.parse::<f64>("rate").unwrap(), 1.5);
        match tokens.parse::<f64>("duration") {
            Err(DawError::InvalidToken { expected, found }) => {
                assert_eq!(expected, "duration");
                assert_eq!(found, "abc");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            tokens.parse::<f64>("size"),
            Err(DawError::MissingToken { .. })
        ));
    }

    #[test]
    fn test_skip_line() {
        let mut tokens = Tokens::new("BAD 1 2 3\nSLNC 1 1 1");
        tokens.next_word();
        tokens.skip_line();
        assert_eq!(tokens.peek(), Some("SLNC"));
        assert_eq!(tokens.line(), 2);

        // Nothing left on the consumed line: no-op
        tokens.skip_line();
        assert_eq!(tokens.peek(), Some("SLNC"));
    }

    #[test]
    fn test_skip_line_at_start() {
        let mut tokens = Tokens::new("a b\nc");
        tokens.skip_line();
        assert_eq!(tokens.next_word().as_deref(), Some("c"));
        assert_eq!(tokens.remaining(), 0);
    }
}
