//! # Pretokenization
//!
//! Text is split into chunks before any byte-pair work; merges never
//! cross a chunk boundary, in training or in encoding.
//!
//! The split pattern, tried left to right at each position:
//! 1. a contraction suffix: ``'s 'd 'm 't 'll 've 're`` (case-insensitive),
//! 2. an optional space followed by a run of letters,
//! 3. an optional space followed by a single digit,
//! 4. an optional space followed by a punctuation run and any trailing newlines,
//! 5. whitespace ending in a line break,
//! 6. whitespace not followed by a non-space character,
//! 7. any other whitespace run.
//!
//! ```rust
//! use bytebpe::pretokenize::Pretokenizer;
//!
//! let pretokenizer = Pretokenizer::new().unwrap();
//! let chunks: Vec<&str> = pretokenizer.split("I don't").collect();
//! assert_eq!(chunks, vec!["I", " don", "'t"]);
//! ```

use crate::{
    errors::BpeResult,
    regex::{MatchesWrapper, RegexWrapper, RegexWrapperPattern},
};

/// The default chunk splitting pattern.
pub const PRETOKENIZE_PATTERN: &str = r"'(?i:[sdmt]|ll|ve|re)| ?\p{L}+| ?\p{N}| ?[^\s\p{L}\p{N}]+[\r\n]*|\s*[\r\n]|\s+(?!\S)|\s+";

/// Splits text into the chunks that merges are confined to.
///
/// Cloning is cheap; the compiled regex is shared.
#[derive(Debug, Clone)]
pub struct Pretokenizer {
    regex: RegexWrapper,
}

impl Pretokenizer {
    /// Build a pretokenizer over [`PRETOKENIZE_PATTERN`].
    pub fn new() -> BpeResult<Self> {
        Self::from_pattern(PRETOKENIZE_PATTERN)
    }

    /// Build a pretokenizer over a custom pattern.
    ///
    /// ## Arguments
    /// * `pattern` - the split pattern; compiled with [`regex`] when possible,
    ///   else with [`fancy_regex`].
    pub fn from_pattern<P: Into<RegexWrapperPattern>>(pattern: P) -> BpeResult<Self> {
        let regex = pattern.into().compile()?;
        Ok(Self { regex })
    }

    /// The split pattern source.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Lazily split `text` into chunks, in order.
    ///
    /// For [`PRETOKENIZE_PATTERN`] the chunks are non-empty and their
    /// concatenation is exactly `text`.
    pub fn split<'r, 'h>(
        &'r self,
        text: &'h str,
    ) -> MatchesWrapper<'r, 'h> {
        self.regex.find_iter(text)
    }

    /// Split `text` into a vector of chunks.
    pub fn split_to_vec<'h>(
        &self,
        text: &'h str,
    ) -> Vec<&'h str> {
        self.split(text).collect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::{check_is_send, check_is_sync};

    fn chunks(text: &str) -> Vec<&str> {
        Pretokenizer::new().unwrap().split_to_vec(text)
    }

    #[test]
    fn test_pretokenizer() {
        let pretokenizer = Pretokenizer::new().unwrap();
        check_is_send(&pretokenizer);
        check_is_sync(&pretokenizer);
        assert_eq!(pretokenizer.pattern(), PRETOKENIZE_PATTERN);
    }

    #[test]
    fn test_words_and_punctuation() {
        assert_eq!(chunks("Hello, world!"), vec!["Hello", ",", " world", "!"]);
        assert_eq!(
            chunks("I don't think so..."),
            vec!["I", " don", "'t", " think", " so", "..."]
        );
    }

    #[test]
    fn test_contractions_are_case_insensitive() {
        assert_eq!(chunks("WE'LL"), vec!["WE", "'LL"]);
        assert_eq!(chunks("they've"), vec!["they", "'ve"]);
    }

    #[test]
    fn test_digits_split_singly() {
        assert_eq!(chunks("x 42"), vec!["x", " 4", "2"]);
    }

    #[test]
    fn test_whitespace_runs() {
        assert_eq!(
            chunks("  multiple   spaces  "),
            vec![" ", " multiple", "  ", " spaces", "  "]
        );
        assert_eq!(chunks("Hello\nworld\n"), vec!["Hello", "\n", "world", "\n"]);
        assert_eq!(chunks("a\n\n\nb"), vec!["a", "\n\n\n", "b"]);
    }

    #[test]
    fn test_punctuation_keeps_trailing_newlines() {
        assert_eq!(chunks("x):\n    y"), vec!["x", "):\n", "   ", " y"]);
    }

    #[test]
    fn test_unicode_letters() {
        assert_eq!(chunks("café naïve"), vec!["café", " naïve"]);
        assert_eq!(chunks("你好世界"), vec!["你好世界"]);
    }

    #[test]
    fn test_long_whitespace_runs() {
        let text = format!("{}x", " ".repeat(1_000_000));
        let pieces = chunks(&text);
        assert_eq!(pieces.concat(), text);
        assert_eq!(pieces.last(), Some(&" x"));

        let text = format!("a{}\n", " \t".repeat(1_000_000));
        let pieces = chunks(&text);
        assert!(pieces.iter().all(|p| !p.is_empty()));
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn test_empty_text() {
        assert!(chunks("").is_empty());
    }

    proptest! {
        #[test]
        fn chunks_cover_text(text in "\\PC*") {
            let pieces = chunks(&text);
            prop_assert!(pieces.iter().all(|p| !p.is_empty()));
            prop_assert_eq!(pieces.concat(), text);
        }
    }
}
