//! # Token Span Buffer

use crate::{
    types::{Pair, TokenType},
    vocab::{ByteMapVocab, MergeRule},
};

/// A mutable span of tokens (one distinct chunk).
///
/// Iteratively rewritten during BPE vocabulary training;
/// a span only ever shrinks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenSpanBuf<T: TokenType> {
    tokens: Vec<T>,
}

impl<T: TokenType, S: AsRef<[T]>> From<S> for TokenSpanBuf<T> {
    fn from(tokens: S) -> Self {
        Self::from_tokens(tokens)
    }
}

impl<T: TokenType> TokenSpanBuf<T> {
    /// Create a new span buffer from tokens.
    pub fn from_tokens<S>(tokens: S) -> Self
    where
        S: AsRef<[T]>,
    {
        Self {
            tokens: tokens.as_ref().to_vec(),
        }
    }

    /// Create a new span buf from a string slice.
    ///
    /// # Arguments
    /// * `text` - the text to turn into UTF-8 bytes, and translate to byte-level tokens.
    /// * `byte_vocab` - the translation for the byte tokens.
    pub fn from_string<S: AsRef<str>>(
        text: S,
        byte_vocab: &ByteMapVocab<T>,
    ) -> Self {
        let bytes = text.as_ref().as_bytes();
        let mut tokens = Vec::with_capacity(bytes.len());
        byte_vocab.append_tokens(bytes, &mut tokens);
        Self { tokens }
    }

    /// View the tokens as a slice.
    pub fn tokens(&self) -> &[T] {
        &self.tokens
    }

    /// Get the length of the span.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Is this span empty?
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Get an iterator over [`Pair<T>`] windows of this span.
    pub fn pairs(&self) -> impl Iterator<Item = Pair<T>> + '_ {
        self.tokens.windows(2).map(|w| (w[0], w[1]))
    }

    /// Merge all non-overlapping occurrences of `rule.pair -> rule.token`.
    ///
    /// # Returns
    /// The number of occurrences merged.
    pub fn merge_pair(
        &mut self,
        rule: &MergeRule<T>,
    ) -> usize {
        rule.apply(&mut self.tokens, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tokens() {
        let span: TokenSpanBuf<u32> = TokenSpanBuf::from_tokens(vec![1, 2, 3]);
        assert_eq!(span.tokens(), &[1, 2, 3]);
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());

        let span: TokenSpanBuf<u32> = [1, 2, 3].into();
        assert_eq!(span.tokens(), &[1, 2, 3]);
    }

    #[test]
    fn test_span_from_str() {
        let byte_vocab: ByteMapVocab<u32> = ByteMapVocab::new().unwrap();

        let span = TokenSpanBuf::from_string("hello", &byte_vocab);
        assert_eq!(span.tokens(), &[108, 105, 112, 112, 115]);

        // "☃" := 0xE2 0x98 0x83
        let span = TokenSpanBuf::from_string("☃", &byte_vocab);
        assert_eq!(span.tokens(), &[0xE2 + 4, 0x98 + 4, 0x83 + 4]);
    }

    #[test]
    fn test_span_pairs() {
        let span: TokenSpanBuf<u32> = TokenSpanBuf::from_tokens(vec![1, 2, 3]);
        assert_eq!(span.pairs().collect::<Vec<_>>(), vec![(1, 2), (2, 3)]);

        let span: TokenSpanBuf<u32> = TokenSpanBuf::from_tokens(vec![1]);
        assert_eq!(span.pairs().count(), 0);
    }

    #[test]
    fn test_span_merge_pair() {
        let mut span: TokenSpanBuf<u32> = TokenSpanBuf::from_tokens(vec![1, 2, 3, 1, 2, 2, 1]);

        assert_eq!(span.merge_pair(&MergeRule::new((1, 2), 9)), 2);
        assert_eq!(span.tokens(), &[9, 3, 9, 2, 1]);

        assert_eq!(span.merge_pair(&MergeRule::new((7, 7), 10)), 0);
        assert_eq!(span.tokens(), &[9, 3, 9, 2, 1]);
    }
}
