//! # Merge Scan Encoder
//!
//! Re-scans each chunk for the lowest ranked applicable merge,
//! applies it everywhere in the chunk, and repeats until no merges remain.

use std::sync::Arc;

use crate::{
    encoders::TokenEncoder,
    errors::BpeResult,
    pretokenize::Pretokenizer,
    types::TokenType,
    vocab::{MergeRules, SpecialTokens, TokenVocab},
};

/// A [`TokenEncoder`] which incrementally scans for merges.
///
/// The earliest learned rule always applies first, wherever it occurs;
/// the ``pair -> rank`` lookup replaces any walk of the rule list.
#[derive(Debug, Clone)]
pub struct MergeScanEncoder<T: TokenType> {
    vocab: Arc<TokenVocab<T>>,
    merges: Arc<MergeRules<T>>,
    pretokenizer: Pretokenizer,
}

impl<T: TokenType> MergeScanEncoder<T> {
    /// Build an encoder over [`crate::pretokenize::PRETOKENIZE_PATTERN`].
    ///
    /// ## Returns
    /// An error if `merges` does not match `vocab`.
    pub fn new(
        vocab: Arc<TokenVocab<T>>,
        merges: Arc<MergeRules<T>>,
    ) -> BpeResult<Self> {
        Self::with_pretokenizer(vocab, merges, Pretokenizer::new()?)
    }

    /// Build an encoder with an explicit pretokenizer.
    pub fn with_pretokenizer(
        vocab: Arc<TokenVocab<T>>,
        merges: Arc<MergeRules<T>>,
        pretokenizer: Pretokenizer,
    ) -> BpeResult<Self> {
        merges.check_vocab(&vocab)?;
        Ok(Self {
            vocab,
            merges,
            pretokenizer,
        })
    }

    /// The vocabulary.
    pub fn vocab(&self) -> &Arc<TokenVocab<T>> {
        &self.vocab
    }

    /// The merge rules.
    pub fn merges(&self) -> &Arc<MergeRules<T>> {
        &self.merges
    }
}

impl<T: TokenType> TokenEncoder<T> for MergeScanEncoder<T> {
    fn pretokenizer(&self) -> &Pretokenizer {
        &self.pretokenizer
    }

    fn specials(&self) -> &SpecialTokens<T> {
        self.vocab.specials()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, span, tokens)))]
    fn encode_append_span(
        &self,
        span: &[u8],
        tokens: &mut Vec<T>,
    ) {
        // The output buffer doubles as working memory.
        let start = tokens.len();
        self.vocab.byte_vocab().append_tokens(span, tokens);

        while tokens.len() >= start + 2 {
            // Lowest rank wins; the leftmost window starts the sweep.
            let Some((_, idx, rule)) = tokens[start..]
                .windows(2)
                .enumerate()
                .filter_map(|(idx, w)| {
                    self.merges
                        .lookup(&(w[0], w[1]))
                        .map(|(rank, rule)| (rank, idx, *rule))
                })
                .min_by_key(|&(rank, idx, _)| (rank, idx))
            else {
                break;
            };

            rule.apply(tokens, start + idx);
        }
    }
}
