//! # Tokenizer Facade

use std::{fmt::Debug, path::Path, sync::Arc};

use crate::{
    decoders::{DictionaryDecoder, TokenDecoder},
    encoders::{MergeScanEncoder, TokenEncoder},
    errors::BpeResult,
    rayon::{ParallelRayonDecoder, ParallelRayonEncoder},
    tokenizer::TokenizerConfig,
    types::TokenType,
    vocab::{
        MergeRules, SpecialTokens, TokenVocab,
        io::{latin1::unbridge_str, load_model_dir, save_model_dir, vocab_json::token_string},
        specials::{UNK_TOKEN, special_id},
    },
};

/// Unified Tokenizer.
///
/// Combines:
///  * a read-only [`TokenVocab`] and [`MergeRules`],
///  * a [`MergeScanEncoder`], and
///  * a [`DictionaryDecoder`],
///
/// with ``rayon`` batch wrappers. Nothing is mutated after construction,
/// so a shared `&Tokenizer` serves concurrent calls without locking.
#[derive(Debug, Clone)]
pub struct Tokenizer<T: TokenType = u32> {
    vocab: Arc<TokenVocab<T>>,
    merges: Arc<MergeRules<T>>,
    config: TokenizerConfig,
    encoder: ParallelRayonEncoder<T, MergeScanEncoder<T>>,
    decoder: ParallelRayonDecoder<T, DictionaryDecoder<T>>,
}

impl<T: TokenType> Tokenizer<T> {
    /// Load a tokenizer from a saved model directory.
    ///
    /// ## Returns
    /// [`crate::BpeError::Load`] if any of the three artifacts is missing,
    /// malformed, or inconsistent; no partial tokenizer is built.
    pub fn from_pretrained<P>(dir: P) -> BpeResult<Self>
    where
        P: AsRef<Path> + Debug,
    {
        let (vocab, merges, config) = load_model_dir(dir)?;
        Self::from_config(vocab, merges, config)
    }

    /// Build a tokenizer from trained parts.
    pub fn from_parts(
        vocab: TokenVocab<T>,
        merges: MergeRules<T>,
    ) -> BpeResult<Self> {
        let config = TokenizerConfig::describe(&vocab, &merges, None);
        Self::from_config(vocab, merges, config)
    }

    fn from_config(
        vocab: TokenVocab<T>,
        merges: MergeRules<T>,
        config: TokenizerConfig,
    ) -> BpeResult<Self> {
        let vocab = Arc::new(vocab);
        let merges = Arc::new(merges);

        let encoder = ParallelRayonEncoder::new(MergeScanEncoder::new(vocab.clone(), merges.clone())?);
        let decoder = ParallelRayonDecoder::new(DictionaryDecoder::new(vocab.clone()));

        Ok(Self {
            vocab,
            merges,
            config,
            encoder,
            decoder,
        })
    }

    /// Save ``vocab.json``, ``merges.txt`` and ``config.json`` to `dir`.
    pub fn save<P>(
        &self,
        dir: P,
    ) -> BpeResult<()>
    where
        P: AsRef<Path> + Debug,
    {
        save_model_dir(dir, &self.vocab, &self.merges, &self.config)
    }

    /// The vocabulary.
    pub fn vocab(&self) -> &Arc<TokenVocab<T>> {
        &self.vocab
    }

    /// The merge rules, in priority order.
    pub fn merge_rules(&self) -> &Arc<MergeRules<T>> {
        &self.merges
    }

    /// The config record.
    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// The reserved special tokens.
    pub fn special_tokens(&self) -> &SpecialTokens<T> {
        self.vocab.specials()
    }

    /// The number of defined tokens, specials included.
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Encode text into tokens.
    ///
    /// ## Arguments
    /// * `text` - The text to encode.
    /// * `add_special_tokens` - wrap the result in ``<BOS>`` ... ``<EOS>``.
    pub fn encode<S: AsRef<str>>(
        &self,
        text: S,
        add_special_tokens: bool,
    ) -> Vec<T> {
        self.encoder.encode(text, add_special_tokens)
    }

    /// Encode a batch of text in parallel.
    pub fn encode_batch<S: AsRef<str> + Sync>(
        &self,
        batch: &[S],
        add_special_tokens: bool,
    ) -> Vec<Vec<T>> {
        self.encoder.encode_batch(batch, add_special_tokens)
    }

    /// Decode tokens into text.
    ///
    /// Unknown tokens decode to ``<UNK>``, and invalid UTF-8 is replaced
    /// with ``U+FFFD``; decoding never fails.
    pub fn decode(
        &self,
        tokens: &[T],
        skip_special_tokens: bool,
    ) -> String {
        self.decoder.decode_to_string(tokens, skip_special_tokens)
    }

    /// Decode a batch of token sequences in parallel.
    pub fn decode_batch<S: AsRef<[T]> + Sync>(
        &self,
        batch: &[S],
        skip_special_tokens: bool,
    ) -> Vec<String> {
        self.decoder.decode_batch_to_strings(batch, skip_special_tokens)
    }

    /// The token for a ``vocab.json`` key; ``<UNK>`` if there is none.
    ///
    /// Special tokens are looked up by name; other keys are the
    /// latin-1 bridged form of the payload.
    pub fn token_to_id(
        &self,
        token: &str,
    ) -> T {
        if let Some(id) = special_id(token) {
            return self.vocab.specials().as_array()[id];
        }
        unbridge_str(token)
            .and_then(|payload| self.vocab.lookup(&payload))
            .unwrap_or(self.vocab.specials().unk)
    }

    /// The ``vocab.json`` key for `token`; ``<UNK>`` for undefined tokens.
    pub fn id_to_token(
        &self,
        token: T,
    ) -> String {
        token_string(&self.vocab, token).unwrap_or_else(|| UNK_TOKEN.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        training::BpeTrainerOptions,
        types::{check_is_send, check_is_sync},
    };

    fn trained_tokenizer() -> Tokenizer<u32> {
        let mut trainer = BpeTrainerOptions::new(280).init::<String, u64>().unwrap();
        trainer.update_from_samples([
            "the cat sat on the mat",
            "the dog sat on the log",
            "café naïve 日本語",
        ]);
        let results = trainer.train::<u32>().unwrap();
        Tokenizer::from_parts(results.vocab, results.merges).unwrap()
    }

    #[test]
    fn test_tokenizer_is_send_sync() {
        let tokenizer = trained_tokenizer();
        check_is_send(&tokenizer);
        check_is_sync(&tokenizer);
    }

    #[test]
    fn test_round_trip() {
        let tokenizer = trained_tokenizer();
        assert!(tokenizer.vocab_size() > 260);
        assert_eq!(tokenizer.vocab_size(), tokenizer.config().vocab_size);
        assert_eq!(tokenizer.merge_rules().len(), tokenizer.vocab_size() - 260);

        for text in ["the cat", "a mat on the log", "naïve café", "日本", "", "\n\t  x"] {
            let tokens = tokenizer.encode(text, true);
            assert_eq!(tokens.first(), Some(&2));
            assert_eq!(tokens.last(), Some(&3));
            assert_eq!(tokenizer.decode(&tokens, true), text);
        }

        // "the" is frequent enough to compress.
        assert!(tokenizer.encode("the", false).len() < 3);
    }

    #[test]
    fn test_batch() {
        let tokenizer = trained_tokenizer();
        let batch = ["the cat", "sat", "", "日本語"];

        let encoded = tokenizer.encode_batch(&batch, false);
        assert_eq!(encoded.len(), 4);
        for (text, tokens) in batch.iter().zip(encoded.iter()) {
            assert_eq!(&tokenizer.encode(text, false), tokens);
        }

        assert_eq!(tokenizer.decode_batch(&encoded, true), batch);
    }

    #[test]
    fn test_token_lookup() {
        let tokenizer = trained_tokenizer();
        let specials = tokenizer.special_tokens();

        assert_eq!(tokenizer.token_to_id("<PAD>"), specials.pad);
        assert_eq!(tokenizer.token_to_id("<EOS>"), 3);
        assert_eq!(tokenizer.token_to_id("a"), b'a' as u32 + 4);
        assert_eq!(tokenizer.token_to_id("never seen in training"), specials.unk);
        assert_eq!(tokenizer.token_to_id("日"), specials.unk);

        assert_eq!(tokenizer.id_to_token(specials.unk), "<UNK>");
        assert_eq!(tokenizer.id_to_token(2), "<BOS>");
        assert_eq!(tokenizer.id_to_token(b'a' as u32 + 4), "a");
        assert_eq!(tokenizer.id_to_token(1_000_000), "<UNK>");

        for token in 4..tokenizer.vocab_size() as u32 {
            let key = tokenizer.id_to_token(token);
            assert_eq!(tokenizer.token_to_id(&key), token, "{key:?}");
        }
    }

    #[test]
    fn test_decode_is_total() {
        let tokenizer = trained_tokenizer();
        assert_eq!(tokenizer.decode(&[], false), "");
        assert_eq!(tokenizer.decode(&[99_999], true), "<UNK>");
        assert_eq!(tokenizer.decode(&[0xFF + 4], true), "\u{FFFD}");
    }
}
