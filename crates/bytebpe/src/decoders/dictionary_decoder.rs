//! # Dictionary ``{ T -> Vec<u8> }`` Token Decoder

use std::sync::Arc;

use crate::{decoders::token_decoder::TokenDecoder, types::TokenType, vocab::TokenVocab};

/// A token dictionary [`TokenDecoder<T>`].
#[derive(Debug, Clone)]
pub struct DictionaryDecoder<T: TokenType> {
    vocab: Arc<TokenVocab<T>>,
}

impl<T: TokenType> DictionaryDecoder<T> {
    /// Creates a new decoder over `vocab`.
    pub fn new(vocab: Arc<TokenVocab<T>>) -> Self {
        Self { vocab }
    }

    /// The vocabulary.
    pub fn vocab(&self) -> &Arc<TokenVocab<T>> {
        &self.vocab
    }
}

impl<T: TokenType> TokenDecoder<T> for DictionaryDecoder<T> {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, tokens, buf)))]
    fn decode_append_bytes(
        &self,
        tokens: &[T],
        skip_special_tokens: bool,
        buf: &mut Vec<u8>,
    ) {
        for &t in tokens {
            if skip_special_tokens && self.vocab.is_special(t) {
                continue;
            }
            buf.extend_from_slice(self.vocab.payload_or_unk(t));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::BpeError,
        types::{check_is_send, check_is_sync},
    };

    fn test_decoder() -> DictionaryDecoder<u32> {
        let vocab = TokenVocab::from_learned(vec![b"he".to_vec(), "é".as_bytes().to_vec()]).unwrap();
        DictionaryDecoder::new(Arc::new(vocab))
    }

    #[test]
    fn test_dictionary_decoder() {
        let decoder = test_decoder();
        check_is_send(&decoder);
        check_is_sync(&decoder);

        let tokens = [260, b'y' as u32 + 4, b'!' as u32 + 4];
        assert_eq!(decoder.decode_to_string(&tokens, true), "hey!");
        assert_eq!(decoder.decode_to_bytes(&tokens, true), b"hey!");
        assert_eq!(decoder.try_decode_to_string(&tokens, false).unwrap(), "hey!");

        assert_eq!(decoder.decode_to_string(&[261], true), "é");
        assert_eq!(decoder.decode_to_string(&[], true), "");
    }

    #[test]
    fn test_special_tokens() {
        let decoder = test_decoder();
        let tokens = [2, 260, 0, 3];

        assert_eq!(decoder.decode_to_string(&tokens, true), "he");
        assert_eq!(decoder.decode_to_string(&tokens, false), "<BOS>he<PAD><EOS>");
    }

    #[test]
    fn test_unknown_tokens() {
        let decoder = test_decoder();

        assert_eq!(decoder.decode_to_string(&[260, 99_999], true), "he<UNK>");
        assert_eq!(decoder.decode_to_string(&[1], false), "<UNK>");
        assert_eq!(decoder.decode_to_string(&[1], true), "");
    }

    #[test]
    fn test_invalid_utf8() {
        let decoder = test_decoder();

        // 0xC3 alone is a truncated "é".
        let tokens = [b'a' as u32 + 4, 0xC3 + 4];
        assert_eq!(decoder.decode_to_string(&tokens, true), "a\u{FFFD}");
        assert!(matches!(
            decoder.try_decode_to_string(&tokens, true),
            Err(BpeError::Decode(_))
        ));

        // Split across byte tokens, but valid once joined.
        let tokens = [0xC3 + 4, 0xA9 + 4];
        assert_eq!(decoder.decode_to_string(&tokens, true), "é");
    }

    #[test]
    fn test_decode_batch() {
        let decoder = test_decoder();
        let batch: Vec<Vec<u32>> = vec![vec![260], vec![], vec![2, 261, 3]];
        assert_eq!(
            decoder.decode_batch_to_strings(&batch, true),
            vec!["he".to_string(), String::new(), "é".to_string()]
        );
    }
}
