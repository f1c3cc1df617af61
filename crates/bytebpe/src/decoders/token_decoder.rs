//! # Token Decoder Trait

use crate::{
    errors::BpeResult,
    types::TokenType,
    vocab::byte_vocab::{decode_bytes, decode_bytes_lossy},
};

/// Trait for token decoders.
///
/// Decoding is total: unknown tokens decode to the ``<UNK>`` payload,
/// and only the final byte-to-text step can fail.
pub trait TokenDecoder<T: TokenType>: Send + Sync {
    /// Decode tokens, appending their payloads to a byte buffer.
    ///
    /// ## Arguments
    /// * `tokens` - The tokens to decode.
    /// * `skip_special_tokens` - drop ``<PAD> <UNK> <BOS> <EOS>`` first.
    /// * `buf` - The target byte buffer.
    fn decode_append_bytes(
        &self,
        tokens: &[T],
        skip_special_tokens: bool,
        buf: &mut Vec<u8>,
    );

    /// Decode tokens into their concatenated payload bytes.
    fn decode_to_bytes(
        &self,
        tokens: &[T],
        skip_special_tokens: bool,
    ) -> Vec<u8> {
        let mut buf = Vec::with_capacity(tokens.len() * 4);
        self.decode_append_bytes(tokens, skip_special_tokens, &mut buf);
        buf
    }

    /// Decode tokens into text, replacing invalid UTF-8 with ``U+FFFD``.
    fn decode_to_string(
        &self,
        tokens: &[T],
        skip_special_tokens: bool,
    ) -> String {
        decode_bytes_lossy(&self.decode_to_bytes(tokens, skip_special_tokens))
    }

    /// Decode tokens into text.
    ///
    /// ## Returns
    /// [`crate::BpeError::Decode`] if the payloads are not valid UTF-8.
    fn try_decode_to_string(
        &self,
        tokens: &[T],
        skip_special_tokens: bool,
    ) -> BpeResult<String> {
        decode_bytes(self.decode_to_bytes(tokens, skip_special_tokens))
    }

    /// Decode a batch of token sequences into text.
    fn decode_batch_to_strings<S: AsRef<[T]> + Sync>(
        &self,
        batch: &[S],
        skip_special_tokens: bool,
    ) -> Vec<String> {
        batch
            .iter()
            .map(|tokens| self.decode_to_string(tokens.as_ref(), skip_special_tokens))
            .collect()
    }
}
