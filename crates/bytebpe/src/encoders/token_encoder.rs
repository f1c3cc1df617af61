//! # Token Encoder Trait

use crate::{
    pretokenize::Pretokenizer,
    types::TokenType,
    vocab::{SpecialTokens, byte_vocab::encode_bytes},
};

/// Expected average bytes per token; used when pre-allocating buffers.
pub const EXPECTED_BYTES_PER_TOKEN: f64 = 3.0;

/// A trait for token encoders.
///
/// Encoding is total: any text encodes, since every byte has a token.
pub trait TokenEncoder<T: TokenType>: Send + Sync {
    /// Return the attached pretokenizer.
    fn pretokenizer(&self) -> &Pretokenizer;

    /// Return the reserved special tokens.
    fn specials(&self) -> &SpecialTokens<T>;

    /// Encode one chunk's bytes, appending to a target buffer.
    ///
    /// ## Arguments
    /// * `span` - The chunk bytes to encode.
    /// * `tokens` - The target token buffer to append to.
    fn encode_append_span(
        &self,
        span: &[u8],
        tokens: &mut Vec<T>,
    );

    /// Encode text, appending to a target buffer.
    ///
    /// Each chunk is encoded independently; merges never cross chunks.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, text, tokens)))]
    fn encode_append(
        &self,
        text: &str,
        tokens: &mut Vec<T>,
    ) {
        for chunk in self.pretokenizer().split(text) {
            self.encode_append_span(encode_bytes(chunk), tokens);
        }
    }

    /// Encode text into tokens.
    ///
    /// ## Arguments
    /// * `text` - The text to encode.
    /// * `add_special_tokens` - wrap the result in ``<BOS>`` ... ``<EOS>``.
    fn encode<S: AsRef<str>>(
        &self,
        text: S,
        add_special_tokens: bool,
    ) -> Vec<T> {
        let text = text.as_ref();
        let capacity = text.len() as f64 / EXPECTED_BYTES_PER_TOKEN + 2.0;
        let mut tokens = Vec::with_capacity(capacity as usize);

        if add_special_tokens {
            tokens.push(self.specials().bos);
        }
        self.encode_append(text, &mut tokens);
        if add_special_tokens {
            tokens.push(self.specials().eos);
        }
        tokens
    }

    /// Encode a batch of text into tokens.
    fn encode_batch<S: AsRef<str> + Sync>(
        &self,
        batch: &[S],
        add_special_tokens: bool,
    ) -> Vec<Vec<T>> {
        batch
            .iter()
            .map(|text| self.encode(text, add_special_tokens))
            .collect()
    }
}
