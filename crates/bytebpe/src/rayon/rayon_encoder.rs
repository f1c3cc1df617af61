//! # Parallel Encoder

use crate::{
    encoders::TokenEncoder,
    pretokenize::Pretokenizer,
    types::TokenType,
    vocab::SpecialTokens,
};

/// Batch-Level Parallel Encoder Wrapper.
///
/// Encodes each text of a batch on the current ``rayon`` pool;
/// results keep the batch order.
#[derive(Debug, Clone)]
pub struct ParallelRayonEncoder<T: TokenType, E: TokenEncoder<T>> {
    /// Inner encoder.
    pub inner: E,

    _marker: std::marker::PhantomData<T>,
}

impl<T, E> ParallelRayonEncoder<T, E>
where
    T: TokenType,
    E: TokenEncoder<T>,
{
    /// Create a new parallel encoder.
    ///
    /// ## Arguments
    /// * `inner` - The token encoder to wrap.
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T, E> TokenEncoder<T> for ParallelRayonEncoder<T, E>
where
    T: TokenType,
    E: TokenEncoder<T>,
{
    fn pretokenizer(&self) -> &Pretokenizer {
        self.inner.pretokenizer()
    }

    fn specials(&self) -> &SpecialTokens<T> {
        self.inner.specials()
    }

    fn encode_append_span(
        &self,
        span: &[u8],
        tokens: &mut Vec<T>,
    ) {
        self.inner.encode_append_span(span, tokens)
    }

    fn encode_batch<S: AsRef<str> + Sync>(
        &self,
        batch: &[S],
        add_special_tokens: bool,
    ) -> Vec<Vec<T>> {
        use rayon::prelude::*;
        batch
            .par_iter()
            .map(|text| self.inner.encode(text, add_special_tokens))
            .collect()
    }
}
