//! # Parallel Decoder

use crate::{decoders::TokenDecoder, types::TokenType};

/// Batch-Level Parallel Decoder Wrapper.
///
/// Decodes each sequence of a batch on the current ``rayon`` pool;
/// results keep the batch order.
#[derive(Debug, Clone)]
pub struct ParallelRayonDecoder<T: TokenType, D: TokenDecoder<T>> {
    /// Wrapped decoder.
    pub inner: D,

    _marker: std::marker::PhantomData<T>,
}

impl<T, D> ParallelRayonDecoder<T, D>
where
    T: TokenType,
    D: TokenDecoder<T>,
{
    /// Create a new parallel token decoder.
    ///
    /// ## Arguments
    /// * `inner` - The token decoder to wrap.
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T, D> TokenDecoder<T> for ParallelRayonDecoder<T, D>
where
    T: TokenType,
    D: TokenDecoder<T>,
{
    fn decode_append_bytes(
        &self,
        tokens: &[T],
        skip_special_tokens: bool,
        buf: &mut Vec<u8>,
    ) {
        self.inner.decode_append_bytes(tokens, skip_special_tokens, buf)
    }

    fn decode_batch_to_strings<S: AsRef<[T]> + Sync>(
        &self,
        batch: &[S],
        skip_special_tokens: bool,
    ) -> Vec<String> {
        use rayon::prelude::*;
        batch
            .par_iter()
            .map(|tokens| self.inner.decode_to_string(tokens.as_ref(), skip_special_tokens))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        decoders::DictionaryDecoder,
        types::{check_is_send, check_is_sync},
        vocab::TokenVocab,
    };

    #[test]
    fn test_parallel_decoder() {
        let vocab: TokenVocab<u32> =
            TokenVocab::from_learned(vec![b"he".to_vec(), b"llo".to_vec()]).unwrap();
        let decoder = ParallelRayonDecoder::new(DictionaryDecoder::new(Arc::new(vocab)));
        check_is_send(&decoder);
        check_is_sync(&decoder);

        let batch: Vec<Vec<u32>> = vec![
            vec![2, 260, 261, 3],
            vec![],
            vec![260, 1, 99_999],
            (b"world".iter().map(|&b| b as u32 + 4)).collect(),
        ];

        assert_eq!(
            decoder.decode_batch_to_strings(&batch, true),
            vec![
                "hello".to_string(),
                String::new(),
                "he<UNK>".to_string(),
                "world".to_string(),
            ]
        );
        assert_eq!(
            decoder.decode_batch_to_strings(&batch, false)[0],
            "<BOS>hello<EOS>"
        );
    }
}
