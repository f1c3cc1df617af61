//! # Token Vocabulary ``{ T <-> Vec<u8> }``

use crate::{
    errors::{BpeError, BpeResult},
    types::{CommonHashMap, TokenType, token_from_usize, token_to_usize},
    vocab::{
        byte_vocab::ByteMapVocab,
        specials::{BASE_VOCAB_SIZE, NUM_SPECIAL_TOKENS, SPECIAL_TOKENS, SpecialTokens, UNK_TOKEN},
    },
};

/// Bidirectional ``id <-> payload`` vocabulary.
///
/// * ids ``0..4`` are the reserved specials; their payloads are their names,
///   and they are not reachable by payload lookup.
/// * ids ``4..260`` are the single byte payloads.
/// * ids ``260..`` are defined by training, in creation order.
///
/// Ids are dense, and no two ids share a payload.
/// The vocabulary only grows; existing entries never change.
#[derive(Debug, Clone)]
pub struct TokenVocab<T: TokenType> {
    byte_vocab: ByteMapVocab<T>,
    specials: SpecialTokens<T>,

    /// ``payloads[id]`` is the payload of token ``id``.
    payloads: Vec<Vec<u8>>,

    /// ``{ payload -> id }`` for non-special tokens.
    index: CommonHashMap<Vec<u8>, T>,
}

impl<T: TokenType> TokenVocab<T> {
    /// Build the base vocabulary: 4 specials and 256 byte tokens.
    pub fn new() -> BpeResult<Self> {
        let byte_vocab = ByteMapVocab::new()?;
        let specials = SpecialTokens::try_new()?;

        let mut payloads: Vec<Vec<u8>> = Vec::with_capacity(BASE_VOCAB_SIZE);
        payloads.extend(SPECIAL_TOKENS.iter().map(|(name, _)| name.as_bytes().to_vec()));

        let mut index = CommonHashMap::with_capacity(BASE_VOCAB_SIZE);
        for byte in 0..=255_u8 {
            index.insert(vec![byte], byte_vocab.get_token(byte));
            payloads.push(vec![byte]);
        }

        Ok(Self {
            byte_vocab,
            specials,
            payloads,
            index,
        })
    }

    /// Rebuild a vocabulary from its learned payloads.
    ///
    /// ## Arguments
    /// * `learned` - payloads for ids ``260..``, in id order.
    pub fn from_learned<I>(learned: I) -> BpeResult<Self>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let mut vocab = Self::new()?;
        for payload in learned {
            vocab.define(payload)?;
        }
        Ok(vocab)
    }

    /// The byte table.
    pub fn byte_vocab(&self) -> &ByteMapVocab<T> {
        &self.byte_vocab
    }

    /// The reserved special tokens.
    pub fn specials(&self) -> &SpecialTokens<T> {
        &self.specials
    }

    /// The number of defined tokens.
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    /// Always false; the base entries are always present.
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// The highest defined token.
    pub fn max_token(&self) -> T {
        // Construction guarantees `T` holds every defined id.
        T::from_usize(self.len() - 1).unwrap_or_else(T::max_value)
    }

    /// Look up the token owning `payload`, if any.
    pub fn lookup(
        &self,
        payload: &[u8],
    ) -> Option<T> {
        self.index.get(payload).copied()
    }

    /// Look up the token owning `payload`, falling back to ``<UNK>``.
    pub fn id_for(
        &self,
        payload: &[u8],
    ) -> T {
        self.lookup(payload).unwrap_or(self.specials.unk)
    }

    /// Get the payload of `token`, if defined.
    pub fn payload_for(
        &self,
        token: T,
    ) -> Option<&[u8]> {
        self.payloads.get(token_to_usize(token)).map(Vec::as_slice)
    }

    /// Get the payload of `token`, falling back to the ``<UNK>`` payload.
    pub fn payload_or_unk(
        &self,
        token: T,
    ) -> &[u8] {
        self.payload_for(token).unwrap_or(UNK_TOKEN.as_bytes())
    }

    /// Is `token` a reserved special token?
    pub fn is_special(
        &self,
        token: T,
    ) -> bool {
        self.specials.contains(token)
    }

    /// Append a new token for `payload`, assigning the next sequential id.
    ///
    /// ## Returns
    /// * the new token;
    /// * [`BpeError::DuplicatePayload`] if `payload` is already defined;
    /// * [`BpeError::VocabSizeOverflow`] if `T` cannot hold the new id.
    pub fn define(
        &mut self,
        payload: Vec<u8>,
    ) -> BpeResult<T> {
        if let Some(&token) = self.index.get(&payload) {
            return Err(BpeError::DuplicatePayload {
                payload,
                token: token_to_usize(token) as u64,
            });
        }
        let token: T = token_from_usize(self.payloads.len())?;
        self.index.insert(payload.clone(), token);
        self.payloads.push(payload);
        Ok(token)
    }

    /// Iterate over ``(token, payload)`` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (T, &[u8])> + '_ {
        self.payloads.iter().enumerate().map(|(id, payload)| {
            (
                T::from_usize(id).unwrap_or_else(T::max_value),
                payload.as_slice(),
            )
        })
    }

    /// Iterate over the learned payloads (ids ``260..``) in id order.
    pub fn learned_payloads(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.payloads[BASE_VOCAB_SIZE..].iter().map(Vec::as_slice)
    }

    /// The number of learned (merge) tokens.
    pub fn num_learned(&self) -> usize {
        self.len() - BASE_VOCAB_SIZE
    }

    /// The number of special tokens.
    pub fn num_specials(&self) -> usize {
        NUM_SPECIAL_TOKENS
    }
}
