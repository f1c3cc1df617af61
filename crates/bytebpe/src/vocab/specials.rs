//! # Reserved Special Tokens

use crate::{
    errors::BpeResult,
    types::{TokenType, token_from_usize, token_to_usize},
};

/// Padding token name.
pub const PAD_TOKEN: &str = "<PAD>";

/// Unknown token name; also the payload unknown ids decode to.
pub const UNK_TOKEN: &str = "<UNK>";

/// Beginning-of-sequence token name.
pub const BOS_TOKEN: &str = "<BOS>";

/// End-of-sequence token name.
pub const EOS_TOKEN: &str = "<EOS>";

/// The reserved ``(name, id)`` table, in id order.
pub const SPECIAL_TOKENS: [(&str, usize); 4] =
    [(PAD_TOKEN, 0), (UNK_TOKEN, 1), (BOS_TOKEN, 2), (EOS_TOKEN, 3)];

/// The number of reserved special tokens.
pub const NUM_SPECIAL_TOKENS: usize = SPECIAL_TOKENS.len();

/// Byte ``b`` is token ``b + BYTE_TOKEN_OFFSET``.
pub const BYTE_TOKEN_OFFSET: usize = NUM_SPECIAL_TOKENS;

/// Specials plus the 256 byte tokens; the first merge token.
pub const BASE_VOCAB_SIZE: usize = BYTE_TOKEN_OFFSET + 256;

/// Look up the reserved id of a special token name.
pub fn special_id(name: &str) -> Option<usize> {
    SPECIAL_TOKENS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, id)| id)
}

/// Look up the special token name of a reserved id.
pub fn special_name(id: usize) -> Option<&'static str> {
    SPECIAL_TOKENS
        .iter()
        .find(|(_, i)| *i == id)
        .map(|&(n, _)| n)
}

/// The reserved special tokens, as `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialTokens<T: TokenType> {
    /// ``<PAD>``
    pub pad: T,

    /// ``<UNK>``
    pub unk: T,

    /// ``<BOS>``
    pub bos: T,

    /// ``<EOS>``
    pub eos: T,
}

impl<T: TokenType> SpecialTokens<T> {
    /// Build the reserved table as `T`.
    ///
    /// ## Returns
    /// An error if `T` cannot hold the base vocabulary.
    pub fn try_new() -> BpeResult<Self> {
        token_from_usize::<T>(BASE_VOCAB_SIZE - 1)?;
        Ok(Self {
            pad: token_from_usize(SPECIAL_TOKENS[0].1)?,
            unk: token_from_usize(SPECIAL_TOKENS[1].1)?,
            bos: token_from_usize(SPECIAL_TOKENS[2].1)?,
            eos: token_from_usize(SPECIAL_TOKENS[3].1)?,
        })
    }

    /// The special tokens, in id order.
    pub fn as_array(&self) -> [T; 4] {
        [self.pad, self.unk, self.bos, self.eos]
    }

    /// Is `token` one of the reserved special tokens?
    #[inline(always)]
    pub fn contains(
        &self,
        token: T,
    ) -> bool {
        token_to_usize(token) < NUM_SPECIAL_TOKENS
    }
}
