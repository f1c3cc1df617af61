//! # Vocabulary
//!
//! This module provides the vocabulary and related io mechanisms.
//!
//! ## Layout
//!
//! The reserved specials and the byte table are fixed, see [`specials`]:
//! * ``0..4`` - ``<PAD> <UNK> <BOS> <EOS>``,
//! * ``4..260`` - byte ``b`` is token ``b + 4``, see [`ByteMapVocab`].
//!
//! Training appends to this base:
//! * [`TokenVocab`] - the ``{ T <-> Vec<u8> }`` bijection,
//! * [`MergeRules`] - the ordered ``{ (T, T) -> T }`` merge list.

pub mod byte_vocab;
pub mod io;
pub mod merge_rules;
pub mod specials;
pub mod token_vocab;

#[doc(inline)]
pub use byte_vocab::ByteMapVocab;
#[doc(inline)]
pub use merge_rules::{MergeRule, MergeRules};
#[doc(inline)]
pub use specials::SpecialTokens;
#[doc(inline)]
pub use token_vocab::TokenVocab;
