//! # Common Types and Traits
use core::{
    fmt::{Debug, Display},
    hash::Hash,
};

use num_traits::{FromPrimitive, PrimInt, ToPrimitive, Unsigned};

use crate::errors::{BpeError, BpeResult};

/// A type that can be used as a token id.
///
/// These are constrained to be unsigned primitive integers;
/// such that the max token in a vocabulary is less than `T::max()`.
pub trait TokenType:
    'static
    + PrimInt
    + FromPrimitive
    + ToPrimitive
    + Unsigned
    + Hash
    + Default
    + Debug
    + Display
    + Send
    + Sync
{
}

impl<T> TokenType for T where
    T: 'static
        + PrimInt
        + FromPrimitive
        + ToPrimitive
        + Unsigned
        + Hash
        + Default
        + Debug
        + Display
        + Send
        + Sync
{
}

/// A pair of tokens.
pub type Pair<T> = (T, T);

/// Convert a `usize` id into `T`, failing when `T` is too narrow.
pub fn token_from_usize<T: TokenType>(id: usize) -> BpeResult<T> {
    T::from_usize(id).ok_or(BpeError::VocabSizeOverflow { size: id + 1 })
}

/// Convert a token to a `usize` index.
///
/// Every [`TokenType`] is an unsigned primitive no wider than 64 bits.
#[inline(always)]
pub fn token_to_usize<T: TokenType>(token: T) -> usize {
    token.to_usize().unwrap_or(usize::MAX)
}

cfg_if::cfg_if! {
    if #[cfg(feature = "ahash")] {
        /// Type Alias for hash maps in this crate.
        pub type CommonHashMap<K, V> = ahash::AHashMap<K, V>;

        /// Type Alias for hash sets in this crate.
        pub type CommonHashSet<V> = ahash::AHashSet<V>;
    } else {
        /// Type Alias for hash maps in this crate.
        pub type CommonHashMap<K, V> = std::collections::HashMap<K, V>;

        /// Type Alias for hash sets in this crate.
        pub type CommonHashSet<V> = std::collections::HashSet<V>;
    }
}

#[cfg(test)]
pub(crate) fn check_is_send<S: Send>(_: &S) {}

#[cfg(test)]
pub(crate) fn check_is_sync<S: Sync>(_: &S) {}

#[cfg(test)]
mod tests {
    use core::marker::PhantomData;

    use super::*;

    #[test]
    fn test_common_token_types() {
        struct IsToken<T: TokenType>(PhantomData<T>);

        let _: IsToken<u16>;
        let _: IsToken<u32>;
        let _: IsToken<u64>;
        let _: IsToken<usize>;
    }

    #[test]
    fn test_token_from_usize() {
        assert_eq!(token_from_usize::<u16>(300).unwrap(), 300_u16);
        assert!(matches!(
            token_from_usize::<u8>(300),
            Err(BpeError::VocabSizeOverflow { size: 301 })
        ));
        assert_eq!(token_to_usize(300_u32), 300);
    }
}
