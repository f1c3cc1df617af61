//! # Byte/Token Mapping Table
//!
//! The 256 base symbols. Byte ``b`` is always token ``b + 4``; the
//! ids below are the reserved special tokens.

use core::fmt::Debug;

use crate::{
    errors::BpeResult,
    types::{TokenType, token_from_usize, token_to_usize},
    vocab::specials::BYTE_TOKEN_OFFSET,
};

/// ``0..=255`` Byte/Token Bijection Table.
///
/// Byte ``b`` maps to token ``b + 4``.
#[derive(Clone, PartialEq)]
pub struct ByteMapVocab<T: TokenType> {
    /// Table mapping from byte ordinal (position) to token.
    byte_tokens: [T; 256],
}

impl<T: TokenType> Debug for ByteMapVocab<T> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("ByteTable")
            .field("first_token", &self.byte_tokens[0])
            .field("last_token", &self.byte_tokens[255])
            .finish()
    }
}

impl<T: TokenType> ByteMapVocab<T> {
    /// Build the byte table.
    ///
    /// ## Returns
    /// An error if `T` cannot hold token ``255 + 4``.
    pub fn new() -> BpeResult<Self> {
        let mut byte_tokens = [T::zero(); 256];
        for (byte, slot) in byte_tokens.iter_mut().enumerate() {
            *slot = token_from_usize(byte + BYTE_TOKEN_OFFSET)?;
        }
        Ok(Self { byte_tokens })
    }

    /// Get the byte-ord => token mapping table.
    pub fn byte_tokens(&self) -> &[T; 256] {
        &self.byte_tokens
    }

    /// Get the token corresponding to a given byte.
    #[inline(always)]
    pub fn get_token(
        &self,
        byte: u8,
    ) -> T {
        self.byte_tokens[byte as usize]
    }

    /// Append the translated byte tokens to a target buffer.
    ///
    /// ## Arguments
    /// * `bytes` - The slice of bytes to translate and append.
    /// * `tokens` - The target token buffer.
    #[inline(always)]
    pub fn append_tokens(
        &self,
        bytes: &[u8],
        tokens: &mut Vec<T>,
    ) {
        tokens.extend(bytes.iter().map(|&b| self.get_token(b)));
    }

    /// Get the byte corresponding to a given token, if it is a byte token.
    #[inline(always)]
    pub fn get_byte(
        &self,
        token: T,
    ) -> Option<u8> {
        token_to_usize(token)
            .checked_sub(BYTE_TOKEN_OFFSET)
            .and_then(|b| u8::try_from(b).ok())
    }
}

/// The lossless text-to-bytes transform applied to each chunk (UTF-8).
pub fn encode_bytes(chunk: &str) -> &[u8] {
    chunk.as_bytes()
}

/// Interpret concatenated token payloads as text.
///
/// ## Returns
/// [`crate::BpeError::Decode`] if `bytes` is not valid UTF-8.
pub fn decode_bytes(bytes: Vec<u8>) -> BpeResult<String> {
    Ok(String::from_utf8(bytes)?)
}

/// Interpret concatenated token payloads as text,
/// replacing invalid sequences with ``U+FFFD``.
pub fn decode_bytes_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BpeError;

    #[test]
    fn test_byte_vocab() {
        type T = u32;
        let table: ByteMapVocab<T> = ByteMapVocab::new().unwrap();

        for idx in 0..256 {
            let byte = idx as u8;
            let token = idx as u32 + 4;

            assert_eq!(table.get_token(byte), token);
            assert_eq!(table.byte_tokens()[idx], token);
            assert_eq!(table.get_byte(token), Some(byte));
        }

        assert_eq!(table.get_byte(3), None);
        assert_eq!(table.get_byte(260), None);

        assert_eq!(
            format!("{:?}", table),
            "ByteTable { first_token: 4, last_token: 259 }"
        );
    }

    #[test]
    fn test_byte_vocab_overflow() {
        assert!(matches!(
            ByteMapVocab::<u8>::new(),
            Err(BpeError::VocabSizeOverflow { size: 257 })
        ));
    }

    #[test]
    fn test_append_tokens() {
        let table: ByteMapVocab<u16> = ByteMapVocab::new().unwrap();
        let mut tokens = vec![2];
        table.append_tokens(encode_bytes("Hi"), &mut tokens);
        assert_eq!(tokens, vec![2, 72 + 4, 105 + 4]);
    }

    #[test]
    fn test_decode_bytes() {
        assert_eq!(decode_bytes("héllo".as_bytes().to_vec()).unwrap(), "héllo");
        assert!(matches!(
            decode_bytes(vec![0xE2, 0x98]),
            Err(BpeError::Decode(_))
        ));

        assert_eq!(decode_bytes_lossy(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
        assert_eq!(decode_bytes_lossy(&[]), "");
    }
}
