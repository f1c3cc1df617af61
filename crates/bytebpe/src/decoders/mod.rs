//! # Token Decoders
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use bytebpe::{
//!     TokenType,
//!     decoders::{DictionaryDecoder, TokenDecoder},
//!     vocab::TokenVocab,
//! };
//!
//! fn example<T: TokenType>(
//!     vocab: Arc<TokenVocab<T>>,
//!     batch: &[Vec<T>],
//! ) -> Vec<String> {
//!     let decoder = DictionaryDecoder::new(vocab);
//!     decoder.decode_batch_to_strings(batch, true)
//! }
//! ```

mod dictionary_decoder;
mod token_decoder;

#[doc(inline)]
pub use dictionary_decoder::DictionaryDecoder;
#[doc(inline)]
pub use token_decoder::TokenDecoder;
