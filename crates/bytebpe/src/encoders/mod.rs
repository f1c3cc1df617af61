//! # Token Encoders
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use bytebpe::{
//!     TokenType,
//!     encoders::{MergeScanEncoder, TokenEncoder},
//!     vocab::{MergeRules, TokenVocab},
//! };
//!
//! fn example<T: TokenType>(
//!     vocab: Arc<TokenVocab<T>>,
//!     merges: Arc<MergeRules<T>>,
//!     batch: &[&str],
//! ) -> bytebpe::BpeResult<Vec<Vec<T>>> {
//!     let encoder = MergeScanEncoder::new(vocab, merges)?;
//!     Ok(encoder.encode_batch(batch, false))
//! }
//! ```

mod merge_scan_encoder;
mod token_encoder;

#[doc(inline)]
pub use merge_scan_encoder::MergeScanEncoder;
#[doc(inline)]
pub use token_encoder::{EXPECTED_BYTES_PER_TOKEN, TokenEncoder};
