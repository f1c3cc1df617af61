//! # Combined Tokenizer
//!
//! [`Tokenizer`] loads a saved model directory and serves encode / decode;
//! [`TokenizerConfig`] is the ``config.json`` record saved beside it.

mod tokenizer_config;
mod tokenizer_impl;

#[doc(inline)]
pub use tokenizer_config::{TokenizerConfig, default_special_tokens};
#[doc(inline)]
pub use tokenizer_impl::Tokenizer;
