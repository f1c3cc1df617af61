//! # `bytebpe` Byte-Level BPE Tokenizer
//!
//! Trains a byte-level Byte-Pair-Encoding vocabulary from a text corpus,
//! and uses the learned merge rules to encode text to token ids and back.
//!
//! See:
//! * [`pretokenize`] for the chunk splitting pattern merges never cross.
//! * [`training`] to learn a [`vocab::TokenVocab`] and [`vocab::MergeRules`].
//! * [`encoders`] to encode text into tokens.
//! * [`decoders`] to decode tokens into text.
//! * [`vocab::io`] for the on-disk ``vocab.json`` / ``merges.txt`` / ``config.json`` artifacts.
//! * [`Tokenizer`] for the combined load / encode / decode facade.
//!
//! ## Token Layout
//!
//! | ids          | meaning                                   |
//! |--------------|-------------------------------------------|
//! | ``0..=3``    | ``<PAD>``, ``<UNK>``, ``<BOS>``, ``<EOS>`` |
//! | ``4..=259``  | byte ``b`` is token ``b + 4``             |
//! | ``260..``    | learned merges, in priority order         |
//!
//! ## Crate Features
//!
//! #### feature: ``ahash``
//!
//! This swaps all HashMap/HashSet implementations for ``ahash``.
//! Enabled by default.
//!
//! #### feature: ``tracing``
//!
//! This enables a number of ``tracing`` instrumentation points.
//! This is only useful for timing tracing of the library itself.
//!
//! ## Training and Loading
//!
//! ```rust,no_run
//! use bytebpe::{Tokenizer, training::train};
//!
//! fn example() -> bytebpe::BpeResult<()> {
//!     let summary = train("corpus.txt", 1000, "saved", Some(50_000))?;
//!     println!("learned {} merges", summary.num_merges);
//!
//!     let tokenizer: Tokenizer = Tokenizer::from_pretrained("saved")?;
//!     let ids = tokenizer.encode("Hello, world!", true);
//!     assert_eq!(tokenizer.decode(&ids, true), "Hello, world!");
//!     Ok(())
//! }
//! ```
#![warn(missing_docs, unused)]

pub mod decoders;
pub mod encoders;
pub mod errors;
pub mod pretokenize;
pub mod rayon;
pub mod regex;
pub mod tokenizer;
pub mod training;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use errors::{BpeError, BpeResult};
#[doc(inline)]
pub use tokenizer::{Tokenizer, TokenizerConfig};
#[doc(inline)]
pub use types::{Pair, TokenType};
