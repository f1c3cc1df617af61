//! # Vocabulary Training
//!
//! Support for training byte-level BPE vocabularies.
//!
//! Training:
//! 1. pretokenizes the corpus and counts each distinct chunk,
//! 2. maps chunks to byte tokens (``b + 4``),
//! 3. repeatedly counts adjacent pairs (in parallel), merges the most
//!    frequent pair into a new token, and rewrites the affected chunks,
//! 4. stops at the target vocab size, when no pairs remain, or when
//!    interrupted.
//!
//! The most frequent pair wins; ties go to the smallest ``(left, right)``
//! pair, so the learned merges do not depend on thread or partition counts.
//!
//! ## Training Example
//!
//! ```rust,no_run
//! use std::{fs::File, io::BufReader};
//!
//! use bytebpe::{
//!     Tokenizer,
//!     training::{BpeTrainer, BpeTrainerOptions, TrainingStop},
//! };
//!
//! fn example() -> bytebpe::BpeResult<Tokenizer> {
//!     let options = BpeTrainerOptions::new(10_000)
//!         .with_max_lines(Some(50_000))
//!         .with_num_threads(4);
//!
//!     let mut trainer: BpeTrainer = options.init()?;
//!     trainer.update_from_reader(BufReader::new(File::open("corpus.txt")?))?;
//!
//!     let results = trainer.train::<u32>()?;
//!     if results.stop != TrainingStop::TargetReached {
//!         println!("stopped early: {:?}", results.stop);
//!     }
//!
//!     let tokenizer = Tokenizer::from_parts(results.vocab, results.merges)?;
//!     tokenizer.save("saved")?;
//!     Ok(tokenizer)
//! }
//! ```

use std::{fs::File, io::BufReader, path::Path};

pub mod utility;

mod bpe_trainer;
mod training_types;

#[doc(inline)]
pub use bpe_trainer::{
    BpeTrainer, BpeTrainerOptions, DEFAULT_MIN_PARTITION_SIZE, TrainResults, TrainingStop,
};
#[doc(inline)]
pub use training_types::{CountType, StringChunkType};

use crate::{
    errors::{BpeError, BpeResult},
    tokenizer::TokenizerConfig,
    vocab::io::save_model_dir,
};

/// Summary of a [`train`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainSummary {
    /// The final vocabulary size.
    pub vocab_size: usize,

    /// The number of learned merges.
    pub num_merges: usize,

    /// Why training stopped.
    pub stop: TrainingStop,
}

/// Train on a corpus file and save the model directory.
///
/// ## Arguments
/// * `corpus_path` - a UTF-8 text file.
/// * `vocab_size` - the target vocab size, including the 260 base tokens.
/// * `save_dir` - where to write ``vocab.json``, ``merges.txt`` and ``config.json``.
/// * `max_lines` - read at most this many corpus lines.
pub fn train<C, S>(
    corpus_path: C,
    vocab_size: usize,
    save_dir: S,
    max_lines: Option<usize>,
) -> BpeResult<TrainSummary>
where
    C: AsRef<Path>,
    S: AsRef<Path>,
{
    let options = BpeTrainerOptions::new(vocab_size).with_max_lines(max_lines);
    train_with_options(corpus_path, save_dir, options)
}

/// Train on a corpus file with explicit options, and save the model directory.
pub fn train_with_options<C, S>(
    corpus_path: C,
    save_dir: S,
    options: BpeTrainerOptions,
) -> BpeResult<TrainSummary>
where
    C: AsRef<Path>,
    S: AsRef<Path>,
{
    let corpus_path = corpus_path.as_ref();
    let target_vocab_size = options.vocab_size;

    log::info!("Loading corpus from {}", corpus_path.display());
    let file = File::open(corpus_path).map_err(|e| BpeError::load(corpus_path, e))?;

    let mut trainer: BpeTrainer = options.init()?;
    let (lines, chunks) = trainer.update_from_reader(BufReader::new(file))?;
    log::info!(
        "Pretokenized {lines} lines into {chunks} chunks ({} distinct)",
        trainer.span_counter.len()
    );

    let results = trainer.train::<u32>()?;

    let config = TokenizerConfig::describe(&results.vocab, &results.merges, Some(target_vocab_size));
    save_model_dir(save_dir.as_ref(), &results.vocab, &results.merges, &config)?;

    Ok(TrainSummary {
        vocab_size: results.vocab.len(),
        num_merges: results.merges.len(),
        stop: results.stop,
    })
}
