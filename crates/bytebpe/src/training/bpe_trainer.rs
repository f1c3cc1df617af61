//! # Vocab Trainer

use core::panic::AssertUnwindSafe;
use std::{
    io::BufRead,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use compact_str::CompactString;

use crate::{
    errors::{BpeError, BpeResult},
    pretokenize::{PRETOKENIZE_PATTERN, Pretokenizer},
    regex::RegexWrapperPattern,
    training::{
        CountType, StringChunkType,
        utility::{PairSpanIndex, TextSpanCounter, TokenSpanBuf},
    },
    types::{Pair, TokenType, token_from_usize},
    vocab::{MergeRule, MergeRules, TokenVocab, io::vocab_json::token_string},
};

/// Default minimum number of spans per pair counting partition.
pub const DEFAULT_MIN_PARTITION_SIZE: usize = 1_000;

/// Options for [`BpeTrainer`].
#[derive(Debug, Clone)]
pub struct BpeTrainerOptions {
    /// The regex pattern used for text splitting.
    pub pattern: RegexWrapperPattern,

    /// The target vocab size, including the 260 base tokens.
    pub vocab_size: usize,

    /// Read at most this many corpus lines.
    pub max_lines: Option<usize>,

    /// Pair counting threads; ``0`` selects the rayon default.
    pub num_threads: usize,

    /// Minimum number of spans per pair counting partition.
    pub min_partition_size: usize,

    /// When set, training stops before the next merge.
    pub interrupt: Option<Arc<AtomicBool>>,
}

impl BpeTrainerOptions {
    /// Create new options, splitting on [`PRETOKENIZE_PATTERN`].
    ///
    /// ## Arguments
    /// * `vocab_size` - The target vocabulary size.
    pub fn new(vocab_size: usize) -> Self {
        Self {
            pattern: PRETOKENIZE_PATTERN.into(),
            vocab_size,
            max_lines: None,
            num_threads: 0,
            min_partition_size: DEFAULT_MIN_PARTITION_SIZE,
            interrupt: None,
        }
    }

    /// Sets the vocab size.
    pub fn with_vocab_size(
        self,
        vocab_size: usize,
    ) -> Self {
        Self { vocab_size, ..self }
    }

    /// Sets the regex pattern used for text splitting.
    pub fn with_pattern<P: Into<RegexWrapperPattern>>(
        self,
        pattern: P,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            ..self
        }
    }

    /// Sets the corpus line limit.
    pub fn with_max_lines(
        self,
        max_lines: Option<usize>,
    ) -> Self {
        Self { max_lines, ..self }
    }

    /// Sets the number of pair counting threads; ``0`` is the rayon default.
    pub fn with_num_threads(
        self,
        num_threads: usize,
    ) -> Self {
        Self {
            num_threads,
            ..self
        }
    }

    /// Sets the minimum number of spans per counting partition.
    pub fn with_min_partition_size(
        self,
        min_partition_size: usize,
    ) -> Self {
        Self {
            min_partition_size: min_partition_size.max(1),
            ..self
        }
    }

    /// Sets the interrupt flag, checked between merges.
    pub fn with_interrupt(
        self,
        interrupt: Arc<AtomicBool>,
    ) -> Self {
        Self {
            interrupt: Some(interrupt),
            ..self
        }
    }

    /// Initializes a [`BpeTrainer`] from these options.
    ///
    /// ## Returns
    /// An error if the pattern does not compile.
    pub fn init<K, C>(self) -> BpeResult<BpeTrainer<K, C>>
    where
        K: StringChunkType,
        C: CountType,
    {
        BpeTrainer::new(self)
    }
}

/// Why training stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingStop {
    /// The vocabulary reached the target size.
    TargetReached,

    /// No adjacent pair remained to merge.
    Exhausted,

    /// The interrupt flag was raised.
    Interrupted,
}

/// Basic BPE train results.
#[derive(Debug, Clone)]
pub struct TrainResults<T: TokenType> {
    /// The trained vocabulary.
    pub vocab: TokenVocab<T>,

    /// The learned merge rules, in priority order.
    pub merges: MergeRules<T>,

    /// Why training stopped.
    pub stop: TrainingStop,
}

/// Trainer for learning byte-level BPE merges.
///
/// # Parameters
/// * `K` - the type used to store strings in the chunk counts.
/// * `C` - the type used to store counts.
pub struct BpeTrainer<K = CompactString, C = u64>
where
    K: StringChunkType,
    C: CountType,
{
    /// Trainer options.
    pub options: BpeTrainerOptions,

    /// The chunk counter.
    pub span_counter: TextSpanCounter<K, C>,
}

impl<K, C> BpeTrainer<K, C>
where
    K: StringChunkType,
    C: CountType,
{
    /// Initializes a [`BpeTrainer`].
    pub fn new(options: BpeTrainerOptions) -> BpeResult<Self> {
        let pretokenizer = Pretokenizer::from_pattern(options.pattern.clone())?;
        Ok(BpeTrainer {
            options,
            span_counter: TextSpanCounter::new(pretokenizer),
        })
    }

    /// Update chunk counts inplace from a sample iterator.
    ///
    /// ## Arguments
    /// * `samples` - An iterator over string-like samples.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, samples)))]
    pub fn update_from_samples<I>(
        &mut self,
        samples: I,
    ) where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.span_counter.update_from_samples(samples);
    }

    /// Update chunk counts from a line reader, honoring `max_lines`.
    ///
    /// ## Returns
    /// ``(lines, chunks)`` read.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, reader)))]
    pub fn update_from_reader<R: BufRead>(
        &mut self,
        reader: R,
    ) -> BpeResult<(usize, usize)> {
        self.span_counter
            .update_from_reader(reader, self.options.max_lines)
    }

    /// The `k` most frequent adjacent pairs of the initial corpus.
    ///
    /// Sorted by count descending, then by pair ascending.
    pub fn top_pairs<T: TokenType>(
        &self,
        k: usize,
    ) -> BpeResult<Vec<(Pair<T>, C)>> {
        let vocab: TokenVocab<T> = TokenVocab::new()?;
        let (spans, counts) = self.span_counter.to_span_count_table(vocab.byte_vocab());
        Ok(PairSpanIndex::<T, C>::from_span_count_table(&spans, &counts).top_pairs(k))
    }

    /// Trains a [`TokenVocab<T>`] and its [`MergeRules<T>`].
    ///
    /// Each merge recounts every pair in parallel, selects the most frequent
    /// (smallest pair on ties), defines its token, and rewrites the spans
    /// containing it.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn train<T: TokenType>(self) -> BpeResult<TrainResults<T>> {
        let vocab_size = self.options.vocab_size;
        let mut vocab: TokenVocab<T> = TokenVocab::new()?;
        let mut merges: MergeRules<T> = MergeRules::new();

        let num_merges = vocab_size.saturating_sub(vocab.len());
        if num_merges == 0 {
            log::warn!(
                "Target vocab size {vocab_size} leaves no room for merges; keeping the {} base tokens",
                vocab.len()
            );
            return Ok(TrainResults {
                vocab,
                merges,
                stop: TrainingStop::TargetReached,
            });
        }
        token_from_usize::<T>(vocab_size - 1)?;

        log::info!("Starting BPE training: {num_merges} merges to compute");

        let (mut spans, counts): (Vec<TokenSpanBuf<T>>, Vec<C>) = self
            .span_counter
            .to_span_count_table(vocab.byte_vocab());
        log::info!("Training over {} distinct chunks", spans.len());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.num_threads)
            .thread_name(|idx| format!("bpe-count-{idx}"))
            .build()?;

        let mut stop = TrainingStop::TargetReached;
        let mut last_log_percent = 0;

        while vocab.len() < vocab_size {
            if self
                .options
                .interrupt
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
            {
                log::warn!("Training interrupted after {} merges", merges.len());
                stop = TrainingStop::Interrupted;
                break;
            }

            let index = count_pairs(&pool, &spans, &counts, self.options.min_partition_size)?;

            let Some((pair, count)) = index.best_pair() else {
                log::warn!("No more pairs to merge after {} merges", merges.len());
                stop = TrainingStop::Exhausted;
                break;
            };

            let (a, b) = pair;
            let mut payload = vocab.payload_or_unk(a).to_vec();
            payload.extend_from_slice(vocab.payload_or_unk(b));
            let token = vocab.define(payload)?;

            let rule = MergeRule::new(pair, token);
            merges.push(rule)?;

            if let Some(indices) = index.pair_index.get(&pair) {
                for &idx in indices {
                    spans[idx].merge_pair(&rule);
                }
            }

            let merges_done = merges.len();
            if log::log_enabled!(log::Level::Debug) {
                log::debug!(
                    "Merge {merges_done}/{num_merges}: {:?} + {:?} -> {:?} ({token}) frequency={count}",
                    token_string(&vocab, a).unwrap_or_default(),
                    token_string(&vocab, b).unwrap_or_default(),
                    token_string(&vocab, token).unwrap_or_default(),
                );
            }

            // Log progress every 1%
            let current_percent = (merges_done * 100) / num_merges;
            if current_percent > last_log_percent {
                log::info!(
                    "Progress: {}% ({}/{} merges) - Last merge: {:?} -> {} (frequency: {})",
                    current_percent,
                    merges_done,
                    num_merges,
                    pair,
                    token,
                    count
                );
                last_log_percent = current_percent;
            }
        }

        log::info!(
            "Finished training: {} merges completed, vocab size {}",
            merges.len(),
            vocab.len()
        );
        Ok(TrainResults {
            vocab,
            merges,
            stop,
        })
    }
}

/// Count pairs on `pool`.
fn count_pairs<T: TokenType, C: CountType>(
    pool: &rayon::ThreadPool,
    spans: &[TokenSpanBuf<T>],
    counts: &[C],
    min_partition_size: usize,
) -> BpeResult<PairSpanIndex<T, C>> {
    run_on_pool(pool, || {
        PairSpanIndex::par_from_span_count_table(spans, counts, min_partition_size)
    })
}

/// Run `op` on `pool`; a panicking worker fails the whole job.
fn run_on_pool<R, F>(
    pool: &rayon::ThreadPool,
    op: F,
) -> BpeResult<R>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    std::panic::catch_unwind(AssertUnwindSafe(|| pool.install(op))).map_err(|panic| {
        let reason = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "worker panicked".to_string());
        BpeError::WorkerFailure(reason)
    })
}
