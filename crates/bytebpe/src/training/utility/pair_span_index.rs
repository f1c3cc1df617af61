//! # `PairIndex` Builder

use rayon::prelude::*;

use crate::{
    training::{CountType, utility::token_span_buffer::TokenSpanBuf},
    types::{CommonHashMap, CommonHashSet, Pair, TokenType},
};

/// A map from [`Pair`] to its occurrence count.
pub type PairCountMap<T, C> = CommonHashMap<Pair<T>, C>;

/// A map from [`Pair`] to indices over ``spans``.
pub type PairIndexMap<T> = CommonHashMap<Pair<T>, CommonHashSet<usize>>;

/// An index of ``(T, T)`` pair information relative to a ``&[TokenSpanBuf<T>]``.
///
/// Indexes form a commutative monoid under [`PairSpanIndex::merge`]:
/// counts are summed, and span index sets are unioned.
#[derive(Debug, Clone)]
pub struct PairSpanIndex<T: TokenType, C: CountType> {
    /// A map from [`Pair`] to its occurrence count.
    ///
    /// ``sum(spans[i].pair_count(pair) * counts[i]) for all i``
    pub pair_counts: PairCountMap<T, C>,

    /// A map from [`Pair`] to span indices.
    pub pair_index: PairIndexMap<T>,
}

impl<T: TokenType, C: CountType> Default for PairSpanIndex<T, C> {
    fn default() -> Self {
        Self {
            pair_counts: PairCountMap::default(),
            pair_index: PairIndexMap::default(),
        }
    }
}

impl<T: TokenType, C: CountType> PairSpanIndex<T, C> {
    /// Build a [`PairSpanIndex`] from a slice of [`TokenSpanBuf`]s, using a count table.
    ///
    /// # Arguments
    /// * `spans` - a sequence of text spans; assumed to be unique.
    /// * `counts` - `counts[i]` is the count of `spans[i]`.
    pub fn from_span_count_table(
        spans: &[TokenSpanBuf<T>],
        counts: &[C],
    ) -> Self {
        Self::from_span_partition(0, spans, counts)
    }

    /// Index one partition of a span table.
    ///
    /// # Arguments
    /// * `offset` - the table index of `spans[0]`.
    /// * `spans` - the partition's spans.
    /// * `counts` - the partition's counts.
    fn from_span_partition(
        offset: usize,
        spans: &[TokenSpanBuf<T>],
        counts: &[C],
    ) -> Self {
        let size_hint = spans.len() / 8;

        let mut index = PairSpanIndex {
            pair_counts: PairCountMap::with_capacity(size_hint),
            pair_index: PairIndexMap::with_capacity(size_hint),
        };

        let zero = C::zero();

        for (idx, (span, &count)) in spans.iter().zip(counts).enumerate() {
            if count > zero && span.len() >= 2 {
                for p in span.pairs() {
                    *index.pair_counts.entry(p).or_default() += count;
                    index.pair_index.entry(p).or_default().insert(offset + idx);
                }
            }
        }

        index
    }

    /// Build a [`PairSpanIndex`] in parallel on the current rayon pool.
    ///
    /// The table is split into partitions of at least `min_partition_size`
    /// spans; each is indexed independently and the results are merged.
    /// The result is identical to [`Self::from_span_count_table`].
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(spans, counts)))]
    pub fn par_from_span_count_table(
        spans: &[TokenSpanBuf<T>],
        counts: &[C],
        min_partition_size: usize,
    ) -> Self {
        let threads = rayon::current_num_threads().max(1);
        let partition_size = spans
            .len()
            .div_ceil(threads)
            .max(min_partition_size)
            .max(1);

        log::debug!(
            "Counting pairs over {} spans in partitions of {}",
            spans.len(),
            partition_size
        );

        spans
            .par_chunks(partition_size)
            .zip(counts.par_chunks(partition_size))
            .enumerate()
            .map(|(part, (spans, counts))| {
                Self::from_span_partition(part * partition_size, spans, counts)
            })
            .reduce(Self::default, Self::merge)
    }

    /// Merge two indexes; counts are summed and span sets unioned.
    pub fn merge(
        mut self,
        mut other: Self,
    ) -> Self {
        if self.pair_counts.len() < other.pair_counts.len() {
            core::mem::swap(&mut self, &mut other);
        }

        for (pair, count) in other.pair_counts {
            *self.pair_counts.entry(pair).or_default() += count;
        }
        for (pair, indices) in other.pair_index {
            self.pair_index.entry(pair).or_default().extend(indices);
        }
        self
    }

    /// The most frequent pair with a positive count.
    ///
    /// Ties are broken by the smallest ``(left, right)`` pair.
    pub fn best_pair(&self) -> Option<(Pair<T>, C)> {
        let zero = C::zero();
        self.pair_counts
            .iter()
            .filter(|&(_, &count)| count > zero)
            .max_by(|(pa, ca), (pb, cb)| ca.cmp(cb).then_with(|| pb.cmp(pa)))
            .map(|(&pair, &count)| (pair, count))
    }

    /// The `k` most frequent pairs with positive counts.
    ///
    /// Sorted by count descending, then by pair ascending.
    pub fn top_pairs(
        &self,
        k: usize,
    ) -> Vec<(Pair<T>, C)> {
        let zero = C::zero();
        let mut pairs: Vec<(Pair<T>, C)> = self
            .pair_counts
            .iter()
            .filter(|&(_, &count)| count > zero)
            .map(|(&pair, &count)| (pair, count))
            .collect();
        pairs.sort_by(|(pa, ca), (pb, cb)| cb.cmp(ca).then_with(|| pa.cmp(pb)));
        pairs.truncate(k);
        pairs
    }
}
