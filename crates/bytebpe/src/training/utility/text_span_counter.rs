//! # Chunk Counter

use std::io::BufRead;

use crate::{
    errors::BpeResult,
    pretokenize::Pretokenizer,
    training::{CountType, StringChunkType, utility::token_span_buffer::TokenSpanBuf},
    types::{CommonHashMap, TokenType},
    vocab::ByteMapVocab,
};

/// Counts distinct pretokenized chunks.
pub struct TextSpanCounter<K, C>
where
    K: StringChunkType,
    C: CountType,
{
    /// The chunk splitter.
    pub pretokenizer: Pretokenizer,

    /// The chunk counts.
    pub chunk_counts: CommonHashMap<K, C>,
}

impl<K, C> TextSpanCounter<K, C>
where
    K: StringChunkType,
    C: CountType,
{
    /// Create a new chunk counter.
    pub fn new(pretokenizer: Pretokenizer) -> Self {
        Self {
            pretokenizer,
            chunk_counts: CommonHashMap::with_capacity(10_000),
        }
    }

    /// Release the chunk counts and return them.
    pub fn release(self) -> CommonHashMap<K, C> {
        self.chunk_counts
    }

    /// The number of distinct chunks seen.
    pub fn len(&self) -> usize {
        self.chunk_counts.len()
    }

    /// Has nothing been counted?
    pub fn is_empty(&self) -> bool {
        self.chunk_counts.is_empty()
    }

    /// Update chunk counts inplace from text.
    ///
    /// ## Returns
    /// The number of chunks in `text`.
    pub fn update_from_text<S: AsRef<str>>(
        &mut self,
        text: S,
    ) -> usize {
        let chunk_counts = &mut self.chunk_counts;
        let mut seen = 0;
        for piece in self.pretokenizer.split(text.as_ref()) {
            let k: K = piece.into();
            *chunk_counts.entry(k).or_default() += C::one();
            seen += 1;
        }
        seen
    }

    /// Update chunk counts inplace from a sample iterator.
    pub fn update_from_samples<I>(
        &mut self,
        samples: I,
    ) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        samples
            .into_iter()
            .map(|sample| self.update_from_text(sample))
            .sum()
    }

    /// Update chunk counts from up to `max_lines` lines of `reader`.
    ///
    /// Lines keep their terminators, and are pretokenized as one text,
    /// so runs of blank lines chunk the same as in the whole file.
    ///
    /// ## Returns
    /// ``(lines, chunks)`` read.
    pub fn update_from_reader<R: BufRead>(
        &mut self,
        mut reader: R,
        max_lines: Option<usize>,
    ) -> BpeResult<(usize, usize)> {
        let mut text = String::new();
        let mut lines = 0;
        while max_lines.is_none_or(|max| lines < max) {
            if reader.read_line(&mut text)? == 0 {
                break;
            }
            lines += 1;
        }
        log::info!("Read {lines} lines ({} bytes) of corpus", text.len());

        let chunks = self.update_from_text(&text);
        Ok((lines, chunks))
    }

    /// Convert the chunk counts to a ``(spans, counts)`` table.
    ///
    /// The table is sorted by chunk, so its layout does not depend
    /// on hash order.
    ///
    /// # Arguments
    /// * `byte_vocab` - the byte table to use for byte translation.
    pub fn to_span_count_table<T: TokenType>(
        &self,
        byte_vocab: &ByteMapVocab<T>,
    ) -> (Vec<TokenSpanBuf<T>>, Vec<C>) {
        let mut items: Vec<(&K, &C)> = self.chunk_counts.iter().collect();
        items.sort_by(|a, b| a.0.cmp(b.0));

        items
            .into_iter()
            .map(|(k, &c)| (TokenSpanBuf::from_string(k, byte_vocab), c))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use compact_str::CompactString;

    use super::*;

    fn counter<K: StringChunkType>() -> TextSpanCounter<K, u64> {
        TextSpanCounter::new(Pretokenizer::new().unwrap())
    }

    #[test]
    fn test_chunk_counter() {
        let mut wc = counter::<String>();

        let samples = vec!["Hello world", "Foo world bar world"];
        assert_eq!(wc.update_from_samples(samples.iter()), 6);
        assert_eq!(wc.len(), 4);

        let mut counts: Vec<(String, u64)> = wc.release().into_iter().collect();
        counts.sort();
        assert_eq!(
            counts,
            vec![
                (" bar".to_string(), 1),
                (" world".to_string(), 3),
                ("Foo".to_string(), 1),
                ("Hello".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_update_from_reader() {
        let mut wc = counter::<CompactString>();

        let corpus = "ab ab\n\nab\nignored line\n";
        let (lines, chunks) = wc.update_from_reader(corpus.as_bytes(), Some(3)).unwrap();
        assert_eq!(lines, 3);
        // "ab", " ab", "\n\n", "ab", "\n"
        assert_eq!(chunks, 5);

        let counts = wc.release();
        assert_eq!(counts[&CompactString::from("ab")], 2);
        assert_eq!(counts[&CompactString::from("\n\n")], 1);
        assert!(!counts.contains_key(&CompactString::from(" line")));
    }

    #[test]
    fn test_update_from_reader_all_lines() {
        let mut wc = counter::<String>();
        let (lines, _) = wc.update_from_reader("a\nb".as_bytes(), None).unwrap();
        assert_eq!(lines, 2);
        assert!(wc.chunk_counts.contains_key("b"));
    }

    #[test]
    fn test_to_span_count_table() {
        let byte_vocab: ByteMapVocab<u32> = ByteMapVocab::new().unwrap();

        let mut wc = counter::<String>();
        wc.update_from_text("b a b");

        let (spans, counts) = wc.to_span_count_table(&byte_vocab);
        assert_eq!(
            spans,
            vec![
                TokenSpanBuf::from_string(" a", &byte_vocab),
                TokenSpanBuf::from_string(" b", &byte_vocab),
                TokenSpanBuf::from_string("b", &byte_vocab),
            ]
        );
        assert_eq!(counts, vec![1, 1, 1]);
    }
}
