//! Sentence-aligned chunking with a word budget and sentence overlap.
//!
//! Summarization models accept a bounded input (about 1024 tokens for the
//! supported families). Long documents are cut into windows of whole
//! sentences that fit a word budget, each summarized on its own.
//!
//! ## How It Works
//!
//! ```text
//! max_words = 10, overlap = 1
//!
//! Sentences (word counts): S0(4) S1(4) S2(3) S3(5) S4(2)
//!
//! Chunk 0: S0 S1          8 words; S2 would make 11
//! Chunk 1: S1 S2          S1 carried over, 7 words; S3 would make 12
//! Chunk 2: S2 S3 S4       S2 carried over, 10 words
//! ```
//!
//! ## Why Overlap?
//!
//! Without overlap, the model sees each window cold: a pronoun at the top of
//! a chunk has lost its referent. Repeating the last few sentences of the
//! previous window restores that context at the cost of some duplicated
//! input.
//!
//! ## Overflow
//!
//! A sentence longer than `max_words` is never split or dropped. It is
//! admitted into an otherwise empty chunk, which then exceeds the budget.
//! The model truncates such input at its own token limit.
//!
//! Overlap counts sentences, not words. When `overlap` is at least the
//! number of sentences in a closed chunk, the whole chunk is carried over
//! and windows grow instead of sliding; pick an overlap well below the
//! typical sentences-per-chunk. The default of 50 does exactly that for
//! ordinary prose (about 25 sentences in 500 words); 2 to 5 sentences is a
//! sliding overlap.

use tracing::{debug, warn};

use crate::document::word_count;
use crate::{Chunk, Error, Result, Segmenter};

/// Default word budget per chunk.
pub const DEFAULT_MAX_WORDS: usize = 500;

/// Default number of sentences carried into the next chunk.
///
/// Larger than the sentence count of a typical full chunk, so on ordinary
/// prose the defaults grow windows rather than slide them.
pub const DEFAULT_OVERLAP: usize = 50;

/// Sentence-window chunker.
///
/// ## Example
///
/// ```rust
/// use condense::SentenceChunker;
///
/// let sentences = ["One two three.", "Four five six.", "Seven eight nine."];
/// let chunks = SentenceChunker::new(6, 1).chunk(&sentences);
///
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[0].text, "One two three. Four five six.");
/// assert_eq!(chunks[1].text, "Four five six. Seven eight nine.");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceChunker {
    max_words: usize,
    overlap: usize,
}

impl SentenceChunker {
    /// Create a new chunker.
    ///
    /// # Arguments
    ///
    /// * `max_words` - Word budget per chunk
    /// * `overlap` - Trailing sentences repeated at the start of the next chunk
    ///
    /// # Panics
    ///
    /// Panics if `max_words == 0`.
    #[must_use]
    pub fn new(max_words: usize, overlap: usize) -> Self {
        assert!(max_words > 0, "max_words must be > 0");
        Self { max_words, overlap }
    }

    /// Fallible constructor for configuration-driven sizes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] if `max_words == 0`.
    pub fn try_new(max_words: usize, overlap: usize) -> Result<Self> {
        if max_words == 0 {
            return Err(Error::InvalidChunkSize(max_words));
        }
        Ok(Self { max_words, overlap })
    }

    /// Create a chunker with no overlap.
    #[must_use]
    pub fn no_overlap(max_words: usize) -> Self {
        Self::new(max_words, 0)
    }

    /// Word budget per chunk.
    #[must_use]
    pub const fn max_words(&self) -> usize {
        self.max_words
    }

    /// Sentences carried into the next chunk.
    #[must_use]
    pub const fn overlap(&self) -> usize {
        self.overlap
    }

    /// Group sentences into ordered, overlapping chunks.
    ///
    /// Every sentence appears in at least one chunk, chunk indices run
    /// `0..n` in source order, and each chunk after the first starts with
    /// the last `min(overlap, len)` sentences of its predecessor.
    pub fn chunk<S: AsRef<str>>(&self, sentences: &[S]) -> Vec<Chunk> {
        let counts: Vec<usize> = sentences.iter().map(|s| word_count(s.as_ref())).collect();

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut words = 0;
        let mut warned_growth = false;

        for (i, &count) in counts.iter().enumerate() {
            if words + count > self.max_words && i > start {
                chunks.push(self.close(sentences, start..i, words, chunks.len()));

                let carried = self.overlap.min(i - start);
                if carried == i - start && !warned_growth {
                    warn!(
                        overlap = self.overlap,
                        sentences = i - start,
                        "overlap carries the whole chunk; windows will grow instead of slide"
                    );
                    warned_growth = true;
                }
                start = i - carried;
                words = counts[start..i].iter().sum();
            }
            words += count;
        }

        if start < sentences.len() {
            chunks.push(self.close(sentences, start..sentences.len(), words, chunks.len()));
        }

        debug!(
            sentences = sentences.len(),
            chunks = chunks.len(),
            max_words = self.max_words,
            overlap = self.overlap,
            "chunked"
        );
        chunks
    }

    /// Segment `text` and chunk the resulting sentences.
    pub fn chunk_text(&self, text: &str, segmenter: &dyn Segmenter) -> Vec<Chunk> {
        self.chunk(&segmenter.segment(text))
    }

    fn close<S: AsRef<str>>(
        &self,
        sentences: &[S],
        span: std::ops::Range<usize>,
        words: usize,
        index: usize,
    ) -> Chunk {
        if words > self.max_words {
            debug!(index, words, max_words = self.max_words, "chunk exceeds word budget");
        }
        Chunk::from_sentences(sentences, span, index)
    }
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORDS, DEFAULT_OVERLAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(word_counts: &[usize]) -> Vec<String> {
        word_counts
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let mut words: Vec<String> = (0..n).map(|w| format!("s{i}w{w}")).collect();
                if let Some(last) = words.last_mut() {
                    last.push('.');
                }
                words.join(" ")
            })
            .collect()
    }

    #[test]
    fn test_module_example_layout() {
        let input = sentences(&[4, 4, 3, 5, 2]);
        let chunks = SentenceChunker::new(10, 1).chunk(&input);

        let spans: Vec<_> = chunks.iter().map(|c| c.sentences.clone()).collect();
        assert_eq!(spans, vec![0..2, 1..3, 2..5]);
        assert_eq!(chunks[2].words, 10);
    }

    #[test]
    fn test_no_overlap_partitions() {
        let input = sentences(&[3, 3, 3, 3, 3]);
        let chunks = SentenceChunker::no_overlap(6).chunk(&input);

        let spans: Vec<_> = chunks.iter().map(|c| c.sentences.clone()).collect();
        assert_eq!(spans, vec![0..2, 2..4, 4..5]);
    }

    #[test]
    fn test_fits_in_one_chunk() {
        let input = sentences(&[2, 2, 2]);
        let chunks = SentenceChunker::new(100, 5).chunk(&input);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].sentences, 0..3);
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn test_oversized_sentence_is_admitted_alone() {
        let input = sentences(&[2, 50, 2]);
        let chunks = SentenceChunker::no_overlap(10).chunk(&input);

        let spans: Vec<_> = chunks.iter().map(|c| c.sentences.clone()).collect();
        assert_eq!(spans, vec![0..1, 1..2, 2..3]);
        assert_eq!(chunks[1].words, 50);
    }

    #[test]
    fn test_leading_oversized_sentence() {
        let input = sentences(&[50]);
        let chunks = SentenceChunker::new(10, 3).chunk(&input);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].words, 50);
    }

    #[test]
    fn test_overlap_larger_than_chunk_carries_everything() {
        let input = sentences(&[4, 4, 4, 4]);
        let chunks = SentenceChunker::new(8, 10).chunk(&input);

        // Carry-over never fabricates sentences; each window keeps all of
        // its predecessor and adds one more.
        let spans: Vec<_> = chunks.iter().map(|c| c.sentences.clone()).collect();
        assert_eq!(spans, vec![0..2, 0..3, 0..4]);
    }

    #[test]
    fn test_empty_input() {
        let input: Vec<String> = vec![];
        assert!(SentenceChunker::default().chunk(&input).is_empty());
    }

    #[test]
    fn test_indices_are_sequential() {
        let input = sentences(&[5; 40]);
        let chunks = SentenceChunker::new(20, 1).chunk(&input);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn test_try_new_rejects_zero() {
        assert!(matches!(
            SentenceChunker::try_new(0, 1),
            Err(Error::InvalidChunkSize(0))
        ));
    }

    #[test]
    #[should_panic]
    fn test_zero_budget_panics() {
        let _ = SentenceChunker::new(0, 0);
    }
}
