//! The Chunk type: a window of sentences sent to the model in one call.

use std::ops::Range;

/// A contiguous run of sentences, joined into one text.
///
/// ## Sentence Spans
///
/// `sentences` indexes into the segmenter's output, not into bytes of the
/// source document. Overlapping chunks share the tail of one span with the
/// head of the next:
///
/// ```text
/// Sentences: [S0, S1, S2, S3, S4]
/// Chunk 0:   [S0, S1, S2]        sentences 0..3
/// Chunk 1:           [S2, S3, S4] sentences 2..5  <- S2 carried over
/// ```
///
/// `index` is the chunk's position in the sequence and is what the
/// dispatcher uses to put summaries back in order.
///
/// ```rust
/// use condense::Chunk;
///
/// let sentences = ["One two.", "Three four five."];
/// let chunk = Chunk::from_sentences(&sentences, 0..2, 0);
///
/// assert_eq!(chunk.text, "One two. Three four five.");
/// assert_eq!(chunk.words, 5);
/// assert_eq!(chunk.sentence_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk text: its sentences joined by single spaces.
    pub text: String,
    /// Span of sentence indices covered by this chunk.
    pub sentences: Range<usize>,
    /// Zero-based index of this chunk in the sequence.
    pub index: usize,
    /// Whitespace word count of `text`.
    pub words: usize,
}

impl Chunk {
    /// Build a chunk from a span of sentences.
    ///
    /// # Panics
    ///
    /// Panics if `span` is out of bounds for `sentences`.
    #[must_use]
    pub fn from_sentences<S: AsRef<str>>(sentences: &[S], span: Range<usize>, index: usize) -> Self {
        let members = &sentences[span.clone()];
        let text = members
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        let words = members
            .iter()
            .map(|s| crate::document::word_count(s.as_ref()))
            .sum();
        Self {
            text,
            sentences: span,
            index,
            words,
        }
    }

    /// Number of sentences in this chunk.
    #[must_use]
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Whether this chunk has no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunk {{ index: {}, sentences: {}..{}, words: {} }}",
            self.index, self.sentences.start, self.sentences.end, self.words
        )
    }
}
