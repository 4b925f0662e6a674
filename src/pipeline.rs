//! End-to-end summarization.
//!
//! ```text
//! Document ─► segment ─► chunk ─► apply_style ×N ─► dispatch (N concurrent)
//!                                                        │
//!   FinalSummary ◄─ post_process ◄─ join in chunk order ◄┘
//! ```
//!
//! Input errors stop the request before any chunking. Per-chunk inference
//! failures do not: the joined text keeps a visible marker in the failed
//! chunk's slot instead of silently getting shorter.

use std::sync::Arc;

use tracing::info;

use crate::{
    apply_style, post_process, Chunk, ChunkSummary, DispatchConfig, Dispatcher, Document, Error,
    GenerationLength, LengthSpec, ModelFamily, Result, Segmenter, SentenceChunker, Seq2SeqModel,
    Style, UnicodeSegmenter,
};

/// Per-request options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryRequest {
    /// Output presentation.
    pub style: Style,
    /// Output length policy.
    pub length: LengthSpec,
}

/// The result of a summarization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalSummary {
    /// The formatted summary.
    pub text: String,
    /// Per-chunk outputs, in chunk order.
    pub chunks: Vec<ChunkSummary>,
    /// Length bounds used for generation.
    pub length: GenerationLength,
    /// Word count of the source document.
    pub source_words: usize,
}

impl FinalSummary {
    /// Indices of chunks whose inference failed.
    #[must_use]
    pub fn failed_chunks(&self) -> Vec<usize> {
        self.chunks
            .iter()
            .filter(|s| !s.is_ok())
            .map(|s| s.index)
            .collect()
    }

    /// Indices of chunks summarized from a truncated input.
    #[must_use]
    pub fn truncated_chunks(&self) -> Vec<usize> {
        self.chunks
            .iter()
            .filter(|s| s.truncated)
            .map(|s| s.index)
            .collect()
    }

    /// Whether every chunk was summarized.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.chunks.iter().all(ChunkSummary::is_ok)
    }
}

/// Marker left in place of a chunk whose summary is missing.
///
/// Chunk numbers in the marker are 1-based.
#[must_use]
pub fn gap_marker(summary: &ChunkSummary) -> Option<String> {
    summary
        .error()
        .map(|error| format!("[chunk {} unavailable: {error}]", summary.index + 1))
}

/// Join chunk summaries with newlines, in order, marking failures.
#[must_use]
pub fn join_summaries(summaries: &[ChunkSummary]) -> String {
    summaries
        .iter()
        .map(|summary| match summary.text() {
            Some(text) => text.to_string(),
            None => gap_marker(summary).unwrap_or_default(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Chunking, dispatch, and formatting wired together.
///
/// ```rust
/// use std::sync::Arc;
/// use condense::{Document, LexicalModel, ModelFamily, Style, SummaryRequest, Summarizer};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let summarizer = Summarizer::new(Arc::new(LexicalModel::new(ModelFamily::Bart)));
/// let doc = Document::new("Rates rose. Stocks fell. Bonds rallied.").unwrap();
/// let request = SummaryRequest { style: Style::Bullet, ..Default::default() };
///
/// let summary = summarizer.summarize(&doc, &request).await.unwrap();
/// assert_eq!(summary.text, "• Rates rose.\n• Stocks fell.\n• Bonds rallied.");
/// # });
/// ```
pub struct Summarizer {
    segmenter: Arc<dyn Segmenter>,
    chunker: SentenceChunker,
    dispatcher: Dispatcher,
}

impl Summarizer {
    /// Summarizer with the default segmenter, chunker, and dispatch settings.
    ///
    /// The default chunker is 500 words with a 50-sentence overlap. At about
    /// 20 words a sentence a full chunk holds around 25 sentences, so the
    /// whole chunk is carried and windows grow instead of sliding. For long
    /// documents pass a smaller overlap (2 to 5) through
    /// [`Summarizer::with_chunker`].
    #[must_use]
    pub fn new(model: Arc<dyn Seq2SeqModel>) -> Self {
        Self {
            segmenter: Arc::new(UnicodeSegmenter::new()),
            chunker: SentenceChunker::default(),
            dispatcher: Dispatcher::new(model, DispatchConfig::default()),
        }
    }

    /// Use a different sentence segmenter for chunking and formatting.
    #[must_use]
    pub fn with_segmenter(mut self, segmenter: Arc<dyn Segmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// Use a different chunker.
    #[must_use]
    pub fn with_chunker(mut self, chunker: SentenceChunker) -> Self {
        self.chunker = chunker;
        self
    }

    /// Use different dispatch settings.
    #[must_use]
    pub fn with_dispatch(self, config: DispatchConfig) -> Self {
        let model = Arc::clone(self.dispatcher.model());
        Self {
            dispatcher: Dispatcher::new(model, config),
            ..self
        }
    }

    /// The model family in use.
    #[must_use]
    pub fn family(&self) -> ModelFamily {
        self.dispatcher.model().family()
    }

    /// The chunker in use.
    #[must_use]
    pub const fn chunker(&self) -> &SentenceChunker {
        &self.chunker
    }

    /// Chunks the document would be split into.
    #[must_use]
    pub fn chunks(&self, document: &Document) -> Vec<Chunk> {
        self.chunker.chunk_text(document.text(), self.segmenter.as_ref())
    }

    /// Summarize a document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] if the document yields no sentences.
    /// Inference failures are reported per chunk in the result, not here.
    pub async fn summarize(
        &self,
        document: &Document,
        request: &SummaryRequest,
    ) -> Result<FinalSummary> {
        let chunks = self.chunks(document);
        if chunks.is_empty() {
            return Err(Error::EmptyInput);
        }

        let family = self.family();
        let length = request.length.resolve(document.word_count());
        let styled = chunks
            .iter()
            .map(|chunk| apply_style(chunk, request.style, family))
            .collect();

        let summaries = self.dispatcher.summarize_all(styled, length.into()).await;
        let joined = join_summaries(&summaries);
        let text = post_process(&joined, request.style, self.segmenter.as_ref());

        let summary = FinalSummary {
            text,
            chunks: summaries,
            length,
            source_words: document.word_count(),
        };

        info!(
            model = %family,
            style = %request.style,
            words = summary.source_words,
            chunks = summary.chunks.len(),
            failed = summary.failed_chunks().len(),
            truncated = summary.truncated_chunks().len(),
            max_len = length.max(),
            min_len = length.min(),
            "summarized"
        );
        Ok(summary)
    }
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("chunker", &self.chunker)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
