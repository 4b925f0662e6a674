//! # condense
//!
//! Document summarization with pretrained sequence-to-sequence models.
//!
//! ## The Problem
//!
//! Summarization models have input windows. BART, T5, and Pegasus all stop
//! reading at 1024 tokens, and a report is much longer than that. You have
//! to split it, summarize the pieces, and stitch the results back together.
//!
//! This sounds trivial: cut every N words, summarize each cut. But consider:
//!
//! - A sentence cut in half gives the model a fragment to summarize
//! - Chunks with no shared context produce summaries that contradict
//!   each other at the seams
//! - Summaries must come back in document order even though chunks finish
//!   in any order
//! - One failed chunk should not throw away the other forty
//!
//! ## Pipeline
//!
//! ```text
//! raw text
//!    │
//!    ▼
//! Segmenter ──► Chunker ──► Style Adapter ×N ──► Dispatcher ──► Post-Processor
//!  sentences     windows      prompt framing      N concurrent     bullets /
//!                of ≤ W       (T5 only)           calls, ordered   headlines
//!                words                            results
//! ```
//!
//! ### Segmentation
//!
//! Unicode sentence boundaries (UAX #29), repaired for abbreviations:
//! "Dr. Smith met Mr. Jones." is one sentence, not three.
//!
//! ### Chunking
//!
//! Sentences are grouped greedily into windows of at most `max_words`
//! words. Each window after the first starts with the last `overlap`
//! sentences of the previous one:
//!
//! ```text
//! Sentences: [S0, S1, S2, S3, S4, S5]     max_words fits 3, overlap 1
//!
//! Chunk 0: [S0, S1, S2]
//! Chunk 1:         [S2, S3, S4]    <- S2 carried over
//! Chunk 2:                 [S4, S5]
//! ```
//!
//! A single sentence longer than the budget becomes its own oversized
//! chunk rather than being cut.
//!
//! ### Styles
//!
//! | Style      | T5 input prefix                  | Output              |
//! |------------|----------------------------------|---------------------|
//! | `default`  | `summarize: `                    | paragraph           |
//! | `bullet`   | `summarize in bullet points: `   | `• ` line per sentence |
//! | `headline` | `summarize as headlines: `       | `- ` line per sentence |
//!
//! BART and Pegasus are fine-tuned for one task and get the raw chunk.
//!
//! ### Dispatch
//!
//! Every chunk is submitted before any result is awaited, bounded by a
//! semaphore. Results land in slots by chunk index, so completion order
//! never leaks into the output. A chunk that fails or times out leaves a
//! visible `[chunk N unavailable: …]` marker in its slot.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use condense::{Document, LexicalModel, ModelFamily, SummaryRequest, Summarizer};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let model = Arc::new(LexicalModel::new(ModelFamily::Bart));
//! let summarizer = Summarizer::new(model);
//!
//! let doc = Document::new("Rates rose sharply. Stocks fell. Analysts were unsurprised.").unwrap();
//! let summary = summarizer.summarize(&doc, &SummaryRequest::default()).await.unwrap();
//!
//! assert!(summary.is_complete());
//! assert!(summary.text.starts_with("Rates rose sharply."));
//! # });
//! ```
//!
//! ## Models
//!
//! [`Seq2SeqModel`] is the seam for inference engines. The crate ships
//! [`LexicalModel`], a deterministic lead-extractive backend that needs no
//! weights; real backends implement the same four methods.
//!
//! ## Features
//!
//! | Feature   | Adds                                               |
//! |-----------|----------------------------------------------------|
//! | `extract` | [`extract`] for txt, pdf, docx, pptx files         |
//! | `cli`     | the `condense` binary                              |

mod chunk;
mod config;
mod dispatch;
mod document;
mod error;
mod evaluate;
mod length;
mod lexical;
mod model;
mod pipeline;
mod render;
mod resources;
mod segment;
mod sentence;
mod style;

#[cfg(feature = "extract")]
mod extract;

pub use chunk::Chunk;
pub use config::{ChunkingConfig, DispatchSettings, LengthConfig, LengthMode, SummarizerConfig};
pub use dispatch::{ChunkSummary, DispatchConfig, Dispatcher};
pub use document::{word_count, Document};
pub use error::{Error, InferenceError, Result};
pub use evaluate::{rouge, rouge_scores, Score, ROUGE_METRICS};
pub use length::{
    GenerationLength, LengthSpec, DEFAULT_MAX_LEN, DEFAULT_MIN_LEN, MANUAL_MAX_RANGE,
    MANUAL_MIN_FLOOR,
};
pub use lexical::{LexicalModel, BYTES_PER_TOKEN};
pub use model::{GenerationParams, ModelFamily, PromptConvention, Seq2SeqModel, DEFAULT_NUM_BEAMS};
pub use pipeline::{gap_marker, join_summaries, FinalSummary, SummaryRequest, Summarizer};
pub use render::{render_pdf, wrap, PdfDocument, LINES_PER_PAGE, WRAP_WIDTH};
pub use resources::{Resources, ABBREVIATIONS_FILE};
pub use segment::{Segmenter, UnicodeSegmenter, DEFAULT_ABBREVIATIONS};
pub use sentence::{SentenceChunker, DEFAULT_MAX_WORDS, DEFAULT_OVERLAP};
pub use style::{apply_style, post_process, Style, StyledChunk};

#[cfg(feature = "extract")]
pub use extract::{extract, extract_text, Format};
