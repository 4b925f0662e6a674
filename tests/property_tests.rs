//! Property-based tests for chunking and formatting.
//!
//! These tests verify that the pipeline stages maintain key invariants:
//! - Coverage: every sentence appears in at least one chunk
//! - Overlap: each chunk opens with the tail of its predecessor
//! - Ordered: chunk indices and spans follow source order
//! - Bounds: only single-new-sentence chunks may exceed the word budget
//! - Formatting: bullet output has one marked line per sentence

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use condense::{
    post_process, Chunk, DispatchConfig, Dispatcher, GenerationParams, InferenceError,
    ModelFamily, Segmenter, SentenceChunker, Seq2SeqModel, Style, StyledChunk, UnicodeSegmenter,
};

// =============================================================================
// Test Generators
// =============================================================================

/// Word counts for a run of sentences.
fn sentence_lengths() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..40, 0..80)
}

/// Build sentences with the given word counts.
fn sentences(lengths: &[usize]) -> Vec<String> {
    lengths
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            let words: Vec<String> = (0..n).map(|w| format!("w{i}x{w}")).collect();
            format!("{}.", words.join(" "))
        })
        .collect()
}

/// Generate text with sentence-like structure
fn sentence_like_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::string::string_regex("[a-z]{2,10}( [a-z]{2,10}){0,8}").unwrap(),
        1..15,
    )
    .prop_map(|bodies| {
        bodies
            .iter()
            .map(|body| {
                let mut sentence = body.clone();
                if let Some(first) = sentence.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                sentence.push('.');
                sentence
            })
            .collect::<Vec<_>>()
            .join(" ")
    })
}

// =============================================================================
// Invariant Helpers
// =============================================================================

/// Check that the union of chunk spans is exactly `0..n`
fn chunks_cover_sentences(chunks: &[Chunk], n: usize) -> bool {
    if chunks.is_empty() {
        return n == 0;
    }
    let mut covered = vec![false; n];
    for chunk in chunks {
        if chunk.sentences.end > n {
            return false;
        }
        for i in chunk.sentences.clone() {
            covered[i] = true;
        }
    }
    covered.iter().all(|&c| c)
}

/// Check that chunks are in order
fn chunks_ordered(chunks: &[Chunk]) -> bool {
    chunks.iter().enumerate().all(|(i, c)| c.index == i)
        && chunks.windows(2).all(|w| {
            w[0].sentences.start <= w[1].sentences.start && w[0].sentences.end < w[1].sentences.end
        })
}

/// Sentences in `chunk` that were not carried over from `previous`
fn new_sentences(chunk: &Chunk, previous: Option<&Chunk>) -> usize {
    let first_new = previous.map_or(chunk.sentences.start, |p| p.sentences.end);
    chunk.sentences.end - first_new
}

// =============================================================================
// SentenceChunker Tests
// =============================================================================

proptest! {
    #[test]
    fn chunks_cover_every_sentence(
        lengths in sentence_lengths(),
        max_words in 1usize..120,
        overlap in 0usize..5,
    ) {
        let input = sentences(&lengths);
        let chunks = SentenceChunker::new(max_words, overlap).chunk(&input);
        prop_assert!(chunks_cover_sentences(&chunks, input.len()));
    }

    #[test]
    fn chunks_follow_source_order(
        lengths in sentence_lengths(),
        max_words in 1usize..120,
        overlap in 0usize..5,
    ) {
        let chunks = SentenceChunker::new(max_words, overlap).chunk(&sentences(&lengths));
        prop_assert!(chunks_ordered(&chunks));
    }

    #[test]
    fn each_chunk_opens_with_previous_tail(
        lengths in sentence_lengths(),
        max_words in 1usize..120,
        overlap in 0usize..5,
    ) {
        let chunks = SentenceChunker::new(max_words, overlap).chunk(&sentences(&lengths));
        for pair in chunks.windows(2) {
            let carried = overlap.min(pair[0].sentence_count());
            prop_assert_eq!(pair[1].sentences.start, pair[0].sentences.end - carried);
        }
    }

    #[test]
    fn over_budget_chunks_add_one_sentence(
        lengths in sentence_lengths(),
        max_words in 1usize..120,
        overlap in 0usize..5,
    ) {
        let chunks = SentenceChunker::new(max_words, overlap).chunk(&sentences(&lengths));
        for (i, chunk) in chunks.iter().enumerate() {
            let previous = i.checked_sub(1).map(|p| &chunks[p]);
            if chunk.words > max_words {
                prop_assert_eq!(new_sentences(chunk, previous), 1, "chunk {}", chunk);
            }
        }
    }

    #[test]
    fn no_overlap_partitions_and_respects_budget(
        lengths in sentence_lengths(),
        max_words in 1usize..120,
    ) {
        let input = sentences(&lengths);
        let chunks = SentenceChunker::no_overlap(max_words).chunk(&input);

        let mut next = 0;
        for chunk in &chunks {
            prop_assert_eq!(chunk.sentences.start, next);
            next = chunk.sentences.end;
            prop_assert!(chunk.words <= max_words || chunk.sentence_count() == 1);
        }
        prop_assert_eq!(next, input.len());
    }

    #[test]
    fn chunk_text_is_its_sentences(
        lengths in sentence_lengths(),
        max_words in 1usize..120,
        overlap in 0usize..5,
    ) {
        let input = sentences(&lengths);
        for chunk in SentenceChunker::new(max_words, overlap).chunk(&input) {
            prop_assert_eq!(&chunk.text, &input[chunk.sentences.clone()].join(" "));
            prop_assert_eq!(chunk.words, chunk.text.split_whitespace().count());
        }
    }
}

// =============================================================================
// Segmenter and Post-Processor Tests
// =============================================================================

proptest! {
    #[test]
    fn segmentation_keeps_every_word(text in sentence_like_text()) {
        let segmenter = UnicodeSegmenter::new();
        let rejoined = segmenter.segment(&text).join(" ");
        let expected: Vec<_> = text.split_whitespace().collect();
        prop_assert_eq!(rejoined.split_whitespace().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn bullets_mark_every_sentence(text in sentence_like_text()) {
        let segmenter = UnicodeSegmenter::new();
        let sentences = segmenter.segment(&text);
        let out = post_process(&text, Style::Bullet, &segmenter);

        let lines: Vec<_> = out.lines().collect();
        prop_assert_eq!(lines.len(), sentences.len());
        for (line, sentence) in lines.iter().zip(&sentences) {
            prop_assert_eq!(line.strip_prefix("• "), Some(sentence.as_str()));
        }
    }

    #[test]
    fn default_style_is_identity(text in sentence_like_text()) {
        let segmenter = UnicodeSegmenter::new();
        prop_assert_eq!(post_process(&text, Style::Default, &segmenter), text);
    }
}

// =============================================================================
// Dispatcher Ordering
// =============================================================================

/// Echoes its input after sleeping for the number of milliseconds in the
/// prompt's leading field.
struct DelayedEcho;

fn chars(ids: &[u32]) -> String {
    ids.iter().filter_map(|&id| char::from_u32(id)).collect()
}

impl Seq2SeqModel for DelayedEcho {
    fn family(&self) -> ModelFamily {
        ModelFamily::Bart
    }

    fn encode(&self, text: &str) -> Result<Vec<u32>, InferenceError> {
        Ok(text.chars().map(u32::from).collect())
    }

    fn generate(&self, input: &[u32], _: &GenerationParams) -> Result<Vec<u32>, InferenceError> {
        let text = chars(input);
        let millis = text
            .split(':')
            .next()
            .and_then(|d| d.parse().ok())
            .unwrap_or(0);
        std::thread::sleep(Duration::from_millis(millis));
        Ok(input.to_vec())
    }

    fn decode(&self, output: &[u32]) -> Result<String, InferenceError> {
        Ok(chars(output))
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn dispatch_order_is_independent_of_latency(
        delays in prop::collection::vec(0u64..15, 1..10),
        workers in 1usize..6,
    ) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();

        let chunks: Vec<StyledChunk> = delays
            .iter()
            .enumerate()
            .map(|(index, d)| StyledChunk { index, text: format!("{d}:chunk{index}") })
            .collect();
        let expected: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();

        let dispatcher = Dispatcher::new(
            Arc::new(DelayedEcho),
            DispatchConfig::default().with_concurrency(workers),
        );
        let out = runtime.block_on(dispatcher.summarize_all(chunks, GenerationParams::new(100, 1)));

        let texts: Vec<String> = out.iter().map(|s| s.text().unwrap_or_default().to_string()).collect();
        prop_assert_eq!(texts, expected);
        prop_assert!(out.iter().enumerate().all(|(i, s)| s.index == i));
    }
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn empty_input_produces_empty_output() {
    let segmenter = UnicodeSegmenter::new();
    assert!(segmenter.segment("").is_empty());
    assert!(segmenter.segment("   \n ").is_empty());

    let none: Vec<String> = Vec::new();
    assert!(SentenceChunker::default().chunk(&none).is_empty());
    assert_eq!(post_process("", Style::Headline, &segmenter), "");
}

#[test]
fn single_word_input() {
    let segmenter = UnicodeSegmenter::new();
    let chunks = SentenceChunker::default().chunk_text("hello", &segmenter);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "hello");
    assert_eq!(chunks[0].words, 1);
}

#[test]
fn unicode_handling() {
    let segmenter = UnicodeSegmenter::new();
    let text = "Hello 世界! Привет мир! مرحبا بالعالم";
    let sentences = segmenter.segment(text);

    assert_eq!(sentences.len(), 3);
    assert_eq!(sentences[1], "Привет мир!");
}

#[test]
fn sentence_boundaries() {
    let segmenter = UnicodeSegmenter::new();
    let text = "Dr. Smith went to Washington. He met Mr. Jones. J. R. R. Tolkien wrote books.";

    assert_eq!(
        segmenter.segment(text),
        vec![
            "Dr. Smith went to Washington.",
            "He met Mr. Jones.",
            "J. R. R. Tolkien wrote books.",
        ]
    );
}

// =============================================================================
// Consistency Tests
// =============================================================================

#[test]
fn chunking_is_deterministic() {
    let segmenter = UnicodeSegmenter::new();
    let text = "The quick brown fox jumps over the lazy dog. Pack my box. With five dozen jugs.";
    let chunker = SentenceChunker::new(8, 1);

    assert_eq!(chunker.chunk_text(text, &segmenter), chunker.chunk_text(text, &segmenter));
}
