#![allow(dead_code, clippy::needless_range_loop, clippy::manual_assert)]
//! Coverage and overlap tests for sentence-window chunking.
//!
//! These tests verify that chunks cover every sentence of real-looking
//! prose and that overlap behaves as configured.

use condense::{Chunk, Segmenter, SentenceChunker, UnicodeSegmenter};

// =============================================================================
// Coverage: Chunks should cover every sentence
// =============================================================================

/// Check that every sentence index is in at least one chunk.
fn covers_all_sentences(chunks: &[Chunk], n: usize) -> bool {
    if chunks.is_empty() {
        return n == 0;
    }

    let mut covered = vec![false; n];
    for chunk in chunks {
        for i in chunk.sentences.clone() {
            covered[i] = true;
        }
    }

    covered.iter().all(|&c| c)
}

const PROSE: &str = "The committee met on Tuesday. Dr. Alvarez presented the findings. \
    Costs rose by four percent last year. Most of the increase came from energy. \
    Staffing levels held steady. The board asked for a revised forecast. \
    A vote is expected next month. Members were otherwise in agreement.";

#[test]
fn sentence_chunker_full_coverage() {
    let segmenter = UnicodeSegmenter::new();
    let texts = [
        "Hello. World.",
        "Dr. Smith went home. He was tired.",
        "First! Second? Third.",
        "No sentence ending here",
        PROSE,
    ];

    for text in &texts {
        let sentences = segmenter.segment(text);
        for (max_words, overlap) in [(1, 0), (5, 1), (12, 2), (500, 50)] {
            let chunks = SentenceChunker::new(max_words, overlap).chunk(&sentences);
            assert!(
                covers_all_sentences(&chunks, sentences.len()),
                "coverage failed for {max_words}/{overlap}: {:?}",
                &text[..text.len().min(40)]
            );
        }
    }
}

#[test]
fn chunk_text_matches_source_sentences() {
    let segmenter = UnicodeSegmenter::new();
    let sentences = segmenter.segment(PROSE);
    let chunks = SentenceChunker::new(15, 1).chunk(&sentences);

    for chunk in &chunks {
        assert_eq!(chunk.text, sentences[chunk.sentences.clone()].join(" "));
        assert!(PROSE.contains(&sentences[chunk.sentences.start]));
    }
}

// =============================================================================
// Overlap
// =============================================================================

#[test]
fn overlap_property() {
    let segmenter = UnicodeSegmenter::new();
    let sentences = segmenter.segment(PROSE);
    assert_eq!(sentences.len(), 8);

    for overlap in [0, 1, 2, 3] {
        let chunks = SentenceChunker::new(14, overlap).chunk(&sentences);

        for window in chunks.windows(2) {
            let (first, second) = (&window[0], &window[1]);
            let shared = first.sentences.end.saturating_sub(second.sentences.start);
            assert_eq!(
                shared,
                overlap.min(first.sentence_count()),
                "overlap {overlap}: {first} then {second}"
            );
            // Shared sentences open the next chunk verbatim
            let tail = sentences[second.sentences.start..first.sentences.end].join(" ");
            assert!(second.text.starts_with(&tail));
        }
    }
}

#[test]
fn no_overlap_means_contiguous() {
    let segmenter = UnicodeSegmenter::new();
    let sentences = segmenter.segment(PROSE);
    let chunks = SentenceChunker::no_overlap(10).chunk(&sentences);

    for window in chunks.windows(2) {
        assert_eq!(window[0].sentences.end, window[1].sentences.start);
    }
}

#[test]
fn overlap_at_least_chunk_length_grows_windows() {
    let sentences: Vec<String> = (0..5).map(|i| format!("Sentence number {i} here.")).collect();
    let chunks = SentenceChunker::new(8, 10).chunk(&sentences);

    // Each window starts at 0 and gains one sentence
    let spans: Vec<_> = chunks.iter().map(|c| c.sentences.clone()).collect();
    assert_eq!(spans, vec![0..2, 0..3, 0..4, 0..5]);
}

// =============================================================================
// Size bounds
// =============================================================================

#[test]
fn chunker_respects_budget_without_overlap() {
    let segmenter = UnicodeSegmenter::new();
    let sentences = segmenter.segment(PROSE);
    let longest = sentences
        .iter()
        .map(|s| s.split_whitespace().count())
        .max()
        .unwrap();

    for max_words in [longest, 10, 20, 40] {
        let chunks = SentenceChunker::no_overlap(max_words).chunk(&sentences);
        for chunk in &chunks {
            assert!(
                chunk.words <= max_words,
                "{chunk} exceeds budget {max_words}"
            );
        }
    }
}

#[test]
fn oversized_sentence_is_kept_whole() {
    let long = "word ".repeat(30) + "end.";
    let sentences = vec!["Short one.".to_string(), long.trim().to_string(), "Short two.".to_string()];
    let chunks = SentenceChunker::no_overlap(10).chunk(&sentences);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[1].words, 31);
    assert_eq!(chunks[1].sentence_count(), 1);
}

// =============================================================================
// Edge cases
// =============================================================================

#[test]
fn chunker_handles_only_whitespace() {
    let segmenter = UnicodeSegmenter::new();
    let chunks = SentenceChunker::default().chunk_text("   \n\n\t\t  ", &segmenter);
    assert!(chunks.is_empty());
}

#[test]
fn chunker_handles_newlines() {
    let segmenter = UnicodeSegmenter::new();
    let chunks = SentenceChunker::new(2, 0).chunk_text("Line one\nLine two\nLine three", &segmenter);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[2].text, "Line three");
}

#[test]
fn budget_equal_to_text_length() {
    let segmenter = UnicodeSegmenter::new();
    let text = "Exactly six words in this text.";

    let chunks = SentenceChunker::new(6, 0).chunk_text(text, &segmenter);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, text);
}
