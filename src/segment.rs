//! Sentence segmentation.
//!
//! ## The Hard Part: Finding Sentences
//!
//! Sentence detection seems simple until you encounter:
//!
//! ```text
//! "Dr. Smith went to Washington D.C. on Jan. 15th."
//!     ^                          ^       ^
//!     Not a sentence end (abbreviation)
//! ```
//!
//! We start from Unicode Standard Annex #29 (UAX #29) sentence boundaries,
//! which already handle decimals, ellipses, and a period followed by a
//! lowercase word. UAX #29 still breaks after a title followed by a
//! capitalized name ("Dr. Smith"), so a second pass glues a boundary back
//! together when the preceding segment ends in a known abbreviation or a
//! single-letter initial.
//!
//! ## Contract
//!
//! Segmentation never drops content: concatenating the returned sentences
//! reproduces every non-whitespace character of the input, in order. Only
//! leading and trailing whitespace of each sentence is trimmed. Text with no
//! boundary at all is a single UAX #29 segment and comes back whole.
//!
//! The same [`Segmenter`] is used both for chunking and for re-splitting
//! the final summary in [`post_process`](crate::post_process), so both
//! stages agree on where sentences end.

use std::collections::HashSet;
use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

/// Abbreviations that do not end a sentence when followed by a capital.
///
/// Stored without the trailing period, lowercased. Only titles and
/// connectives that almost never close a sentence are listed; words such
/// as "no", "Inc." or month names end sentences too often to be joined
/// blindly, and UAX #29 already keeps "No. 5" or "Jan. 15" together.
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "st", "mt", "gen", "gov", "sen", "rep", "capt", "lt", "col",
    "sgt", "rev", "hon", "vs", "e.g", "i.e", "approx",
];

/// A sentence boundary detector.
///
/// Implementations must be deterministic and must not drop content.
///
/// ```rust
/// use condense::{Segmenter, UnicodeSegmenter};
///
/// fn count(segmenter: &dyn Segmenter, text: &str) -> usize {
///     segmenter.segment(text).len()
/// }
///
/// assert_eq!(count(&UnicodeSegmenter::new(), "One. Two. Three."), 3);
/// ```
pub trait Segmenter: Send + Sync {
    /// Split text into ordered, trimmed, non-empty sentences.
    fn segment(&self, text: &str) -> Vec<String>;
}

/// UAX #29 segmentation with abbreviation repair.
///
/// ## Example
///
/// ```rust
/// use condense::{Segmenter, UnicodeSegmenter};
///
/// let segmenter = UnicodeSegmenter::new();
/// let sentences = segmenter.segment("Dr. Smith arrived. He sat down.");
///
/// assert_eq!(sentences, vec!["Dr. Smith arrived.", "He sat down."]);
/// ```
#[derive(Debug, Clone)]
pub struct UnicodeSegmenter {
    abbreviations: Arc<HashSet<String>>,
}

impl UnicodeSegmenter {
    /// Create a segmenter with the built-in abbreviation list.
    #[must_use]
    pub fn new() -> Self {
        Self::with_abbreviations(DEFAULT_ABBREVIATIONS)
    }

    /// Create a segmenter with a custom abbreviation list.
    ///
    /// Entries are matched case-insensitively; a trailing period is optional.
    pub fn with_abbreviations<I, S>(abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let abbreviations = abbreviations
            .into_iter()
            .map(|a| a.as_ref().trim().trim_end_matches('.').to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();
        Self {
            abbreviations: Arc::new(abbreviations),
        }
    }

    /// Number of known abbreviations.
    #[must_use]
    pub fn abbreviation_count(&self) -> usize {
        self.abbreviations.len()
    }

    /// Whether the boundary after `piece` should be glued shut.
    ///
    /// `pending` is the text accumulated so far, `piece` included.
    fn continues(&self, piece: &str, pending: &str, next: Option<&str>) -> bool {
        let Some(last) = last_word(piece) else {
            return false;
        };
        if is_initial(last) {
            return next.is_some_and(starts_with_initial)
                || pending.split_whitespace().all(is_initial_token);
        }
        self.abbreviations.contains(&last.to_lowercase())
    }
}

/// The word before a segment's closing period, stripped of leading
/// punctuation.
fn last_word(segment: &str) -> Option<&str> {
    let stem = segment.trim_end().strip_suffix('.')?;
    let last = stem
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or(stem)
        .trim_start_matches(|c: char| !c.is_alphanumeric());
    (!last.is_empty()).then_some(last)
}

/// A single uppercase letter.
fn is_initial(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}

/// An initial with its period: "J."
fn is_initial_token(token: &str) -> bool {
    token.strip_suffix('.').is_some_and(is_initial)
}

fn starts_with_initial(piece: &str) -> bool {
    piece.split_whitespace().next().is_some_and(is_initial_token)
}

impl Default for UnicodeSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for UnicodeSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let pieces: Vec<&str> = text.split_sentence_bounds().collect();
        let mut sentences = Vec::new();
        let mut pending = String::new();

        for (i, piece) in pieces.iter().enumerate() {
            pending.push_str(piece);
            if self.continues(piece, &pending, pieces.get(i + 1).copied()) {
                continue;
            }
            push_trimmed(&mut sentences, &pending);
            pending.clear();
        }
        push_trimmed(&mut sentences, &pending);

        sentences
    }
}

fn push_trimmed(sentences: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}
