//! The input document.

use crate::{Error, Result};

/// Raw text to summarize, with its whitespace word count.
///
/// Built once from pasted text or an extracted file and never mutated.
///
/// ```rust
/// use condense::Document;
///
/// let doc = Document::new("Two sentences here. And another.").unwrap();
/// assert_eq!(doc.word_count(), 5);
///
/// assert!(Document::new("   \n").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    word_count: usize,
}

impl Document {
    /// Wrap text as a document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] if the text has no non-whitespace content.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let word_count = word_count(&text);
        if word_count == 0 {
            return Err(Error::EmptyInput);
        }
        Ok(Self { text, word_count })
    }

    /// The document text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of whitespace-separated words.
    #[must_use]
    pub const fn word_count(&self) -> usize {
        self.word_count
    }
}

/// Count whitespace-separated words.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
