//! Generation length targets.
//!
//! ## The Problem
//!
//! A summary's length has to track its source: a fixed 130-token target
//! pads a 150-word memo and starves a 20-page report. But users also want
//! to pin the length when they know what they need.
//!
//! ## Auto vs Manual
//!
//! - **Auto** derives targets from the document's word count:
//!   `max = max(30% of words, 30)`, `min = max(10% of words, 10)`.
//! - **Manual** takes explicit bounds, validated against the same ranges the
//!   interactive front end offers: `max` in `50..=512`, `min` in `10..=max`.
//!
//! Both resolve to a [`GenerationLength`], the pair handed to the model.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Allowed range for a manual maximum length.
pub const MANUAL_MAX_RANGE: RangeInclusive<usize> = 50..=512;

/// Smallest allowed manual minimum length.
pub const MANUAL_MIN_FLOOR: usize = 10;

/// Default manual maximum length.
pub const DEFAULT_MAX_LEN: usize = 130;

/// Default manual minimum length.
pub const DEFAULT_MIN_LEN: usize = 30;

const AUTO_MAX_FLOOR: usize = 30;
const AUTO_MIN_FLOOR: usize = 10;

/// Resolved min/max output length for one generation call.
///
/// # Examples
///
/// ```rust
/// use condense::GenerationLength;
///
/// let len = GenerationLength::auto(200);
/// assert_eq!(len.max(), 60);
/// assert_eq!(len.min(), 20);
///
/// // Floors apply to short inputs
/// let len = GenerationLength::auto(50);
/// assert_eq!((len.max(), len.min()), (30, 10));
///
/// // Inclusive range syntax: min..=max
/// let len = GenerationLength::try_from(30..=130).unwrap();
/// assert_eq!((len.max(), len.min()), (130, 30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationLength {
    max: usize,
    min: usize,
}

impl GenerationLength {
    /// Create a length pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if `max == 0` or `min > max`.
    pub fn new(max: usize, min: usize) -> Result<Self> {
        if max == 0 || min > max {
            return Err(Error::InvalidLength { min, max });
        }
        Ok(Self { max, min })
    }

    /// Targets derived from a document's word count.
    #[must_use]
    pub fn auto(word_count: usize) -> Self {
        let max = (word_count * 3 / 10).max(AUTO_MAX_FLOOR);
        let min = (word_count / 10).max(AUTO_MIN_FLOOR);
        Self { max, min }
    }

    /// Upper bound on generated tokens.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }

    /// Lower bound on generated tokens.
    #[must_use]
    pub const fn min(&self) -> usize {
        self.min
    }
}

impl TryFrom<RangeInclusive<usize>> for GenerationLength {
    type Error = Error;

    fn try_from(range: RangeInclusive<usize>) -> Result<Self> {
        Self::new(*range.end(), *range.start())
    }
}

/// How generation length is chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthSpec {
    /// Derive from the input word count.
    #[default]
    Auto,
    /// Fixed bounds.
    Manual(GenerationLength),
}

impl LengthSpec {
    /// Manual bounds, validated against [`MANUAL_MAX_RANGE`] and
    /// [`MANUAL_MIN_FLOOR`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if `max` is outside
    /// [`MANUAL_MAX_RANGE`] or `min` is outside `MANUAL_MIN_FLOOR..=max`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use condense::LengthSpec;
    ///
    /// assert!(LengthSpec::manual(130, 30).is_ok());
    /// assert!(LengthSpec::manual(130, 200).is_err());
    /// assert!(LengthSpec::manual(1000, 30).is_err());
    /// ```
    pub fn manual(max: usize, min: usize) -> Result<Self> {
        if !MANUAL_MAX_RANGE.contains(&max) || min < MANUAL_MIN_FLOOR {
            return Err(Error::InvalidLength { min, max });
        }
        GenerationLength::new(max, min).map(Self::Manual)
    }

    /// Resolve to concrete bounds for a document of `word_count` words.
    #[must_use]
    pub fn resolve(&self, word_count: usize) -> GenerationLength {
        match self {
            Self::Auto => GenerationLength::auto(word_count),
            Self::Manual(len) => *len,
        }
    }

    /// Whether lengths come from the word count.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_percentages() {
        let len = GenerationLength::auto(200);
        assert_eq!(len.max(), 60);
        assert_eq!(len.min(), 20);

        let len = GenerationLength::auto(1234);
        assert_eq!(len.max(), 370);
        assert_eq!(len.min(), 123);
    }

    #[test]
    fn test_auto_floors() {
        assert_eq!(GenerationLength::auto(0), GenerationLength { max: 30, min: 10 });
        assert_eq!(GenerationLength::auto(99), GenerationLength { max: 30, min: 10 });
        // 30% crosses the floor at 101 words, 10% at 110
        assert_eq!(GenerationLength::auto(110).max(), 33);
        assert_eq!(GenerationLength::auto(110).min(), 11);
    }

    #[test]
    fn test_manual_resolves_verbatim() {
        let spec = LengthSpec::manual(130, 30).unwrap();
        assert_eq!(spec.resolve(10_000), GenerationLength { max: 130, min: 30 });
        assert!(!spec.is_auto());
    }

    #[test]
    fn test_manual_bounds() {
        assert!(LengthSpec::manual(50, 10).is_ok());
        assert!(LengthSpec::manual(512, 512).is_ok());
        assert!(LengthSpec::manual(49, 10).is_err());
        assert!(LengthSpec::manual(513, 10).is_err());
        assert!(LengthSpec::manual(100, 9).is_err());
        assert!(LengthSpec::manual(100, 101).is_err());
    }

    #[test]
    fn test_range_conversion() {
        let len = GenerationLength::try_from(20..=60).unwrap();
        assert_eq!((len.min(), len.max()), (20, 60));
        assert!(GenerationLength::try_from(60..=20).is_err());
    }

    #[test]
    fn test_zero_max_rejected() {
        assert!(matches!(
            GenerationLength::new(0, 0),
            Err(Error::InvalidLength { min: 0, max: 0 })
        ));
    }
}
