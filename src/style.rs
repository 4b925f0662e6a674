//! Output styles: prompt framing before inference, formatting after.
//!
//! Style is applied at two points, and which one does the work depends on
//! the model family:
//!
//! ```text
//!                 apply_style (before)              post_process (after)
//! T5 (Instruction) "summarize in bullet points: …"  one "• " line per sentence
//! BART / Pegasus   text unchanged                    one "• " line per sentence
//! ```
//!
//! Instruction-driven models are told what shape to produce; models
//! fine-tuned for a single task get the raw text, and the shape is imposed
//! purely by post-processing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Chunk, Error, ModelFamily, PromptConvention, Segmenter};

/// Presentation of the final summary.
///
/// ```rust
/// use condense::Style;
///
/// assert_eq!("bullet".parse::<Style>().unwrap(), Style::Bullet);
/// assert_eq!("Headlines".parse::<Style>().unwrap(), Style::Headline);
/// assert!("fancy".parse::<Style>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Plain paragraph.
    #[default]
    Default,
    /// One bulleted line per sentence.
    Bullet,
    /// One dashed headline per sentence.
    Headline,
}

impl Style {
    /// All styles.
    pub const ALL: [Self; 3] = [Self::Default, Self::Bullet, Self::Headline];

    /// Short key used in configuration and on the command line.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Bullet => "bullet",
            Self::Headline => "headline",
        }
    }

    /// Instruction prefix for instruction-driven models.
    #[must_use]
    pub const fn instruction(self) -> &'static str {
        match self {
            Self::Default => "summarize: ",
            Self::Bullet => "summarize in bullet points: ",
            Self::Headline => "summarize as headlines: ",
        }
    }

    /// Line marker used by [`post_process`], if any.
    #[must_use]
    pub const fn marker(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Bullet => Some("• "),
            Self::Headline => Some("- "),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Style {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" | "paragraph" | "plain" => Ok(Self::Default),
            "bullet" | "bullets" | "bullet points" => Ok(Self::Bullet),
            "headline" | "headlines" => Ok(Self::Headline),
            _ => Err(Error::UnknownStyle(s.to_string())),
        }
    }
}

/// A chunk framed for a specific model, still tied to its source index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledChunk {
    /// Index of the source chunk.
    pub index: usize,
    /// Text to feed the model.
    pub text: String,
}

/// Frame a chunk's text for `family` in the given style.
///
/// ```rust
/// use condense::{apply_style, Chunk, ModelFamily, Style};
///
/// let chunk = Chunk::from_sentences(&["Rates rose."], 0..1, 0);
///
/// let t5 = apply_style(&chunk, Style::Bullet, ModelFamily::T5);
/// assert_eq!(t5.text, "summarize in bullet points: Rates rose.");
///
/// let bart = apply_style(&chunk, Style::Bullet, ModelFamily::Bart);
/// assert_eq!(bart.text, "Rates rose.");
/// ```
#[must_use]
pub fn apply_style(chunk: &Chunk, style: Style, family: ModelFamily) -> StyledChunk {
    let text = match family.prompt_convention() {
        PromptConvention::Instruction => format!("{}{}", style.instruction(), chunk.text),
        PromptConvention::Direct => chunk.text.clone(),
    };
    StyledChunk {
        index: chunk.index,
        text,
    }
}

/// Format joined chunk summaries in the given style.
///
/// [`Style::Default`] returns the text unchanged. The other styles
/// re-segment with `segmenter` and emit one marked line per sentence.
///
/// ```rust
/// use condense::{post_process, Style, UnicodeSegmenter};
///
/// let segmenter = UnicodeSegmenter::new();
/// let out = post_process("Rates rose. Stocks fell.", Style::Headline, &segmenter);
/// assert_eq!(out, "- Rates rose.\n- Stocks fell.");
/// ```
#[must_use]
pub fn post_process(summary: &str, style: Style, segmenter: &dyn Segmenter) -> String {
    match style.marker() {
        None => summary.to_string(),
        Some(marker) => segmenter
            .segment(summary)
            .iter()
            .map(|sentence| format!("{marker}{sentence}"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnicodeSegmenter;

    fn chunk(text: &str, index: usize) -> Chunk {
        Chunk::from_sentences(&[text], 0..1, index)
    }

    #[test]
    fn t5_gets_instruction_per_style() {
        let c = chunk("Body.", 2);
        assert_eq!(
            apply_style(&c, Style::Default, ModelFamily::T5).text,
            "summarize: Body."
        );
        assert_eq!(
            apply_style(&c, Style::Headline, ModelFamily::T5).text,
            "summarize as headlines: Body."
        );
        assert_eq!(apply_style(&c, Style::Default, ModelFamily::T5).index, 2);
    }

    #[test]
    fn direct_families_ignore_style() {
        let c = chunk("Body.", 0);
        for style in Style::ALL {
            assert_eq!(apply_style(&c, style, ModelFamily::Bart).text, "Body.");
            assert_eq!(apply_style(&c, style, ModelFamily::Pegasus).text, "Body.");
        }
    }

    #[test]
    fn bullet_has_one_line_per_sentence() {
        let segmenter = UnicodeSegmenter::new();
        let out = post_process("One. Two.\nThree.", Style::Bullet, &segmenter);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines, vec!["• One.", "• Two.", "• Three."]);
    }

    #[test]
    fn bullet_keeps_short_sentences_apart() {
        let segmenter = UnicodeSegmenter::new();
        let out = post_process("He said no. She agreed. Plan B. It worked.", Style::Bullet, &segmenter);
        assert_eq!(
            out.lines().collect::<Vec<_>>(),
            vec!["• He said no.", "• She agreed.", "• Plan B.", "• It worked."]
        );
    }

    #[test]
    fn default_is_identity() {
        let segmenter = UnicodeSegmenter::new();
        let text = "Already plain.\nSecond line.";
        assert_eq!(post_process(text, Style::Default, &segmenter), text);
    }

    #[test]
    fn marked_styles_on_empty_text() {
        let segmenter = UnicodeSegmenter::new();
        assert_eq!(post_process("", Style::Bullet, &segmenter), "");
    }

    #[test]
    fn unknown_style_fails_fast() {
        let err = "2".parse::<Style>().unwrap_err();
        assert!(matches!(err, Error::UnknownStyle(ref k) if k == "2"));
    }
}
