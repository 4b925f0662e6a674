//! Error types for condense.
//!
//! Two tiers. [`Error`] is terminal for a request and is raised before any
//! chunk reaches a model: missing input, unreadable documents, unknown model
//! or style keys, bad configuration. [`InferenceError`] is scoped to one
//! chunk and never aborts a batch; it travels inside a
//! [`ChunkSummary`](crate::ChunkSummary) and surfaces as a gap marker.

use std::path::PathBuf;
use std::time::Duration;

/// Errors that abort a summarization request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No text was provided (empty or whitespace-only).
    #[error("no input text provided")]
    EmptyInput,

    /// The file extension is not one of txt, pdf, docx, pptx.
    #[error("unsupported format: {0:?} (expected txt, pdf, docx or pptx)")]
    UnsupportedFormat(String),

    /// The input file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The input file exists but could not be read.
    #[error("read error for {}: {source}", path.display())]
    Read {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// The file was read but its contents could not be parsed.
    #[error("corrupt document {}: {reason}", path.display())]
    Corrupt {
        /// The file being parsed.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Model key outside the supported set.
    #[error("unknown model {0:?} (expected one of: bart, t5, pegasus)")]
    UnknownModel(String),

    /// Style key outside the supported set.
    #[error("unknown style {0:?} (expected one of: default, bullet, headline)")]
    UnknownStyle(String),

    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} words (must be > 0)")]
    InvalidChunkSize(usize),

    /// Generation length bounds out of range or inverted.
    #[error("invalid generation length: min {min}, max {max}")]
    InvalidLength {
        /// Requested minimum length.
        min: usize,
        /// Requested maximum length.
        max: usize,
    },

    /// Configuration could not be parsed or validated.
    #[error("configuration error: {0}")]
    Config(String),

    /// The linguistic resource directory could not be prepared.
    #[error("resource error at {}: {source}", path.display())]
    Resource {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// The PDF could not be written.
    #[error("failed to render {}: {source}", path.display())]
    Render {
        /// The output path.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },
}

/// Result type for condense operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A failure confined to a single chunk's inference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    /// The model backend reported an error.
    #[error("model error: {0}")]
    Model(String),

    /// The call did not finish within the configured timeout.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The inference task panicked.
    #[error("inference task panicked")]
    Panicked,

    /// The dispatcher shut down before the chunk was scheduled.
    #[error("dispatch cancelled")]
    Cancelled,
}
