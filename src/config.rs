//! TOML configuration.
//!
//! Every section is optional; missing keys take their defaults.
//!
//! ```toml
//! model = "bart"          # bart | t5 | pegasus, or a checkpoint name
//! style = "default"       # default | bullet | headline
//! data_dir = "/var/lib/condense"
//!
//! [length]
//! mode = "auto"           # auto | manual
//! max_len = 130           # manual only, 50..=512
//! min_len = 30            # manual only, 10..=max_len
//!
//! [chunking]
//! max_words = 500
//! overlap = 50            # sentences; 2..=5 keeps windows sliding
//!
//! [dispatch]
//! concurrency = 0         # 0 = available parallelism
//! timeout_secs = 0        # 0 = no timeout
//! serialize_model = false
//! ```
//!
//! Model and style keys are validated when the file is loaded, so a typo
//! fails before any document is read.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::length::{DEFAULT_MAX_LEN, DEFAULT_MIN_LEN};
use crate::sentence::{DEFAULT_MAX_WORDS, DEFAULT_OVERLAP};
use crate::{DispatchConfig, Error, LengthSpec, ModelFamily, Result, SentenceChunker, Style};

/// Length selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthMode {
    /// Derive from word count.
    #[default]
    Auto,
    /// Use `max_len` / `min_len`.
    Manual,
}

/// `[length]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LengthConfig {
    /// Auto or manual.
    pub mode: LengthMode,
    /// Manual maximum output tokens.
    pub max_len: usize,
    /// Manual minimum output tokens.
    pub min_len: usize,
}

impl Default for LengthConfig {
    fn default() -> Self {
        Self {
            mode: LengthMode::Auto,
            max_len: DEFAULT_MAX_LEN,
            min_len: DEFAULT_MIN_LEN,
        }
    }
}

/// `[chunking]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChunkingConfig {
    /// Word budget per chunk.
    pub max_words: usize,
    /// Sentences carried into the next chunk.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

/// `[dispatch]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchSettings {
    /// Concurrent inference calls; 0 means available parallelism.
    pub concurrency: usize,
    /// Per-chunk timeout in seconds; 0 disables it.
    pub timeout_secs: u64,
    /// Run one model call at a time.
    pub serialize_model: bool,
}

/// Complete summarizer configuration.
///
/// ```rust
/// use condense::{ModelFamily, Style, SummarizerConfig};
///
/// let config = SummarizerConfig::from_toml_str(r#"
///     model = "t5"
///     style = "bullet"
///
///     [chunking]
///     max_words = 300
/// "#).unwrap();
///
/// assert_eq!(config.model_family().unwrap(), ModelFamily::T5);
/// assert_eq!(config.style().unwrap(), Style::Bullet);
/// assert_eq!(config.chunker().unwrap().max_words(), 300);
/// assert_eq!(config.chunker().unwrap().overlap(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SummarizerConfig {
    /// Model key or checkpoint name.
    pub model: String,
    /// Style key.
    pub style: String,
    /// Output length policy.
    pub length: LengthConfig,
    /// Chunking parameters.
    pub chunking: ChunkingConfig,
    /// Inference dispatch parameters.
    pub dispatch: DispatchSettings,
    /// Linguistic resource directory; defaults to the platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            model: ModelFamily::Bart.key().to_string(),
            style: Style::Default.key().to_string(),
            length: LengthConfig::default(),
            chunking: ChunkingConfig::default(),
            dispatch: DispatchSettings::default(),
            data_dir: None,
        }
    }
}

impl SummarizerConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed TOML or unknown fields, and
    /// the specific validation error for bad values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or [`Error::Read`] if the file cannot be
    /// read, otherwise as [`SummarizerConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.to_path_buf())
            } else {
                Error::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Serialize back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check every value that can be invalid.
    ///
    /// # Errors
    ///
    /// The first failing accessor's error.
    pub fn validate(&self) -> Result<()> {
        self.model_family()?;
        self.style()?;
        self.length_spec()?;
        self.chunker()?;
        Ok(())
    }

    /// The configured model family.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownModel`] for an unrecognized key.
    pub fn model_family(&self) -> Result<ModelFamily> {
        self.model.parse()
    }

    /// The configured style.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStyle`] for an unrecognized key.
    pub fn style(&self) -> Result<Style> {
        self.style.parse()
    }

    /// The configured length policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] for manual bounds out of range.
    pub fn length_spec(&self) -> Result<LengthSpec> {
        match self.length.mode {
            LengthMode::Auto => Ok(LengthSpec::Auto),
            LengthMode::Manual => LengthSpec::manual(self.length.max_len, self.length.min_len),
        }
    }

    /// The configured chunker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] if `max_words` is zero.
    pub fn chunker(&self) -> Result<SentenceChunker> {
        SentenceChunker::try_new(self.chunking.max_words, self.chunking.overlap)
    }

    /// The configured dispatch settings.
    #[must_use]
    pub fn dispatch_config(&self) -> DispatchConfig {
        let mut config = DispatchConfig::default().with_concurrency(self.dispatch.concurrency);
        if self.dispatch.timeout_secs > 0 {
            config = config.with_timeout(Duration::from_secs(self.dispatch.timeout_secs));
        }
        if self.dispatch.serialize_model {
            config = config.serialized();
        }
        config
    }
}
