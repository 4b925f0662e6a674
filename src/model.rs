//! Sequence-to-sequence model capability.
//!
//! A summarization model is an opaque text-to-text function with a bounded
//! input. The pipeline only needs four things from it: turn text into token
//! ids, generate output ids, turn those back into text, and say how it wants
//! to be prompted. Backends (ONNX, Candle, libtorch, a remote service) plug
//! in by implementing [`Seq2SeqModel`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, InferenceError};

/// Default beam width for generation.
pub const DEFAULT_NUM_BEAMS: usize = 4;

/// How a model family expects its input to be framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptConvention {
    /// Multi-task models steered by a textual instruction prefix.
    Instruction,
    /// Models fine-tuned for one task; input is the raw text.
    Direct,
}

/// The supported pretrained checkpoints.
///
/// Keys parse strictly: an unknown name is an error, never a silent default.
///
/// ```rust
/// use condense::{ModelFamily, PromptConvention};
///
/// let family: ModelFamily = "t5".parse().unwrap();
/// assert_eq!(family.checkpoint(), "t5-base");
/// assert_eq!(family.prompt_convention(), PromptConvention::Instruction);
///
/// assert!("gpt".parse::<ModelFamily>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    /// `facebook/bart-large-cnn`
    Bart,
    /// `t5-base`
    T5,
    /// `google/pegasus-xsum`
    Pegasus,
}

impl ModelFamily {
    /// All supported families.
    pub const ALL: [Self; 3] = [Self::Bart, Self::T5, Self::Pegasus];

    /// Short key used in configuration and on the command line.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Bart => "bart",
            Self::T5 => "t5",
            Self::Pegasus => "pegasus",
        }
    }

    /// Hugging Face checkpoint name.
    #[must_use]
    pub const fn checkpoint(self) -> &'static str {
        match self {
            Self::Bart => "facebook/bart-large-cnn",
            Self::T5 => "t5-base",
            Self::Pegasus => "google/pegasus-xsum",
        }
    }

    /// Prompting convention, derived from the checkpoint naming: T5
    /// checkpoints are multi-task and take instruction prefixes.
    #[must_use]
    pub fn prompt_convention(self) -> PromptConvention {
        if self.checkpoint().starts_with("t5") {
            PromptConvention::Instruction
        } else {
            PromptConvention::Direct
        }
    }

    /// Maximum input length in tokens.
    #[must_use]
    pub const fn max_input_tokens(self) -> usize {
        1024
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ModelFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|family| key == family.key() || key == family.checkpoint())
            .ok_or_else(|| Error::UnknownModel(s.to_string()))
    }
}

/// Decoding parameters for one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    /// Upper bound on output tokens.
    pub max_length: usize,
    /// Lower bound on output tokens.
    pub min_length: usize,
    /// Beam width; 1 means greedy.
    pub num_beams: usize,
    /// Stop a beam as soon as it emits end-of-sequence.
    pub early_stopping: bool,
}

impl GenerationParams {
    /// Beam-search parameters for the given bounds.
    #[must_use]
    pub const fn new(max_length: usize, min_length: usize) -> Self {
        Self {
            max_length,
            min_length,
            num_beams: DEFAULT_NUM_BEAMS,
            early_stopping: true,
        }
    }
}

impl From<crate::GenerationLength> for GenerationParams {
    fn from(len: crate::GenerationLength) -> Self {
        Self::new(len.max(), len.min())
    }
}

/// A loaded summarization model.
///
/// Implementations are shared read-only across concurrent inference tasks.
/// A backend that cannot serve concurrent calls should be dispatched with
/// [`DispatchConfig::serialize_model`](crate::DispatchConfig) set.
pub trait Seq2SeqModel: Send + Sync {
    /// Which checkpoint family this model belongs to.
    fn family(&self) -> ModelFamily;

    /// Encode text into input token ids. Must not truncate.
    fn encode(&self, text: &str) -> Result<Vec<u32>, InferenceError>;

    /// Generate output token ids from (possibly truncated) input ids.
    fn generate(&self, input: &[u32], params: &GenerationParams)
        -> Result<Vec<u32>, InferenceError>;

    /// Decode output ids to text, dropping control tokens.
    fn decode(&self, output: &[u32]) -> Result<String, InferenceError>;

    /// Maximum input length in tokens.
    fn max_input_tokens(&self) -> usize {
        self.family().max_input_tokens()
    }

    /// How this model expects to be prompted.
    fn prompt_convention(&self) -> PromptConvention {
        self.family().prompt_convention()
    }
}
