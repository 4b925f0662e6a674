//! A deterministic, dependency-free model backend.
//!
//! [`LexicalModel`] implements [`Seq2SeqModel`] without neural weights so
//! the full pipeline can run, be tested, and be benchmarked anywhere.
//!
//! ## Tokens
//!
//! Text is encoded byte by byte, so the model holds no vocabulary and any
//! number of documents can pass through one shared instance. The first ids
//! are reserved:
//!
//! ```text
//! 0  <pad>
//! 1  </s>                       end of sequence
//! 2  <unk>
//! 3  <summarize>                task tokens, one per style instruction
//! 4  <summarize-bullets>        (only for instruction-driven families)
//! 5  <summarize-headlines>
//! 6… bytes 0x00..=0xff
//! ```
//!
//! Byte tokens are roughly eight to a word piece, so the input limit is
//! scaled by [`BYTES_PER_TOKEN`].
//!
//! ## Generation
//!
//! Lead-extractive over whitespace-separated words: keep whole leading
//! sentences while they fit in `max_length` words, then top up word by
//! word until `min_length` is reached. A lead sentence longer than
//! `max_length` is cut at the limit. Beam settings are accepted and
//! ignored; decoding is already deterministic.

use crate::{GenerationParams, InferenceError, ModelFamily, PromptConvention, Seq2SeqModel, Style};

const PAD: u32 = 0;
const EOS: u32 = 1;
const UNK: u32 = 2;
const TASK_BASE: u32 = 3;
const FIRST_BYTE: u32 = TASK_BASE + Style::ALL.len() as u32;
const LAST_BYTE: u32 = FIRST_BYTE + u8::MAX as u32;

/// Input bytes allowed per model token.
pub const BYTES_PER_TOKEN: usize = 8;

const fn byte_id(byte: u8) -> u32 {
    FIRST_BYTE + byte as u32
}

/// The byte behind a content id; `None` for control and task ids.
fn id_byte(id: u32) -> Result<Option<u8>, InferenceError> {
    match id {
        id if id < FIRST_BYTE => Ok(None),
        id if id <= LAST_BYTE => Ok(Some((id - FIRST_BYTE) as u8)),
        id => Err(InferenceError::Model(format!("unknown token id {id}"))),
    }
}

/// Lead-extractive stand-in for a pretrained summarizer.
///
/// ```rust
/// use condense::{GenerationParams, LexicalModel, ModelFamily, Seq2SeqModel};
///
/// let model = LexicalModel::new(ModelFamily::Bart);
/// let ids = model.encode("Rates rose sharply. Markets fell. Analysts shrugged.").unwrap();
/// let out = model.generate(&ids, &GenerationParams::new(5, 1)).unwrap();
///
/// assert_eq!(model.decode(&out).unwrap(), "Rates rose sharply. Markets fell.");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LexicalModel {
    family: ModelFamily,
}

impl LexicalModel {
    /// Create a backend that behaves as `family` for prompting purposes.
    #[must_use]
    pub const fn new(family: ModelFamily) -> Self {
        Self { family }
    }

    /// Strip a known instruction prefix, returning its task token.
    fn split_instruction<'a>(&self, text: &'a str) -> (Option<u32>, &'a str) {
        if self.family.prompt_convention() != PromptConvention::Instruction {
            return (None, text);
        }
        for style in Style::ALL {
            if let Some(rest) = text.strip_prefix(style.instruction()) {
                return (Some(TASK_BASE + style as u32), rest);
            }
        }
        (None, text)
    }
}

fn ends_sentence(word: &[u8]) -> bool {
    String::from_utf8_lossy(word)
        .trim_end_matches(['"', '\'', ')', ']', '\u{201d}', '\u{2019}'])
        .ends_with(['.', '!', '?'])
}

type Sentence = Vec<Vec<u8>>;

fn close_word(word: &mut Vec<u8>, current: &mut Sentence, sentences: &mut Vec<Sentence>) {
    if word.is_empty() {
        return;
    }
    let done = ends_sentence(word);
    current.push(std::mem::take(word));
    if done {
        sentences.push(std::mem::take(current));
    }
}

/// Group content bytes into sentences of words.
fn sentences(input: &[u32]) -> Result<Vec<Sentence>, InferenceError> {
    let mut sentences = Vec::new();
    let mut current = Sentence::new();
    let mut word = Vec::new();

    for &id in input {
        let Some(byte) = id_byte(id)? else {
            continue;
        };
        if byte.is_ascii_whitespace() {
            close_word(&mut word, &mut current, &mut sentences);
        } else {
            word.push(byte);
        }
    }
    close_word(&mut word, &mut current, &mut sentences);
    if !current.is_empty() {
        sentences.push(current);
    }
    Ok(sentences)
}

impl Seq2SeqModel for LexicalModel {
    fn family(&self) -> ModelFamily {
        self.family
    }

    fn encode(&self, text: &str) -> Result<Vec<u32>, InferenceError> {
        let (task, body) = self.split_instruction(text);
        let mut ids: Vec<u32> = task.into_iter().collect();
        ids.extend(body.bytes().map(byte_id));
        ids.push(EOS);
        Ok(ids)
    }

    fn generate(
        &self,
        input: &[u32],
        params: &GenerationParams,
    ) -> Result<Vec<u32>, InferenceError> {
        let sentences = sentences(input)?;

        let max = params.max_length;
        let mut words: Vec<&[u8]> = Vec::with_capacity(max);
        for sentence in &sentences {
            if words.len() + sentence.len() > max {
                break;
            }
            words.extend(sentence.iter().map(Vec::as_slice));
        }

        // Lead sentence over budget, or short of the minimum: continue word-wise
        let target = if words.is_empty() {
            max
        } else {
            params.min_length.min(max)
        };
        if words.len() < target {
            let taken = words.len();
            words.extend(
                sentences
                    .iter()
                    .flatten()
                    .skip(taken)
                    .take(target - taken)
                    .map(Vec::as_slice),
            );
        }

        let mut output = Vec::new();
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                output.push(byte_id(b' '));
            }
            output.extend(word.iter().copied().map(byte_id));
        }
        output.push(EOS);
        Ok(output)
    }

    fn decode(&self, output: &[u32]) -> Result<String, InferenceError> {
        let mut bytes = Vec::with_capacity(output.len());
        for &id in output {
            if let Some(byte) = id_byte(id)? {
                bytes.push(byte);
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn max_input_tokens(&self) -> usize {
        self.family.max_input_tokens() * BYTES_PER_TOKEN
    }
}
