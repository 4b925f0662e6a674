//! Parallel per-chunk inference.
//!
//! ## Ordering
//!
//! Chunks are independent, so they run concurrently and finish in any
//! order. Each task is tagged with its slot at dispatch time and results
//! are written into a fixed-size vector by that slot:
//!
//! ```text
//! dispatch:   [c0, c1, c2, c3]      all tasks spawned before any join
//! completion:  c2, c0, c3, c1       arbitrary
//! output:     [s0, s1, s2, s3]      by slot, never by arrival
//! ```
//!
//! ## Failure
//!
//! A chunk that errors, panics, or times out yields a failed
//! [`ChunkSummary`] in its own slot. The rest of the batch is unaffected.
//!
//! ## Resources
//!
//! Encoding, generation, and decoding are CPU-bound and run on tokio's
//! blocking pool. A semaphore bounds how many chunks are in flight. The
//! worker slot travels with the blocking call, so a call that times out
//! keeps its slot until it actually returns.
//!
//! Backends that cannot serve concurrent calls can be serialized behind a
//! single-permit model lock around `generate`; encoding and decoding still
//! overlap. The lock is awaited before the timeout starts:
//!
//! ```text
//! worker slot ─► encode ─► model lock ─► generate ─► decode
//!                                        └ timeout ┘
//! ```
//!
//! Waiting in the queue never counts against a chunk.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

use crate::{GenerationParams, InferenceError, Seq2SeqModel, StyledChunk};

/// Concurrency and timeout settings for a [`Dispatcher`].
///
/// ```rust
/// use std::time::Duration;
/// use condense::DispatchConfig;
///
/// let config = DispatchConfig::default()
///     .with_concurrency(2)
///     .with_timeout(Duration::from_secs(30));
/// assert_eq!(config.workers(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchConfig {
    /// Maximum concurrent inference calls; 0 means available parallelism.
    pub concurrency: usize,
    /// Per-chunk time limit.
    pub timeout: Option<Duration>,
    /// Run at most one `generate` call at a time.
    pub serialize_model: bool,
}

impl DispatchConfig {
    /// Set the worker count.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the per-chunk timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Serialize model calls.
    #[must_use]
    pub fn serialized(mut self) -> Self {
        self.serialize_model = true;
        self
    }

    /// Effective number of workers.
    #[must_use]
    pub fn workers(&self) -> usize {
        if self.concurrency == 0 {
            std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
        } else {
            self.concurrency
        }
    }
}

/// The model's output for one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSummary {
    /// Index of the source chunk.
    pub index: usize,
    /// Summary text, or why there is none.
    pub outcome: Result<String, InferenceError>,
    /// Whether the input was cut at the model's token limit.
    pub truncated: bool,
}

impl ChunkSummary {
    fn failed(index: usize, error: InferenceError) -> Self {
        Self {
            index,
            outcome: Err(error),
            truncated: false,
        }
    }

    /// The summary text, if inference succeeded.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    /// The failure, if inference did not succeed.
    #[must_use]
    pub fn error(&self) -> Option<&InferenceError> {
        self.outcome.as_ref().err()
    }

    /// Whether inference succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

struct Inference {
    text: String,
    truncated: bool,
}

/// Runs one inference call per chunk, concurrently, and returns results in
/// input order.
///
/// ```rust
/// use std::sync::Arc;
/// use condense::{DispatchConfig, Dispatcher, GenerationParams, LexicalModel, ModelFamily, StyledChunk};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let model = Arc::new(LexicalModel::new(ModelFamily::Bart));
/// let dispatcher = Dispatcher::new(model, DispatchConfig::default());
///
/// let chunks = vec![
///     StyledChunk { index: 0, text: "First chunk. More.".into() },
///     StyledChunk { index: 1, text: "Second chunk. More.".into() },
/// ];
/// let summaries = dispatcher.summarize_all(chunks, GenerationParams::new(2, 1)).await;
///
/// assert_eq!(summaries[0].text(), Some("First chunk."));
/// assert_eq!(summaries[1].text(), Some("Second chunk."));
/// # });
/// ```
pub struct Dispatcher {
    model: Arc<dyn Seq2SeqModel>,
    config: DispatchConfig,
    model_lock: Arc<Semaphore>,
}

impl Dispatcher {
    /// Create a dispatcher over a shared model.
    #[must_use]
    pub fn new(model: Arc<dyn Seq2SeqModel>, config: DispatchConfig) -> Self {
        Self {
            model,
            config,
            model_lock: Arc::new(Semaphore::new(1)),
        }
    }

    /// The shared model.
    #[must_use]
    pub fn model(&self) -> &Arc<dyn Seq2SeqModel> {
        &self.model
    }

    /// The dispatch settings.
    #[must_use]
    pub const fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Summarize every chunk; output `i` always corresponds to input `i`.
    ///
    /// Must be called within a tokio runtime.
    pub async fn summarize_all(
        &self,
        chunks: Vec<StyledChunk>,
        params: GenerationParams,
    ) -> Vec<ChunkSummary> {
        let indices: Vec<usize> = chunks.iter().map(|c| c.index).collect();
        let permits = Arc::new(Semaphore::new(self.config.workers()));
        let mut tasks = JoinSet::new();

        for (slot, chunk) in chunks.into_iter().enumerate() {
            let model = Arc::clone(&self.model);
            let permits = Arc::clone(&permits);
            let lock = self
                .config
                .serialize_model
                .then(|| Arc::clone(&self.model_lock));
            let timeout = self.config.timeout;

            tasks.spawn(async move {
                debug!(index = chunk.index, "dispatching chunk");
                let result = run_chunk(model, permits, lock, timeout, chunk, params).await;
                (slot, result)
            });
        }

        let mut slots: Vec<Option<ChunkSummary>> = vec![None; indices.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, result)) => {
                    let index = indices[slot];
                    let summary = match result {
                        Ok(inference) => {
                            debug!(index, "chunk summarized");
                            ChunkSummary {
                                index,
                                outcome: Ok(inference.text),
                                truncated: inference.truncated,
                            }
                        }
                        Err(error) => {
                            warn!(index, %error, "chunk inference failed");
                            ChunkSummary::failed(index, error)
                        }
                    };
                    slots[slot] = Some(summary);
                }
                Err(error) => warn!(%error, "dispatch task aborted"),
            }
        }

        slots
            .into_iter()
            .zip(indices)
            .map(|(summary, index)| {
                summary.unwrap_or_else(|| ChunkSummary::failed(index, InferenceError::Panicked))
            })
            .collect()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("family", &self.model.family())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

async fn run_chunk(
    model: Arc<dyn Seq2SeqModel>,
    permits: Arc<Semaphore>,
    lock: Option<Arc<Semaphore>>,
    timeout: Option<Duration>,
    chunk: StyledChunk,
    params: GenerationParams,
) -> Result<Inference, InferenceError> {
    let Ok(permit) = permits.acquire_owned().await else {
        return Err(InferenceError::Cancelled);
    };
    let index = chunk.index;

    let encoder = Arc::clone(&model);
    let mut ids = blocking(move || encoder.encode(&chunk.text)).await?;

    let limit = model.max_input_tokens();
    let truncated = ids.len() > limit;
    if truncated {
        warn!(
            index,
            tokens = ids.len(),
            limit,
            "chunk exceeds model input limit; summarizing truncated prefix"
        );
        ids.truncate(limit);
    }

    let model_permit = match lock {
        Some(lock) => Some(
            lock.acquire_owned()
                .await
                .map_err(|_| InferenceError::Cancelled)?,
        ),
        None => None,
    };

    let generator = Arc::clone(&model);
    let work = tokio::task::spawn_blocking(move || {
        let output = generator.generate(&ids, &params);
        drop(model_permit);
        (output, permit)
    });

    let (output, permit) = match timeout {
        Some(deadline) => tokio::time::timeout(deadline, work)
            .await
            .map_err(|_| InferenceError::Timeout(deadline))?,
        None => work.await,
    }
    .map_err(join_error)?;
    let output = output?;

    let text = blocking(move || {
        let _permit = permit;
        model.decode(&output)
    })
    .await?;

    Ok(Inference {
        text: text.trim().to_string(),
        truncated,
    })
}

async fn blocking<T, F>(f: F) -> Result<T, InferenceError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, InferenceError> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(join_error)?
}

fn join_error(error: JoinError) -> InferenceError {
    if error.is_panic() {
        InferenceError::Panicked
    } else {
        InferenceError::Cancelled
    }
}
