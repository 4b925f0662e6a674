//! `condense`: summarize a document from the command line.
//!
//! ```text
//! condense report.pdf --style bullet --pdf summary.pdf --score
//! cat notes.txt | condense --model t5 --max-len 200 --min-len 50
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use tokio::io::AsyncReadExt;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use condense::{
    render_pdf, rouge, Document, LengthMode, LexicalModel, ModelFamily, Resources, Style,
    SummarizerConfig, SummaryRequest, Summarizer, ROUGE_METRICS,
};

/// Summarize txt, pdf, docx, or pptx documents.
#[derive(Debug, Parser)]
#[command(name = "condense", version, about)]
struct Cli {
    /// Input file; reads stdin when omitted or "-"
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE", env = "CONDENSE_CONFIG")]
    config: Option<PathBuf>,

    /// Model family: bart, t5, pegasus
    #[arg(short, long)]
    model: Option<ModelFamily>,

    /// Output style: default, bullet, headline
    #[arg(short, long)]
    style: Option<Style>,

    /// Derive summary length from the document's word count
    #[arg(long, conflicts_with_all = ["max_len", "min_len"])]
    auto: bool,

    /// Maximum summary length in tokens (50-512)
    #[arg(long, value_name = "TOKENS")]
    max_len: Option<usize>,

    /// Minimum summary length in tokens (10-max)
    #[arg(long, value_name = "TOKENS")]
    min_len: Option<usize>,

    /// Word budget per chunk
    #[arg(long, value_name = "WORDS")]
    max_words: Option<usize>,

    /// Sentences shared between consecutive chunks (2-5 keeps windows sliding)
    #[arg(long, value_name = "SENTENCES")]
    overlap: Option<usize>,

    /// Concurrent inference calls (0 = all cores)
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Per-chunk timeout in seconds (0 = none)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Linguistic resource directory
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Write the summary here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Also render the summary as a PDF
    #[arg(long, value_name = "FILE")]
    pdf: Option<PathBuf>,

    /// Print ROUGE scores against the source text
    #[arg(long)]
    score: bool,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn init_logging(&self) {
        let level = if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        };
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    /// Load the configuration file, then apply command-line overrides.
    fn config(&self) -> Result<SummarizerConfig> {
        let mut config = match &self.config {
            Some(path) => SummarizerConfig::from_file(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?,
            None => SummarizerConfig::default(),
        };

        if let Some(model) = self.model {
            config.model = model.key().to_string();
        }
        if let Some(style) = self.style {
            config.style = style.key().to_string();
        }
        if self.auto {
            config.length.mode = LengthMode::Auto;
        }
        if self.max_len.is_some() || self.min_len.is_some() {
            config.length.mode = LengthMode::Manual;
            config.length.max_len = self.max_len.unwrap_or(config.length.max_len);
            config.length.min_len = self.min_len.unwrap_or(config.length.min_len);
        }
        if let Some(max_words) = self.max_words {
            config.chunking.max_words = max_words;
        }
        if let Some(overlap) = self.overlap {
            config.chunking.overlap = overlap;
        }
        if let Some(concurrency) = self.concurrency {
            config.dispatch.concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.dispatch.timeout_secs = timeout;
        }
        if self.data_dir.is_some() {
            config.data_dir.clone_from(&self.data_dir);
        }

        config.validate().context("invalid settings")?;
        Ok(config)
    }

    async fn document(&self) -> Result<Document> {
        match self.input.as_deref() {
            Some(path) if path != Path::new("-") => condense::extract(path)
                .with_context(|| format!("failed to read {}", path.display())),
            _ => {
                let mut text = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut text)
                    .await
                    .context("failed to read stdin")?;
                Document::new(text).context("no input text provided on stdin")
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();

    let config = cli.config()?;
    let document = cli.document().await?;
    if !cli.quiet {
        eprintln!("Detected ~{} words", document.word_count());
    }

    let resources = Resources::global(config.data_dir.as_deref())
        .context("failed to prepare linguistic resources")?;
    let model = Arc::new(LexicalModel::new(config.model_family()?));
    let summarizer = Summarizer::new(model)
        .with_segmenter(Arc::new(resources.segmenter()))
        .with_chunker(config.chunker()?)
        .with_dispatch(config.dispatch_config());

    let request = SummaryRequest {
        style: config.style()?,
        length: config.length_spec()?,
    };
    let summary = summarizer.summarize(&document, &request).await?;

    let failed = summary.failed_chunks();
    if !failed.is_empty() {
        warn!(?failed, "summary is missing chunks");
    }
    if summary.chunks.len() == failed.len() {
        bail!("every chunk failed to summarize");
    }

    match &cli.output {
        Some(path) => std::fs::write(path, format!("{}\n", summary.text))
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", summary.text),
    }

    if let Some(path) = &cli.pdf {
        let pages = render_pdf(&summary.text, path)?;
        if !cli.quiet {
            eprintln!("PDF saved as: {} ({pages} pages)", path.display());
        }
    }

    if cli.score {
        let scores = rouge(&summary.text, document.text());
        for metric in ROUGE_METRICS {
            let value = scores.get(metric).copied().unwrap_or_default();
            println!("{}: {value:.4}", metric.to_uppercase());
        }
    }

    Ok(())
}
