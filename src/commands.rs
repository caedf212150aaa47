use anyhow::{Context, Result, bail};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::{self, Config};
use crate::embeddings::OpenAiEmbeddings;
use crate::generation::{self, OpenAiChat};
use crate::loader::{self, Record};
use crate::pipeline::RagPipeline;

/// Load records from a source file, dispatching on the file extension.
fn load_source(path: &Path) -> Result<Vec<Record>> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let records = match extension.as_str() {
        "csv" => loader::load_csv(path)?,
        "pdf" => loader::load_pdf(path)?,
        _ => bail!(
            "Unsupported source type: {} (expected .csv or .pdf)",
            path.display()
        ),
    };

    if records.is_empty() {
        bail!("Source contains no records: {}", path.display());
    }

    Ok(records)
}

fn embedding_spinner() -> ProgressBar {
    if console::user_attended_stderr() {
        let bar = ProgressBar::new_spinner().with_style(
            ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| {
                ProgressStyle::default_spinner()
            }),
        );
        bar.set_message("Embedding chunks...");
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    } else {
        ProgressBar::hidden()
    }
}

/// Ingest a source file and answer one question against it.
#[inline]
pub fn ask(
    source: &Path,
    question: &str,
    top_k: Option<usize>,
    show_context: bool,
) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(top_k) = top_k {
        config.retrieval.top_k = top_k;
        config
            .retrieval
            .validate()
            .context("Invalid --top-k value")?;
    }

    // Startup precondition: without a credential there is no point loading
    // or chunking anything.
    let api_key = config::api_key().context("Cannot reach the model service")?;

    info!("Answering question against {}", source.display());

    let records = load_source(source)?;
    println!(
        "📄 Loaded {} records from {}",
        records.len(),
        source.display()
    );

    let embedder = Arc::new(
        OpenAiEmbeddings::new(&config.service, api_key.clone())
            .context("Failed to create embedding client")?,
    );
    let generator = Arc::new(
        OpenAiChat::new(&config.service, api_key)
            .context("Failed to create generation client")?,
    );

    let bar = embedding_spinner();
    let pipeline = RagPipeline::build(&records, &config, embedder, generator)
        .context("Failed to build RAG pipeline")?;
    bar.finish_and_clear();

    let stats = pipeline.stats();
    println!(
        "🧩 Indexed {} chunks ({} per answer)",
        stats.chunks, config.retrieval.top_k
    );

    let answer = pipeline.ask(question).context("Failed to answer question")?;

    if show_context {
        println!();
        println!("{}", style("Context:").bold().yellow());
        println!("{}", answer.context);
    }

    println!();
    println!("❓ Question: {question}");
    println!("📖 Answer: {}", answer.text);

    Ok(())
}

/// Load and chunk a source file without embedding anything, and report
/// what the index would contain.
#[inline]
pub fn inspect(source: &Path) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let records = load_source(source)?;
    let chunks = crate::chunker::chunk_records(&records, &config.chunking)
        .context("Failed to chunk records")?;

    println!("📄 Source: {}", source.display());
    println!("   Records: {}", records.len());
    println!(
        "   Chunks: {} (size {}, overlap {})",
        chunks.len(),
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    println!();

    for (record_index, record) in records.iter().enumerate() {
        let record_chunks = chunks
            .iter()
            .filter(|chunk| chunk.record_index == record_index)
            .count();
        let label = match record.metadata.page {
            Some(page) => format!("{} (page {})", record.metadata.title, page),
            None => record.metadata.title.clone(),
        };
        println!(
            "   {} — {} chars, {} chunks",
            label,
            record.text.chars().count(),
            record_chunks
        );
    }

    Ok(())
}

/// Answer a question without retrieval, prompting for step-by-step
/// reasoning.
#[inline]
pub fn reason(question: &str) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let api_key = config::api_key().context("Cannot reach the model service")?;

    let generator = OpenAiChat::new(&config.service, api_key)
        .context("Failed to create generation client")?;

    let answer =
        generation::reason(question, &generator).context("Failed to generate answer")?;

    println!("🤔 Question: {question}");
    println!("💡 Answer: {answer}");

    Ok(())
}
