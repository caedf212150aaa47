use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input};

use super::{Config, RetrievalConfig, ServiceConfig, api_key};
use crate::chunker::ChunkingConfig;

#[inline]
pub fn run_interactive_config() -> Result<()> {
    eprintln!("{}", style("🔧 Ragline Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config()?;

    eprintln!("{}", style("Service Configuration").bold().yellow());
    eprintln!("Configure the OpenAI-compatible endpoint used for embeddings and answers.");
    eprintln!();

    configure_service(&mut config.service)?;

    eprintln!();
    eprintln!("{}", style("Chunking & Retrieval").bold().yellow());
    configure_pipeline(&mut config.chunking, &mut config.retrieval)?;

    eprintln!();
    match api_key() {
        Ok(_) => eprintln!("{}", style("✓ API credential found in environment").green()),
        Err(e) => {
            eprintln!("{}", style(format!("⚠ {e}")).yellow());
            eprintln!("Export it before running 'ragline ask'.");
        }
    }

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());
        eprintln!(
            "Configuration saved to: {}",
            style(config.config_file_path().display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Service Settings:").bold().yellow());
    eprintln!("  Base URL: {}", style(&config.service.base_url).cyan());
    eprintln!(
        "  Embedding Model: {}",
        style(&config.service.embedding_model).cyan()
    );
    eprintln!(
        "  Generation Model: {}",
        style(&config.service.generation_model).cyan()
    );
    eprintln!("  Batch Size: {}", style(config.service.batch_size).cyan());
    eprintln!(
        "  Timeout: {}s",
        style(config.service.timeout_seconds).cyan()
    );

    eprintln!();
    eprintln!("{}", style("Chunking Settings:").bold().yellow());
    eprintln!("  Chunk Size: {}", style(config.chunking.chunk_size).cyan());
    eprintln!(
        "  Chunk Overlap: {}",
        style(config.chunking.chunk_overlap).cyan()
    );

    eprintln!();
    eprintln!("{}", style("Retrieval Settings:").bold().yellow());
    eprintln!("  Top K: {}", style(config.retrieval.top_k).cyan());
    eprintln!(
        "  Temperature: {}",
        style(config.retrieval.temperature).cyan()
    );
    eprintln!(
        "  Max Output Tokens: {}",
        style(config.retrieval.max_output_tokens).cyan()
    );

    eprintln!();
    match api_key() {
        Ok(_) => eprintln!("  API Credential: {}", style("present").green()),
        Err(_) => eprintln!("  API Credential: {}", style("missing").red()),
    }

    eprintln!();
    eprintln!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );

    Ok(())
}

fn load_existing_config() -> Result<Config> {
    Config::load().map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("No existing configuration found. Using defaults.").yellow()
            );
            Ok(Config {
                service: ServiceConfig::default(),
                chunking: ChunkingConfig::default(),
                retrieval: RetrievalConfig::default(),
                base_dir: Config::config_dir()?,
            })
        },
        |config| {
            eprintln!("{}", style("Found existing configuration.").green());
            Ok(config)
        },
    )
}

fn configure_service(service: &mut ServiceConfig) -> Result<()> {
    let base_url: String = Input::new()
        .with_prompt("Service base URL")
        .default(service.base_url.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if url::Url::parse(input).is_ok() {
                Ok(())
            } else {
                Err("Must be a valid URL")
            }
        })
        .interact_text()?;

    let embedding_model: String = Input::new()
        .with_prompt("Embedding model")
        .default(service.embedding_model.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Model name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let generation_model: String = Input::new()
        .with_prompt("Generation model")
        .default(service.generation_model.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Model name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let batch_size: usize = Input::new()
        .with_prompt("Batch size for embedding generation")
        .default(service.batch_size)
        .validate_with(|input: &usize| -> Result<(), &str> {
            if *input == 0 {
                Err("Batch size must be greater than 0")
            } else if *input > 1000 {
                Err("Batch size must be 1000 or less")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    service.base_url = base_url;
    service.embedding_model = embedding_model;
    service.generation_model = generation_model;
    service.batch_size = batch_size;
    service.validate()?;

    Ok(())
}

fn configure_pipeline(
    chunking: &mut ChunkingConfig,
    retrieval: &mut RetrievalConfig,
) -> Result<()> {
    let chunk_size: usize = Input::new()
        .with_prompt("Chunk size (characters)")
        .default(chunking.chunk_size)
        .validate_with(|input: &usize| -> Result<(), &str> {
            if *input == 0 {
                Err("Chunk size must be greater than 0")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let chunk_overlap: usize = Input::new()
        .with_prompt("Chunk overlap (characters)")
        .default(chunking.chunk_overlap.min(chunk_size.saturating_sub(1)))
        .validate_with(move |input: &usize| -> Result<(), &str> {
            if *input >= chunk_size {
                Err("Overlap must be smaller than chunk size")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let top_k: usize = Input::new()
        .with_prompt("Chunks retrieved per question (top-k)")
        .default(retrieval.top_k)
        .validate_with(|input: &usize| -> Result<(), &str> {
            if *input == 0 {
                Err("Top-k must be greater than 0")
            } else if *input > 100 {
                Err("Top-k must be 100 or less")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    chunking.chunk_size = chunk_size;
    chunking.chunk_overlap = chunk_overlap;
    retrieval.top_k = top_k;

    Ok(())
}
