use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ragline::commands::{ask, inspect, reason};
use ragline::config::{run_interactive_config, show_config};

#[derive(Parser)]
#[command(name = "ragline")]
#[command(about = "Retrieval-augmented question answering over spreadsheet and PDF sources")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the model service and pipeline settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Ingest a CSV or PDF source and answer a question against it
    Ask {
        /// Path to the source file (.csv or .pdf)
        source: PathBuf,
        /// The question to answer
        question: String,
        /// Number of chunks to retrieve for the answer context
        #[arg(long)]
        top_k: Option<usize>,
        /// Print the assembled context alongside the answer
        #[arg(long)]
        show_context: bool,
    },
    /// Load and chunk a source without embedding, and show what the index
    /// would contain
    Inspect {
        /// Path to the source file (.csv or .pdf)
        source: PathBuf,
    },
    /// Answer a question without retrieval, thinking step by step
    Reason {
        /// The question to answer
        question: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
        Commands::Ask {
            source,
            question,
            top_k,
            show_context,
        } => {
            ask(&source, &question, top_k, show_context)?;
        }
        Commands::Inspect { source } => {
            inspect(&source)?;
        }
        Commands::Reason { question } => {
            reason(&question)?;
        }
    }

    Ok(())
}
