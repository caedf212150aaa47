use thiserror::Error;

pub type Result<T> = std::result::Result<T, RagError>;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required column '{0}' in spreadsheet source")]
    MissingColumn(String),

    #[error("Source file not found: {0}")]
    SourceNotFound(String),

    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    #[error("Invalid chunking configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    #[error("Generation service error: {0}")]
    GenerationService(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod answer;
pub mod chunker;
pub mod commands;
pub mod config;
pub mod embeddings;
pub mod generation;
pub mod index;
pub mod loader;
pub mod pipeline;
