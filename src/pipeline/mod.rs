
use std::sync::Arc;

use tracing::info;

use crate::Result;
use crate::answer::{Answer, QueryAnswerer};
use crate::chunker::chunk_records;
use crate::config::Config;
use crate::embeddings::EmbeddingService;
use crate::generation::{GenerationParams, GenerationService};
use crate::index::VectorIndex;
use crate::loader::Record;

/// Counts reported after ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub records: usize,
    pub chunks: usize,
}

/// The full load → chunk → embed → index → answer flow behind one entry
/// point. Ingestion happens once, at build time; questions are answered on
/// demand against the frozen index.
pub struct RagPipeline {
    answerer: QueryAnswerer,
    stats: IngestStats,
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl RagPipeline {
    /// Chunk the records, embed and index every chunk, and wire the
    /// answerer. Chunking parameters are validated before any embedding
    /// call is made.
    #[inline]
    pub fn build(
        records: &[Record],
        config: &Config,
        embedder: Arc<dyn EmbeddingService>,
        generator: Arc<dyn GenerationService>,
    ) -> Result<Self> {
        config.chunking.validate()?;

        let chunks = chunk_records(records, &config.chunking)?;
        let stats = IngestStats {
            records: records.len(),
            chunks: chunks.len(),
        };

        let index = VectorIndex::build(chunks, embedder, config.service.batch_size)?;

        info!(
            "Pipeline ready: {} records, {} chunks, top-k {}",
            stats.records, stats.chunks, config.retrieval.top_k
        );

        let params = GenerationParams {
            temperature: config.retrieval.temperature,
            max_output_tokens: config.retrieval.max_output_tokens,
        };
        let answerer = QueryAnswerer::new(index, generator, config.retrieval.top_k, params);

        Ok(Self { answerer, stats })
    }

    /// Answer one question against the built index.
    #[inline]
    pub fn ask(&self, question: &str) -> Result<Answer> {
        self.answerer.answer(question)
    }

    #[inline]
    pub fn stats(&self) -> IngestStats {
        self.stats
    }
}
