
use std::sync::Arc;

use tracing::{debug, info};

use crate::chunker::Chunk;
use crate::embeddings::EmbeddingService;
use crate::{RagError, Result};

/// In-memory similarity index over embedded chunks.
///
/// Built once from all chunks, then read-only. Lookup is an exact cosine
/// scan; entries keep chunk order so equal scores resolve to the earlier
/// chunk.
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    embedder: Arc<dyn EmbeddingService>,
    dimension: usize,
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("entries", &self.entries.len())
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

struct IndexEntry {
    embedding: Vec<f32>,
    chunk: Chunk,
}

/// One retrieved chunk with its similarity to the query.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub similarity: f32,
}

impl VectorIndex {
    /// Embed every chunk (batched) and build the index in chunk order.
    ///
    /// The first embedding fixes the expected dimension; the service
    /// returning a vector of any other length is an
    /// [`RagError::EmbeddingService`] failure.
    #[inline]
    pub fn build(
        chunks: Vec<Chunk>,
        embedder: Arc<dyn EmbeddingService>,
        batch_size: usize,
    ) -> Result<Self> {
        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(batch_size.max(1)) {
            let batch_embeddings = embedder.embed_batch(batch)?;
            if batch_embeddings.len() != batch.len() {
                return Err(RagError::EmbeddingService(format!(
                    "embedding count mismatch: requested {}, received {}",
                    batch.len(),
                    batch_embeddings.len()
                )));
            }
            embeddings.extend(batch_embeddings);
        }

        let dimension = embeddings.first().map_or(0, Vec::len);
        for embedding in &embeddings {
            if embedding.len() != dimension {
                return Err(RagError::EmbeddingService(format!(
                    "inconsistent embedding dimension: expected {}, received {}",
                    dimension,
                    embedding.len()
                )));
            }
        }

        let entries: Vec<IndexEntry> = embeddings
            .into_iter()
            .zip(chunks)
            .map(|(embedding, chunk)| IndexEntry { embedding, chunk })
            .collect();

        info!(
            "Built vector index with {} entries (dimension {})",
            entries.len(),
            dimension
        );

        Ok(Self {
            entries,
            embedder,
            dimension,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Return the `k` chunks most similar to `text`, highest first, ties
    /// broken by original chunk order.
    ///
    /// `k == 0` yields an empty result; `k` beyond the entry count yields
    /// every entry. Neither is an error.
    #[inline]
    pub fn query(&self, text: &str, k: usize) -> Result<Vec<SearchResult>> {
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(text)?;
        if query_embedding.len() != self.dimension {
            return Err(RagError::EmbeddingService(format!(
                "query embedding dimension {} does not match index dimension {}",
                query_embedding.len(),
                self.dimension
            )));
        }

        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|entry| SearchResult {
                chunk: entry.chunk.clone(),
                similarity: cosine_similarity(&query_embedding, &entry.embedding),
            })
            .collect();

        // Stable sort keeps chunk order for equal scores
        results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        results.truncate(k);

        debug!(
            "Query matched {} of {} entries (k = {})",
            results.len(),
            self.entries.len(),
            k
        );

        Ok(results)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
