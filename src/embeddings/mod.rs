// External embedding service boundary: the trait components depend on, and
// the ureq-backed client for OpenAI-compatible endpoints.

pub mod openai;

use crate::Result;

pub use openai::OpenAiEmbeddings;

/// Contract for the external embedding service.
///
/// Implementations are injected into the index so tests can substitute a
/// deterministic stub. Failures are not retried here; they surface to the
/// caller as [`crate::RagError::EmbeddingService`].
pub trait EmbeddingService {
    /// Embed a single text into a fixed-length vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed many texts, returning one vector per input in input order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}
