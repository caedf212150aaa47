#[cfg(test)]
mod tests;

use std::sync::Arc;

use itertools::Itertools;
use tracing::debug;

use crate::Result;
use crate::generation::{GenerationParams, GenerationService};
use crate::index::{SearchResult, VectorIndex};

/// Separator between context entries
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// System instruction sent with every retrieval-grounded request
pub const SYSTEM_INSTRUCTION: &str =
    "You are an assistant that answers based on retrieved context.";

/// Generation output for one query, with the context that grounded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// The generation service's response, verbatim
    pub text: String,
    /// The assembled context block the response was grounded in
    pub context: String,
}

/// Answers queries against a built index. Each call is an independent
/// request/response; no conversation state is kept.
pub struct QueryAnswerer {
    index: VectorIndex,
    generator: Arc<dyn GenerationService>,
    top_k: usize,
    params: GenerationParams,
}

impl QueryAnswerer {
    #[inline]
    pub fn new(
        index: VectorIndex,
        generator: Arc<dyn GenerationService>,
        top_k: usize,
        params: GenerationParams,
    ) -> Self {
        Self {
            index,
            generator,
            top_k,
            params,
        }
    }

    #[inline]
    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Retrieve the top-k chunks for `question`, assemble them into a
    /// context block, and ask the generation service for a grounded answer.
    #[inline]
    pub fn answer(&self, question: &str) -> Result<Answer> {
        let results = self.index.query(question, self.top_k)?;
        let context = assemble_context(&results);

        debug!(
            "Answering question with {} retrieved chunks ({} context chars)",
            results.len(),
            context.len()
        );

        let user_message = format!(
            "Answer the question using the context:\n\nContext:\n{context}\n\nQuestion: {question}"
        );
        let text = self
            .generator
            .generate(SYSTEM_INSTRUCTION, &user_message, &self.params)?;

        Ok(Answer { text, context })
    }
}

/// Render retrieved chunks as `title: text` lines joined by the fixed
/// separator, in retrieval order.
#[inline]
pub fn assemble_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|result| format!("{}: {}", result.chunk.metadata.title, result.chunk.text))
        .join(CONTEXT_SEPARATOR)
}
