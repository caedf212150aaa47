// External text-generation service boundary, plus the retrieval-free
// chain-of-thought prompt helper.

pub mod openai;


use crate::Result;

pub use openai::OpenAiChat;

/// Sampling parameters for one generation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Sampling temperature in `[0, 1]`
    pub temperature: f32,
    /// Upper bound on generated tokens, must be positive
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    #[inline]
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: 512,
        }
    }
}

/// Contract for the external text-generation service.
///
/// One request, one response, no retry and no fallback answer: failures
/// surface to the caller as [`crate::RagError::GenerationService`].
pub trait GenerationService {
    fn generate(
        &self,
        system_instruction: &str,
        user_message: &str,
        params: &GenerationParams,
    ) -> Result<String>;
}

const REASONING_SYSTEM: &str = "You are a reasoning assistant.";
const REASONING_TEMPERATURE: f32 = 0.7;

/// Answer a question without retrieval, prompting the model to show its
/// chain of thought before the final answer.
#[inline]
pub fn reason(question: &str, service: &dyn GenerationService) -> Result<String> {
    let user_message = format!(
        "Question: {question}\nThink step by step before giving the final answer."
    );
    let params = GenerationParams {
        temperature: REASONING_TEMPERATURE,
        ..GenerationParams::default()
    };

    service.generate(REASONING_SYSTEM, &user_message, &params)
}
