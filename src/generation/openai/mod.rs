#[cfg(test)]
mod tests;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::ServiceConfig;
use crate::generation::{GenerationParams, GenerationService};
use crate::{RagError, Result};

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// Makes exactly one attempt per request; retry and backoff are the
/// caller's responsibility.
#[derive(Debug, Clone)]
pub struct OpenAiChat {
    base_url: Url,
    api_key: String,
    model: String,
    agent: ureq::Agent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl OpenAiChat {
    #[inline]
    pub fn new(config: &ServiceConfig, api_key: String) -> Result<Self> {
        let base_url = config
            .service_url()
            .map_err(|e| RagError::Config(e.to_string()))?;

        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
            .build()
            .into();

        Ok(Self {
            base_url,
            api_key,
            model: config.generation_model.clone(),
            agent,
        })
    }

    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        self
    }
}

impl GenerationService for OpenAiChat {
    #[inline]
    fn generate(
        &self,
        system_instruction: &str,
        user_message: &str,
        params: &GenerationParams,
    ) -> Result<String> {
        debug!(
            "Requesting completion with model {} (temperature {}, max tokens {})",
            self.model, params.temperature, params.max_output_tokens
        );

        let url = self
            .base_url
            .join("v1/chat/completions")
            .map_err(|e| RagError::Config(format!("invalid completions URL: {e}")))?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
            temperature: params.temperature,
            max_tokens: params.max_output_tokens,
        };
        let request_json = serde_json::to_string(&request).map_err(|e| {
            RagError::GenerationService(format!("request serialization failed: {e}"))
        })?;

        let response_text = self
            .agent
            .post(url.as_str())
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send(&request_json)
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .map_err(|e| RagError::GenerationService(format!("completion request failed: {e}")))?;

        let response: ChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            RagError::GenerationService(format!("malformed completion response: {e}"))
        })?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                RagError::GenerationService("completion response contained no choices".to_string())
            })?;

        Ok(answer)
    }
}
