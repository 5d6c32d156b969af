//! Prompt-string text generation backend
//!
//! Targets Hugging Face style inference endpoints, which take one prompt
//! string instead of a role-tagged message list. History is flattened with
//! [`flatten_history`] before sending.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{CompletionRequest, CompletionResponse, LlmConfig, LlmError, LlmMessage, LlmRole, LlmService};

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}

/// Endpoints answer either with a list of generations or a single one
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Many(Vec<Generation>),
    One(Generation),
}

/// Flatten structured history into a single prompt.
///
/// One `Role: content` entry per message, an optional system preamble, and
/// a trailing `Assistant:` cue for the model to complete.
pub fn flatten_history(messages: &[LlmMessage], system_prompt: Option<&str>) -> String {
    let mut prompt = String::new();

    if let Some(system) = system_prompt {
        prompt.push_str(system.trim());
        prompt.push_str("\n\n");
    }

    for message in messages {
        let label = match message.role {
            LlmRole::User => "User",
            LlmRole::Assistant => "Assistant",
        };
        prompt.push_str(label);
        prompt.push_str(": ");
        prompt.push_str(message.content.trim());
        prompt.push('\n');
    }

    prompt.push_str("Assistant:");
    prompt
}

/// Text generation LLM service implementation
pub struct TextGenerationService {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl TextGenerationService {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.require_api_key()?.to_string();

        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client: crate::http_client(config)?,
            api_key,
            model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url,
        })
    }
}

#[async_trait::async_trait]
impl LlmService for TextGenerationService {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let prompt = flatten_history(&request.messages, request.system_prompt.as_deref());

        let body = GenerationRequest {
            inputs: &prompt,
            parameters: GenerationParameters {
                max_new_tokens: request.max_tokens,
                temperature: request.temperature,
                return_full_text: false,
            },
        };

        let url = format!("{}/{}", self.base_url, self.model);

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Sending text generation request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(LlmError::from_status(status, &text));
        }

        let parsed: GenerationResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::malformed(format!("Failed to parse response: {}", e)))?;

        let generation = match parsed {
            GenerationResponse::Many(list) => list.into_iter().next(),
            GenerationResponse::One(single) => Some(single),
        }
        .ok_or_else(|| LlmError::malformed("Response contained no generations"))?;

        Ok(CompletionResponse {
            content: generation.generated_text,
            model: self.model.clone(),
            input_tokens: 0,
            output_tokens: 0,
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
