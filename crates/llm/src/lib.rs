//! Provider adapters for chat completion backends
//!
//! Every backend implements [`LlmService`]. The orchestration layer never
//! talks to a backend directly; it goes through [`ProviderAdapter`], which
//! turns every failure into displayable assistant text.

mod adapter;
mod anthropic;
mod config;
mod error;
pub mod mock;
mod openai;
mod text_generation;

pub use adapter::{
    fallback_reply, ChatProvider, CompletionSettings, ProviderAdapter, GENERIC_FAILURE_REPLY,
    NOT_CONFIGURED_REPLY,
};
pub use anthropic::AnthropicService;
pub use config::{LlmConfig, ProviderKind};
pub use error::{LlmError, LlmErrorKind};
pub use mock::MockLlmService;
pub use openai::OpenAiService;
pub use text_generation::{flatten_history, TextGenerationService};

use std::sync::Arc;
use std::time::Instant;

/// Message role as seen by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmRole {
    User,
    Assistant,
}

impl LlmRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmRole::User => "user",
            LlmRole::Assistant => "assistant",
        }
    }
}

/// One role-tagged entry of conversation history
#[derive(Debug, Clone, PartialEq)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
}

impl LlmMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::Assistant,
            content: content.into(),
        }
    }
}

/// Completion request handed to a backend
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<LlmMessage>,
    pub system_prompt: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Completion response from a backend
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Common interface for chat completion backends
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    /// Make a completion request
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model this backend sends requests to
    fn model(&self) -> &str;
}

/// Logging wrapper for LLM services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model = inner.model().to_string();
        Self { inner, model }
    }
}

#[async_trait::async_trait]
impl LlmService for LoggingService {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let start = Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model,
                    duration_ms = %duration.as_millis(),
                    history_len = request.messages.len(),
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model,
                    duration_ms = %duration.as_millis(),
                    kind = %e.kind,
                    error = %e.message,
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// LLM service factory
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    /// Create the backend selected by configuration, wrapped with logging
    pub fn create(config: &LlmConfig) -> Result<Arc<dyn LlmService>, LlmError> {
        let service: Arc<dyn LlmService> = match config.provider {
            ProviderKind::OpenAi => {
                tracing::info!("Creating OpenAI-compatible LLM service");
                Arc::new(OpenAiService::new(config)?)
            }
            ProviderKind::Anthropic => {
                tracing::info!("Creating Anthropic LLM service");
                Arc::new(AnthropicService::new(config)?)
            }
            ProviderKind::TextGeneration => {
                tracing::info!("Creating text generation LLM service");
                Arc::new(TextGenerationService::new(config)?)
            }
            ProviderKind::Mock => {
                tracing::info!("Creating mock LLM service");
                Arc::new(MockLlmService::new())
            }
        };

        Ok(Arc::new(LoggingService::new(service)))
    }
}

/// Build the shared HTTP client used by the remote backends
pub(crate) fn http_client(config: &LlmConfig) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| LlmError::configuration(format!("Failed to build HTTP client: {}", e)))
}
