//! Provider adapter: structured history in, assistant text out
//!
//! `complete` never fails. Configuration problems found at construction and
//! every backend error are turned into a fixed apology through
//! [`fallback_reply`], so a broken provider still yields a well-formed turn.

use std::sync::Arc;

use crate::{
    CompletionRequest, LlmConfig, LlmError, LlmErrorKind, LlmMessage, LlmService,
    LlmServiceFactory,
};

/// Reply used when the provider is missing or rejects its credential
pub const NOT_CONFIGURED_REPLY: &str =
    "Sorry, the AI service is not properly configured. Please check the API key.";

/// Reply used for every other provider failure
pub const GENERIC_FAILURE_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Map a provider failure to the text shown to the user.
///
/// Raw error detail never leaves this function; it is logged by the caller.
pub fn fallback_reply(error: &LlmError) -> &'static str {
    match error.kind {
        LlmErrorKind::Configuration | LlmErrorKind::Auth => NOT_CONFIGURED_REPLY,
        LlmErrorKind::RateLimit
        | LlmErrorKind::Network
        | LlmErrorKind::ServerError
        | LlmErrorKind::InvalidRequest
        | LlmErrorKind::MalformedResponse
        | LlmErrorKind::Unknown => GENERIC_FAILURE_REPLY,
    }
}

/// The capability the orchestrator depends on
#[async_trait::async_trait]
pub trait ChatProvider: Send + Sync {
    /// Produce the assistant reply for `history`, which ends with a user message
    async fn complete(&self, history: &[LlmMessage]) -> String;
}

/// Per-request generation settings, fixed at construction
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: Option<String>,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        let config = LlmConfig::default();
        Self::from(&config)
    }
}

impl From<&LlmConfig> for CompletionSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system_prompt: config.system_prompt.clone(),
        }
    }
}

enum Backend {
    Ready(Arc<dyn LlmService>),
    Unconfigured(LlmError),
}

/// Adapter wrapping one backend selected at startup
pub struct ProviderAdapter {
    backend: Backend,
    settings: CompletionSettings,
}

impl ProviderAdapter {
    pub fn new(service: Arc<dyn LlmService>, settings: CompletionSettings) -> Self {
        Self {
            backend: Backend::Ready(service),
            settings,
        }
    }

    /// Adapter whose every call short-circuits to [`NOT_CONFIGURED_REPLY`]
    pub fn unconfigured(error: LlmError) -> Self {
        tracing::warn!(error = %error, "LLM provider is not configured; replies will be apologies");
        Self {
            backend: Backend::Unconfigured(error),
            settings: CompletionSettings::default(),
        }
    }

    /// Build from configuration; construction problems are kept, not raised
    pub fn from_config(config: &LlmConfig) -> Self {
        match LlmServiceFactory::create(config) {
            Ok(service) => {
                tracing::info!(provider = %config.provider, model = %service.model(), "LLM provider ready");
                Self::new(service, CompletionSettings::from(config))
            }
            Err(error) => Self::unconfigured(error),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.backend, Backend::Ready(_))
    }

    pub fn model(&self) -> Option<&str> {
        match &self.backend {
            Backend::Ready(service) => Some(service.model()),
            Backend::Unconfigured(_) => None,
        }
    }

    async fn try_complete(
        &self,
        service: &dyn LlmService,
        history: &[LlmMessage],
    ) -> Result<String, LlmError> {
        let request = CompletionRequest {
            messages: history.to_vec(),
            system_prompt: self.settings.system_prompt.clone(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let response = service.complete(&request).await?;
        let content = response.content.trim();
        if content.is_empty() {
            return Err(LlmError::malformed("Provider returned an empty reply"));
        }
        Ok(content.to_string())
    }
}

#[async_trait::async_trait]
impl ChatProvider for ProviderAdapter {
    async fn complete(&self, history: &[LlmMessage]) -> String {
        let service = match &self.backend {
            Backend::Ready(service) => service,
            Backend::Unconfigured(error) => {
                tracing::debug!(error = %error, "Skipping provider call: not configured");
                return NOT_CONFIGURED_REPLY.to_string();
            }
        };

        match self.try_complete(service.as_ref(), history).await {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(kind = %error.kind, error = %error.message, "Provider call failed; using fallback reply");
                fallback_reply(&error).to_string()
            }
        }
    }
}
