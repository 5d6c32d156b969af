//! Provider configuration
//!
//! Read once at startup; adapters never look at the environment again.

use std::time::Duration;

use crate::LlmError;

const DEFAULT_MAX_TOKENS: u32 = 500;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Provider family backing the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// OpenAI chat completions, or any compatible endpoint such as Groq
    #[default]
    OpenAi,
    Anthropic,
    /// Prompt-string text generation endpoint
    TextGeneration,
    Mock,
}

impl ProviderKind {
    /// Environment variables holding this provider's credential, in priority order
    pub fn credential_vars(&self) -> &'static [&'static str] {
        match self {
            Self::OpenAi => &["GROQ_API_KEY", "OPENAI_API_KEY", "LLM_API_KEY"],
            Self::Anthropic => &["ANTHROPIC_API_KEY", "LLM_API_KEY"],
            Self::TextGeneration => &["HF_API_TOKEN", "LLM_API_KEY"],
            Self::Mock => &[],
        }
    }

    pub fn requires_credential(&self) -> bool {
        !matches!(self, Self::Mock)
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "groq" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "text-generation" | "huggingface" => Ok(Self::TextGeneration),
            "mock" => Ok(Self::Mock),
            other => Err(LlmError::configuration(format!(
                "Unknown LLM provider: {}. Supported providers: openai, anthropic, text-generation, mock",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Anthropic => write!(f, "anthropic"),
            Self::TextGeneration => write!(f, "text-generation"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    pub api_key: Option<String>,
    /// Model override; each backend has its own default
    pub model: Option<String>,
    /// Alternate endpoint base
    pub base_url: Option<String>,
    /// `GROQ_API_BASE` was set, so the endpoint serves Groq-hosted models
    pub groq_endpoint: bool,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: Option<String>,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: None,
            model: None,
            base_url: None,
            groq_endpoint: false,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LlmConfig {
    /// Create LLM config from environment variables
    pub fn from_env() -> Result<Self, LlmError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider: ProviderKind = match non_empty("LLM_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => ProviderKind::default(),
        };

        let api_key = provider
            .credential_vars()
            .iter()
            .find_map(|key| non_empty(*key));

        let groq_base = match provider {
            ProviderKind::OpenAi => non_empty("GROQ_API_BASE"),
            _ => None,
        };
        let groq_endpoint = groq_base.is_some();
        let base_url = non_empty("LLM_BASE_URL").or(groq_base);

        let max_tokens = match non_empty("LLM_MAX_TOKENS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    LlmError::configuration(format!(
                        "LLM_MAX_TOKENS must be a positive integer, got {:?}",
                        raw
                    ))
                })?,
            None => DEFAULT_MAX_TOKENS,
        };

        let temperature = match non_empty("LLM_TEMPERATURE") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                LlmError::configuration(format!("LLM_TEMPERATURE must be a number, got {:?}", raw))
            })?,
            None => DEFAULT_TEMPERATURE,
        };

        let timeout = match non_empty("LLM_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse().map_err(|_| {
                LlmError::configuration(format!("LLM_TIMEOUT_SECS must be an integer, got {:?}", raw))
            })?),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            provider,
            api_key,
            model: non_empty("LLM_MODEL"),
            base_url,
            groq_endpoint,
            max_tokens,
            temperature,
            system_prompt: non_empty("LLM_SYSTEM_PROMPT"),
            timeout,
        })
    }

    /// Return the credential, or a configuration error naming where it is read from
    pub fn require_api_key(&self) -> Result<&str, LlmError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LlmError::configuration(format!(
                    "No API key configured for provider {}; set one of {}",
                    self.provider,
                    self.provider.credential_vars().join(", ")
                ))
            })
    }
}
