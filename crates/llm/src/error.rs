//! LLM error types and HTTP failure classification

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// LLM error with classification
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct LlmError {
    pub kind: LlmErrorKind,
    pub message: String,
}

/// Error classification used to pick the user-facing fallback reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// Missing credential or unknown provider, detected at construction
    Configuration,
    /// Authentication failed (401, 403, invalid key)
    Auth,
    /// Rate limited (429)
    RateLimit,
    /// Timeouts, connection failures, truncated bodies
    Network,
    /// Server error (5xx)
    ServerError,
    /// Bad request (400, 404, 422)
    InvalidRequest,
    /// Response body could not be decoded or held no text
    MalformedResponse,
    /// Anything else
    Unknown,
}

impl std::fmt::Display for LlmErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Configuration => "configuration",
            Self::Auth => "auth",
            Self::RateLimit => "rate_limit",
            Self::Network => "network",
            Self::ServerError => "server_error",
            Self::InvalidRequest => "invalid_request",
            Self::MalformedResponse => "malformed_response",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Common shape of provider error bodies: `{"error": {"message", "type", "code"}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Structured {
        message: Option<String>,
        #[serde(rename = "type")]
        error_type: Option<String>,
        code: Option<serde_json::Value>,
    },
    Plain(String),
}

impl LlmError {
    pub fn new(kind: LlmErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Configuration, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Network, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::MalformedResponse, message)
    }

    /// Classify a transport-level failure from reqwest
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network(format!("Request timeout: {}", err))
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            Self::malformed(format!("Failed to decode response: {}", err))
        } else if err.is_body() || err.is_request() {
            Self::network(format!("Request failed: {}", err))
        } else {
            Self::new(LlmErrorKind::Unknown, format!("Request failed: {}", err))
        }
    }

    /// Classify a non-success HTTP response
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let (detail, invalid_key) = parse_error_body(body);
        let message = format!("HTTP {}: {}", status, detail);

        if invalid_key {
            return Self::new(LlmErrorKind::Auth, message);
        }

        let kind = match status.as_u16() {
            401 | 403 => LlmErrorKind::Auth,
            429 => LlmErrorKind::RateLimit,
            400 | 404 | 422 => LlmErrorKind::InvalidRequest,
            500..=599 => LlmErrorKind::ServerError,
            _ => LlmErrorKind::Unknown,
        };

        Self::new(kind, message)
    }
}

/// Extract a readable detail from an error body and whether it reports a bad key
fn parse_error_body(body: &str) -> (String, bool) {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error:
                ErrorDetail::Structured {
                    message,
                    error_type,
                    code,
                },
        }) => {
            let invalid_key = code.as_ref().and_then(|c| c.as_str()) == Some("invalid_api_key")
                || error_type.as_deref() == Some("authentication_error");
            let detail = match (error_type, message) {
                (Some(t), Some(m)) => format!("{} ({})", m, t),
                (None, Some(m)) => m,
                (Some(t), None) => t,
                (None, None) => body.to_string(),
            };
            (detail, invalid_key)
        }
        Ok(ErrorEnvelope {
            error: ErrorDetail::Plain(message),
        }) => (message, false),
        Err(_) => (body.to_string(), false),
    }
}
