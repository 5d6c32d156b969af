//! Mock LLM Service Implementation
//!
//! Used by `LlmServiceFactory` when provider is `"mock"`, and by tests that
//! need a deterministic or deliberately failing backend.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{CompletionRequest, CompletionResponse, LlmError, LlmErrorKind, LlmService};

const MOCK_MODEL: &str = "mock-model";

#[derive(Debug, Clone)]
enum Behavior {
    Echo,
    Reply(String),
    Fail(LlmErrorKind),
}

/// Mock LLM service for testing
#[derive(Debug)]
pub struct MockLlmService {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl MockLlmService {
    /// Mock that answers `"Mock response to: <last message>"`
    pub fn new() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    /// Mock that always answers with `reply`
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Reply(reply.into()))
    }

    /// Mock that always fails with an error of `kind`
    pub fn failing(kind: LlmErrorKind) -> Self {
        Self::with_behavior(Behavior::Fail(kind))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of completion requests received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockLlmService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::info!(history_len = request.messages.len(), "Mock LLM service processing completion request");

        let content = match &self.behavior {
            Behavior::Echo => {
                let last_message = request
                    .messages
                    .last()
                    .map(|m| m.content.as_str())
                    .unwrap_or("empty");
                format!("Mock response to: {}", last_message)
            }
            Behavior::Reply(reply) => reply.clone(),
            Behavior::Fail(kind) => {
                return Err(LlmError::new(*kind, "simulated provider failure"));
            }
        };

        let input_tokens = request
            .messages
            .iter()
            .map(|m| m.content.len() as u32 / 4)
            .sum::<u32>();
        let output_tokens = content.len() as u32 / 4;

        Ok(CompletionResponse {
            content,
            model: MOCK_MODEL.to_string(),
            input_tokens,
            output_tokens,
        })
    }

    fn model(&self) -> &str {
        MOCK_MODEL
    }
}
