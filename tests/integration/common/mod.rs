//! Common test utilities and fixtures for integration tests
//!
//! Builds the composed application router against a fresh SQLite store and a
//! provider chosen per test.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, Response},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use chatrelay_common::config::Config;
use chatrelay_conversations::{ConversationService, MessageRepository};
use chatrelay_llm::{
    ChatProvider, CompletionSettings, LlmConfig, LlmError, MockLlmService, ProviderAdapter,
    ProviderKind,
};

/// Test application: router plus direct access to the service behind it
pub struct TestApp {
    pub router: Router,
    pub service: Arc<ConversationService>,
}

impl TestApp {
    /// In-memory store with an arbitrary provider
    pub async fn with_provider(provider: Arc<dyn ChatProvider>) -> Result<Self> {
        let repo = MessageRepository::connect_in_memory().await?;
        let service = Arc::new(ConversationService::new(Arc::new(repo), provider));
        Ok(Self {
            router: chatrelay_app::create_app(service.clone()),
            service,
        })
    }

    /// In-memory store with a mock backend that always answers `reply`
    pub async fn with_reply(reply: &str) -> Result<Self> {
        let adapter = ProviderAdapter::new(
            Arc::new(MockLlmService::with_reply(reply)),
            CompletionSettings::default(),
        );
        Self::with_provider(Arc::new(adapter)).await
    }

    /// In-memory store with a provider whose credential is missing
    pub async fn unconfigured() -> Result<Self> {
        let adapter = chatrelay_app::build_provider(Err(LlmError::configuration(
            "No API key found in GROQ_API_KEY or OPENAI_API_KEY",
        )));
        Self::with_provider(Arc::new(adapter)).await
    }

    /// In-memory store talking to an OpenAI-compatible server at `base_url`
    pub async fn with_openai_server(base_url: &str) -> Result<Self> {
        let config = LlmConfig {
            provider: ProviderKind::OpenAi,
            api_key: Some("test-key".to_string()),
            base_url: Some(base_url.to_string()),
            ..Default::default()
        };
        Self::with_provider(Arc::new(ProviderAdapter::from_config(&config))).await
    }

    /// File-backed store under `dir`, opened through the production path
    pub async fn on_disk(dir: &Path, reply: &str) -> Result<Self> {
        let config = Config {
            database_url: format!("sqlite://{}", dir.join("chat.db").display()),
            ..Config::from_lookup(|_| None)?
        };
        let adapter = ProviderAdapter::new(
            Arc::new(MockLlmService::with_reply(reply)),
            CompletionSettings::default(),
        );
        let service = chatrelay_app::build_service(&config, Arc::new(adapter)).await?;
        Ok(Self {
            router: chatrelay_app::create_app(service.clone()),
            service,
        })
    }

    /// Send a request and return the status and parsed JSON body
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (u16, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&b).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        (status, parse_body(response).await)
    }

    pub async fn get_messages(&self) -> Vec<Value> {
        let (status, body) = self.request(Method::GET, "/api/messages", None).await;
        assert_eq!(status, 200);
        body["messages"].as_array().cloned().unwrap_or_default()
    }

    pub async fn post_message(&self, text: &str) -> (u16, Value) {
        self.request(
            Method::POST,
            "/api/messages",
            Some(serde_json::json!({ "message": text })),
        )
        .await
    }
}

/// Parse response body as JSON Value
pub async fn parse_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
