//! Chat Relay application composition root
//!
//! Wires the message store and provider adapter into the conversation service
//! and mounts its routes next to the infrastructure endpoints.

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use chatrelay_common::config::Config;
use chatrelay_conversations::{
    ConversationService, ConversationsState, MessageRepository, MessageStore,
};
use chatrelay_llm::{ChatProvider, LlmConfig, ProviderAdapter};

/// Build the provider adapter from environment-derived settings.
///
/// A bad provider configuration is not fatal: the adapter answers every turn
/// with the not-configured apology instead.
pub fn build_provider(llm_config: Result<LlmConfig, chatrelay_llm::LlmError>) -> ProviderAdapter {
    match llm_config {
        Ok(config) => ProviderAdapter::from_config(&config),
        Err(error) => ProviderAdapter::unconfigured(error),
    }
}

/// Open the store named in `config` and build the conversation service
pub async fn build_service(
    config: &Config,
    provider: Arc<dyn ChatProvider>,
) -> Result<Arc<ConversationService>, anyhow::Error> {
    let repo = MessageRepository::connect(&config.database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open message store: {}", e))?;
    tracing::info!(database_url = %config.database_url, "Message store ready");

    let store: Arc<dyn MessageStore> = Arc::new(repo);
    Ok(Arc::new(ConversationService::new(store, provider)))
}

/// Create the main application router with all routes
pub fn create_app(service: Arc<ConversationService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(banner))
        .merge(chatrelay_conversations::routes().with_state(ConversationsState::new(service)))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn banner() -> Json<Value> {
    Json(json!({
        "status": "Chat Relay API is running",
        "endpoints": {
            "GET /api/messages": "Get all chat messages",
            "POST /api/messages": "Send a new message",
            "DELETE /api/messages": "Clear all messages",
        }
    }))
}
