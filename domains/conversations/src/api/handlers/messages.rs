//! Message API handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use chatrelay_common::{Error, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::ConversationsState;
use crate::domain::entities::{Message, MessageRole};

/// Request for sending a message
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Message text; surrounding whitespace is trimmed before storage
    #[serde(default)]
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

/// Message response DTO
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: i64,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            role: m.role,
            content: m.content,
            timestamp: m.timestamp,
        }
    }
}

/// Envelope for every response that carries messages
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub success: bool,
    pub messages: Vec<MessageResponse>,
}

impl MessagesResponse {
    fn ok(messages: impl IntoIterator<Item = Message>) -> Self {
        Self {
            success: true,
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: &'static str,
}

/// List the whole conversation in canonical order
pub async fn list_messages(
    State(state): State<ConversationsState>,
) -> Result<Json<MessagesResponse>> {
    let messages = state
        .service
        .get_history()
        .await
        .map_err(|e| Error::from(e).or_public("Failed to fetch messages"))?;
    Ok(Json(MessagesResponse::ok(messages)))
}

/// Run one turn and return the user and assistant messages it created
pub async fn send_message(
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> Result<Json<MessagesResponse>> {
    let outcome = state
        .service
        .post_turn(&req.message)
        .await
        .map_err(|e| Error::from(e).or_public("Failed to process message"))?;
    Ok(Json(MessagesResponse::ok([outcome.user, outcome.assistant])))
}

/// Delete every message
pub async fn clear_messages(State(state): State<ConversationsState>) -> Result<Json<ClearResponse>> {
    state
        .service
        .clear_history()
        .await
        .map_err(|e| Error::from(e).or_public("Failed to clear messages"))?;
    Ok(Json(ClearResponse {
        success: true,
        message: "All messages cleared",
    }))
}
