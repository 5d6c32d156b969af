//! Route definitions for Conversations domain API

use axum::{routing::get, Router};

use super::handlers::messages;
use super::middleware::ConversationsState;

/// Create all Conversations domain API routes
pub fn routes() -> Router<ConversationsState> {
    Router::new().route(
        "/api/messages",
        get(messages::list_messages)
            .post(messages::send_message)
            .delete(messages::clear_messages),
    )
}
