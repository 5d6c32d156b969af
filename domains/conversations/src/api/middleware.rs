//! Conversations domain state

use std::sync::Arc;

use crate::ConversationService;

/// Application state for the Conversations domain
#[derive(Clone)]
pub struct ConversationsState {
    pub service: Arc<ConversationService>,
}

impl ConversationsState {
    pub fn new(service: Arc<ConversationService>) -> Self {
        Self { service }
    }
}
