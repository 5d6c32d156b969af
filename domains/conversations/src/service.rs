//! Conversation orchestrator
//!
//! Coordinates store reads and writes around one provider call per turn.
//! Only validation and store failures can fail a turn; provider trouble
//! arrives here already converted into assistant text.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use chatrelay_common::{Error, StateError, StoreError};
use chatrelay_llm::{ChatProvider, LlmMessage, GENERIC_FAILURE_REPLY};

use crate::domain::entities::{Message, MessageRole, TurnOutcome};
use crate::domain::state::{TurnEvent, TurnState, TurnStateMachine};
use crate::repository::MessageStore;

/// Errors that fail a turn end-to-end
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("{0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Turn state error: {0}")]
    State(#[from] StateError),
}

impl From<TurnError> for Error {
    fn from(err: TurnError) -> Self {
        match err {
            TurnError::Validation(msg) => Error::Validation(msg),
            TurnError::Store(e) => e.into(),
            TurnError::State(e) => Error::Internal(e.to_string()),
        }
    }
}

/// In-flight unit of work: the user text, the reply once known, and where
/// the turn is in its lifecycle
#[derive(Debug)]
struct ConversationTurn {
    text: String,
    reply: Option<String>,
    state: TurnState,
}

impl ConversationTurn {
    fn new(text: String) -> Self {
        Self {
            text,
            reply: None,
            state: TurnState::Received,
        }
    }

    fn advance(&mut self, event: TurnEvent) -> Result<(), StateError> {
        let next = TurnStateMachine::transition(self.state, event)?;
        tracing::debug!(from = %self.state, to = %next, "Turn state transition");
        self.state = next;
        Ok(())
    }

    /// Move to `Failed` and hand back the error that caused it
    fn fail(&mut self, error: impl Into<TurnError>) -> TurnError {
        let error = error.into();
        tracing::warn!(state = %self.state, error = %error, "Turn failed");
        if let Ok(next) = TurnStateMachine::transition(self.state, TurnEvent::Fail) {
            self.state = next;
        }
        error
    }
}

/// Orchestrates turns against one message log
pub struct ConversationService {
    store: Arc<dyn MessageStore>,
    provider: Arc<dyn ChatProvider>,
    // Held for a whole turn so turn N's reply lands before turn N+1's user message
    turn_lock: Mutex<()>,
}

impl ConversationService {
    pub fn new(store: Arc<dyn MessageStore>, provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            store,
            provider,
            turn_lock: Mutex::new(()),
        }
    }

    /// Full conversation history in canonical order
    pub async fn get_history(&self) -> Result<Vec<Message>, TurnError> {
        Ok(self.store.list_all().await?)
    }

    /// Run one turn: persist the user text, ask the provider, persist the reply.
    ///
    /// If the reply cannot be stored the user message stays persisted; there
    /// is no compensating delete.
    pub async fn post_turn(&self, text: &str) -> Result<TurnOutcome, TurnError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TurnError::Validation("Message is required".to_string()));
        }

        let mut turn = ConversationTurn::new(text.to_string());
        let _guard = self.turn_lock.lock().await;

        let user = match self.store.append(MessageRole::User, &turn.text).await {
            Ok(message) => message,
            Err(e) => return Err(turn.fail(e)),
        };
        turn.advance(TurnEvent::PersistUser)?;

        let history = match self.store.list_all().await {
            Ok(history) => history,
            Err(e) => return Err(turn.fail(e)),
        };
        let llm_history: Vec<LlmMessage> = history.iter().map(Message::to_llm).collect();
        turn.advance(TurnEvent::InvokeProvider)?;

        let reply = self.provider.complete(&llm_history).await;
        let reply = match reply.trim() {
            "" => GENERIC_FAILURE_REPLY.to_string(),
            trimmed => trimmed.to_string(),
        };
        turn.reply = Some(reply);

        let reply = turn.reply.as_deref().unwrap_or(GENERIC_FAILURE_REPLY);
        let assistant = match self.store.append(MessageRole::Assistant, reply).await {
            Ok(message) => message,
            Err(e) => return Err(turn.fail(e)),
        };
        turn.advance(TurnEvent::PersistAssistant)?;
        turn.advance(TurnEvent::Finish)?;

        tracing::info!(
            user_id = user.id,
            assistant_id = assistant.id,
            history_len = history.len(),
            "Turn complete"
        );

        Ok(TurnOutcome { user, assistant })
    }

    /// Irreversibly empty the log; a no-op on an empty log
    pub async fn clear_history(&self) -> Result<(), TurnError> {
        let _guard = self.turn_lock.lock().await;
        self.store.clear_all().await?;
        Ok(())
    }
}
