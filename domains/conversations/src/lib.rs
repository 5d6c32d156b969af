//! Conversations domain: message log, turn orchestration, HTTP routes

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Message, MessageRole, TurnOutcome};
pub use domain::state::{StateError, TurnEvent, TurnState, TurnStateMachine};

// Re-export repository types
pub use repository::{MessageRepository, MessageStore};

pub use service::{ConversationService, TurnError};

// Re-export API types
pub use api::routes;
pub use api::ConversationsState;
