//! State machine for a single conversation turn
//!
//! Received → UserPersisted → ProviderInvoked → AssistantPersisted → Complete,
//! with Failed reachable from every non-terminal state.

pub use chatrelay_common::StateError;
use serde::{Deserialize, Serialize};

/// Turn states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    Received,
    UserPersisted,
    ProviderInvoked,
    AssistantPersisted,
    Complete,
    Failed,
}

impl TurnState {
    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [TurnState] {
        match self {
            Self::Received => &[Self::UserPersisted, Self::Failed],
            Self::UserPersisted => &[Self::ProviderInvoked, Self::Failed],
            Self::ProviderInvoked => &[Self::AssistantPersisted, Self::Failed],
            Self::AssistantPersisted => &[Self::Complete, Self::Failed],
            Self::Complete | Self::Failed => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl std::fmt::Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Received => write!(f, "received"),
            Self::UserPersisted => write!(f, "user_persisted"),
            Self::ProviderInvoked => write!(f, "provider_invoked"),
            Self::AssistantPersisted => write!(f, "assistant_persisted"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Events that drive a turn forward
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnEvent {
    /// The user message was appended to the store
    PersistUser,
    /// History was read and handed to the provider
    InvokeProvider,
    /// The assistant reply was appended to the store
    PersistAssistant,
    /// Both messages were returned to the caller
    Finish,
    /// Validation or persistence failed
    Fail,
}

impl std::fmt::Display for TurnEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersistUser => write!(f, "persist_user"),
            Self::InvokeProvider => write!(f, "invoke_provider"),
            Self::PersistAssistant => write!(f, "persist_assistant"),
            Self::Finish => write!(f, "finish"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Turn state machine
pub struct TurnStateMachine;

impl TurnStateMachine {
    /// Attempt a state transition
    pub fn transition(current: TurnState, event: TurnEvent) -> Result<TurnState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (current, event) {
            (_, TurnEvent::Fail) => TurnState::Failed,
            (TurnState::Received, TurnEvent::PersistUser) => TurnState::UserPersisted,
            (TurnState::UserPersisted, TurnEvent::InvokeProvider) => TurnState::ProviderInvoked,
            (TurnState::ProviderInvoked, TurnEvent::PersistAssistant) => {
                TurnState::AssistantPersisted
            }
            (TurnState::AssistantPersisted, TurnEvent::Finish) => TurnState::Complete,
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }
}
