//! Domain entities for the Conversations domain
//!
//! A conversation is one append-only, ordered log of role-tagged messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chatrelay_common::StoreError;
use chatrelay_llm::{LlmMessage, LlmRole};

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MessageRole {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(StoreError::InvalidData(format!(
                "unknown message role: {:?}",
                other
            ))),
        }
    }
}

impl From<MessageRole> for LlmRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => LlmRole::User,
            MessageRole::Assistant => LlmRole::Assistant,
        }
    }
}

/// Message entity
///
/// `id` and `timestamp` are assigned by the store; nothing is mutable after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Validate message content (CHECK (length(trim(content)) > 0))
    pub fn validate_content(content: &str) -> Result<(), StoreError> {
        if content.trim().is_empty() {
            return Err(StoreError::InvalidData(
                "Message content cannot be empty or whitespace-only".to_string(),
            ));
        }
        Ok(())
    }

    /// Canonical history order: (timestamp, id)
    pub fn sort_key(&self) -> (DateTime<Utc>, i64) {
        (self.timestamp, self.id)
    }

    /// Project to the provider-facing shape (role and content only)
    pub fn to_llm(&self) -> LlmMessage {
        LlmMessage {
            role: self.role.into(),
            content: self.content.clone(),
        }
    }
}

/// Both halves of a completed turn, in creation order
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub user: Message,
    pub assistant: Message,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_display() {
        assert_eq!(MessageRole::User.to_string(), "user");
        assert_eq!(MessageRole::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_message_role_parse() {
        assert_eq!("user".parse::<MessageRole>().unwrap(), MessageRole::User);
        assert_eq!(
            "assistant".parse::<MessageRole>().unwrap(),
            MessageRole::Assistant
        );
        assert!(matches!(
            "system".parse::<MessageRole>(),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[test]
    fn test_message_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MessageRole::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_validate_content() {
        assert!(Message::validate_content("hello").is_ok());
        assert!(Message::validate_content("").is_err());
        assert!(Message::validate_content(" \n\t ").is_err());
    }

    #[test]
    fn test_to_llm_keeps_role_and_content() {
        let message = Message {
            id: 7,
            role: MessageRole::Assistant,
            content: "Hi there".to_string(),
            timestamp: Utc::now(),
        };
        let llm = message.to_llm();
        assert_eq!(llm.role, LlmRole::Assistant);
        assert_eq!(llm.content, "Hi there");
    }

    #[test]
    fn test_sort_key_breaks_ties_by_id() {
        let now = Utc::now();
        let a = Message {
            id: 1,
            role: MessageRole::User,
            content: "a".to_string(),
            timestamp: now,
        };
        let b = Message {
            id: 2,
            role: MessageRole::Assistant,
            content: "b".to_string(),
            timestamp: now,
        };
        assert!(a.sort_key() < b.sort_key());
    }
}
