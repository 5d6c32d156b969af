//! Message store seam and its SQLite implementation

pub mod messages;

use async_trait::async_trait;
use chatrelay_common::StoreError;

use crate::domain::entities::{Message, MessageRole};

pub use messages::MessageRepository;

/// Durable, append-only, ordered log of messages
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert a message; the store assigns `id` and `timestamp`
    async fn append(&self, role: MessageRole, content: &str) -> Result<Message, StoreError>;

    /// Every message in ascending (timestamp, id) order
    async fn list_all(&self) -> Result<Vec<Message>, StoreError>;

    /// Remove every message; succeeds on an empty store
    async fn clear_all(&self) -> Result<(), StoreError>;
}
