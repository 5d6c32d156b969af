//! SQLite message repository
//!
//! Queries use the runtime-checked `sqlx::query_as` form so no database is
//! needed at compile time. Migrations under `migrations/` are embedded.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use chatrelay_common::StoreError;

use super::MessageStore;
use crate::domain::entities::{Message, MessageRole};

const MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Raw row as stored; converted to [`Message`] after validation
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    role: String,
    content: String,
    timestamp: i64,
}

impl TryFrom<MessageRow> for Message {
    type Error = StoreError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let timestamp = DateTime::<Utc>::from_timestamp_micros(row.timestamp).ok_or_else(|| {
            StoreError::InvalidData(format!(
                "message {} has out-of-range timestamp {}",
                row.id, row.timestamp
            ))
        })?;

        Ok(Message {
            id: row.id,
            role: row.role.parse()?,
            content: row.content,
            timestamp,
        })
    }
}

#[derive(Clone, Debug)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `url` and run pending migrations.
    ///
    /// `url` is a sqlx SQLite URL such as `sqlite://chat.db`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        Self::migrate(pool).await
    }

    /// Private in-memory database, for tests and throwaway runs.
    ///
    /// Every pooled connection would get its own empty database, so the pool
    /// is pinned to one connection that is never recycled.
    pub async fn connect_in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every connection; later calls fail with a store error
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn append(&self, role: MessageRole, content: &str) -> Result<Message, StoreError> {
        Message::validate_content(content)?;

        // Never hand out a timestamp older than the newest stored one, so
        // (timestamp, id) order always matches insertion order.
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (role, content, timestamp)
            VALUES (
                ?1,
                ?2,
                MAX(?3, COALESCE((SELECT MAX(timestamp) FROM messages), 0))
            )
            RETURNING id, role, content, timestamp
            "#,
        )
        .bind(role.as_str())
        .bind(content)
        .bind(Utc::now().timestamp_micros())
        .fetch_one(&self.pool)
        .await?;

        let message = Message::try_from(row)?;
        tracing::debug!(id = message.id, role = %message.role, "Message appended");
        Ok(message)
    }

    async fn list_all(&self) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, role, content, timestamp
            FROM messages
            ORDER BY timestamp ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Message::try_from).collect()
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM messages")
            .execute(&self.pool)
            .await?;

        tracing::info!(deleted = result.rows_affected(), "Message log cleared");
        Ok(())
    }
}
