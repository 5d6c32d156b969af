//! Shared persistence error type
//!
//! Every store implementation reports failures through [`StoreError`] so the
//! orchestration layer never sees driver-specific errors.

use crate::error::Error;
use thiserror::Error;

/// Persistence-medium errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Connection(e) => Error::Database(e),
            StoreError::Migration(e) => Error::Internal(format!("Migration failed: {}", e)),
            StoreError::InvalidData(msg) => Error::Internal(format!("Invalid stored data: {}", msg)),
            StoreError::Unavailable(msg) => Error::Internal(format!("Store unavailable: {}", msg)),
        }
    }
}
