//! Shared utilities, configuration, and error handling for Chat Relay
//!
//! This crate provides common functionality used across the workspace:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Store and state machine error types
//! - Validating JSON extractor

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod state;

pub use config::Config;
pub use db::StoreError;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
pub use state::StateError;
