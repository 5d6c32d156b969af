//! Request handlers

pub mod messages;
