//! API endpoint integration tests
//!
//! Drives the composed router over HTTP-shaped requests: message log,
//! turn behaviour under provider failures, ordering invariants.

#![allow(dead_code)]

mod common;
mod invariants;
mod messages;
