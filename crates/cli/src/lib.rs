//! Library interface for the relgraph CLI
//!
//! Command bodies live here so integration tests can drive them against the
//! in-memory repositories; `main.rs` only parses arguments and connects.

pub mod commands;

pub use anyhow::Result;
pub use relgraph_core::config::Config;
