//! Core types for the relgraph importer
//!
//! This crate provides the pieces shared by every backend:
//!
//! - **Records**: the pipe-delimited `subject|relation|object` reader
//! - **Relations**: the immutable relation table and its mapper
//! - **Configuration**: connection and import settings
//! - **Error handling**: unified error types

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod record;
pub mod relation;

// Re-export main types for convenience
pub use config::{Config, DocumentWritePolicy, ImportConfig, NodeWritePolicy, StorageConfig};
pub use error::{Error, Result, ResultExt};
pub use record::{ParsedLine, RecordReader, RelationRecord};
pub use relation::{
    GraphMapping, NodeLabel, RelationEntry, RelationMapper, RelationshipType, DEFAULT_RELATIONS,
};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
