//! Relation file importers
//!
//! Streams a `subject|relation|object` file into either the document store
//! or the graph store. A blocking reader task parses the file and feeds a
//! bounded channel; the async side maps each record and writes it
//! sequentially through a repository trait object.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod document;
mod error;
mod graph;
mod progress;
mod reader;

pub use document::import_documents;
pub use error::ImportError;
pub use graph::import_graph;
pub use progress::ImportSummary;

use relgraph_core::{DocumentWritePolicy, ImportConfig, RelationMapper};

/// Settings for a single import run
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Accepted rows between progress log lines
    pub progress_interval: u64,
    /// Capacity of the reader → writer channel
    pub channel_capacity: usize,
    /// Target collection (document imports only)
    pub collection: String,
    /// How document imports combine rows (document imports only)
    pub document_policy: DocumentWritePolicy,
    pub mapper: RelationMapper,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self::from(&ImportConfig::default())
    }
}

impl From<&ImportConfig> for ImportOptions {
    fn from(config: &ImportConfig) -> Self {
        Self {
            progress_interval: config.progress_interval,
            channel_capacity: config.channel_capacity,
            collection: config.collection.clone(),
            document_policy: config.document_policy,
            mapper: RelationMapper::default(),
        }
    }
}
