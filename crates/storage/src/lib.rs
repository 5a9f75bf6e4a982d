#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Document and graph repositories for relation imports
//!
//! Two backends sit behind object-safe traits: [`DocumentRepository`]
//! (MongoDB) and [`GraphRepository`] (Neo4j). Every operation answers a
//! [`RepoOutcome`] so callers can distinguish a missing connection from a
//! backend failure.

pub mod document;
pub mod error;
mod factory;
pub mod graph;
mod handle;
pub mod mock;
mod outcome;

pub use document::{DocumentRepository, MongoDocumentRepository};
pub use error::StorageError;
pub use factory::{create_document_repository, create_graph_repository};
pub use graph::{
    id_properties, parse_label, GraphNode, GraphRepository, Neo4jGraphRepository, Properties, Row,
};
pub use outcome::RepoOutcome;

// Callers build queries with the same BSON types the driver uses
pub use mongodb::bson;
