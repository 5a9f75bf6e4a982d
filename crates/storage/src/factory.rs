use crate::document::{DocumentRepository, MongoDocumentRepository};
use crate::graph::{GraphRepository, Neo4jGraphRepository};
use relgraph_core::{config::StorageConfig, Error, NodeWritePolicy};
use std::sync::Arc;

/// Connects the document store described by `config`.
///
/// Returns a trait object so the importer never sees which driver is behind it.
///
/// # Errors
/// Returns an error if the client cannot be created or the server does not
/// answer a ping
pub async fn create_document_repository(
    config: &StorageConfig,
) -> Result<Arc<dyn DocumentRepository>, Error> {
    let repo = MongoDocumentRepository::connect(config).await?;
    Ok(Arc::new(repo) as Arc<dyn DocumentRepository>)
}

/// Connects the graph store described by `config`.
///
/// # Arguments
/// * `config` - Connection settings
/// * `policy` - Whether node and relationship writes create or merge
///
/// # Errors
/// Returns an error if the driver rejects the settings or the connectivity
/// check fails
pub async fn create_graph_repository(
    config: &StorageConfig,
    policy: NodeWritePolicy,
) -> Result<Arc<dyn GraphRepository>, Error> {
    let repo = Neo4jGraphRepository::connect(config, policy).await?;
    Ok(Arc::new(repo) as Arc<dyn GraphRepository>)
}
