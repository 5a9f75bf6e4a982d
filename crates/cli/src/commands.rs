//! Command implementations shared by the binary and its tests

use anyhow::{Context, Result};
use relgraph_core::{config::StorageConfig, Config, NodeWritePolicy};
use relgraph_importer::{import_documents, import_graph, ImportOptions, ImportSummary};
use relgraph_storage::{
    create_document_repository, create_graph_repository, id_properties, parse_label,
    DocumentRepository, GraphNode, GraphRepository, RepoOutcome,
};
use std::path::Path;
use tracing::{error, info, warn};

/// Load configuration from `path` (or the global file) and validate it
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = Config::load(path).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Run a document import and release the repository afterwards
///
/// The repository is closed even when the import fails.
pub async fn run_document_import(
    repo: &dyn DocumentRepository,
    input: &Path,
    options: &ImportOptions,
) -> Result<ImportSummary> {
    let result = import_documents(repo, input, options).await;
    if let Err(e) = repo.close().await {
        warn!("Closing document repository: {e}");
    }
    result.with_context(|| format!("Document import from {} failed", input.display()))
}

/// Run a graph import and release the repository afterwards
pub async fn run_graph_import(
    repo: &dyn GraphRepository,
    input: &Path,
    options: &ImportOptions,
) -> Result<ImportSummary> {
    let result = import_graph(repo, input, options).await;
    if let Err(e) = repo.close().await {
        warn!("Closing graph repository: {e}");
    }
    result.with_context(|| format!("Graph import from {} failed", input.display()))
}

/// One-line human summary of an import
pub fn render_summary(summary: &ImportSummary) -> String {
    format!(
        "Imported {} lines ({} malformed, {} unmapped, {} failed writes) in {:.2?}",
        summary.accepted,
        summary.malformed,
        summary.unmapped,
        summary.failed_writes,
        summary.elapsed
    )
}

/// Nodes under a user-supplied label, optionally narrowed to one `id`
///
/// # Errors
/// Fails on an unknown label before touching the repository, and when the
/// repository reports `NotConnected` or a backend failure.
pub async fn list_nodes(
    repo: &dyn GraphRepository,
    label: &str,
    id: Option<&str>,
) -> Result<Vec<GraphNode>> {
    let label = parse_label(label)?;
    let filters = id.map(id_properties);
    let nodes = repo
        .find_nodes(label, filters.as_ref())
        .await
        .into_result("Neo4j")?;
    Ok(nodes)
}

/// [`list_nodes`] followed by closing the repository
pub async fn run_list_nodes(
    repo: &dyn GraphRepository,
    label: &str,
    id: Option<&str>,
) -> Result<Vec<GraphNode>> {
    let result = list_nodes(repo, label, id).await;
    if let Err(e) = repo.close().await {
        warn!("Closing graph repository: {e}");
    }
    result
}

/// Connectivity of each backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyReport {
    pub document_store: bool,
    pub graph_store: bool,
}

impl VerifyReport {
    pub fn all_ok(&self) -> bool {
        self.document_store && self.graph_store
    }
}

/// Connect to both backends, check them, and close them again
pub async fn verify(config: &StorageConfig) -> VerifyReport {
    let document_store = match create_document_repository(config).await {
        Ok(repo) => {
            let ok = repo.list_collections().await.is_ok();
            if let Err(e) = repo.close().await {
                warn!("Closing document repository: {e}");
            }
            ok
        }
        Err(e) => {
            error!("MongoDB check failed: {e}");
            false
        }
    };
    info!("MongoDB reachable: {document_store}");

    let graph_store = match create_graph_repository(config, NodeWritePolicy::default()).await {
        Ok(repo) => {
            let ok = matches!(repo.verify_connection().await, RepoOutcome::Ok(true));
            if let Err(e) = repo.close().await {
                warn!("Closing graph repository: {e}");
            }
            ok
        }
        Err(e) => {
            error!("Neo4j check failed: {e}");
            false
        }
    };
    info!("Neo4j reachable: {graph_store}");

    VerifyReport {
        document_store,
        graph_store,
    }
}
