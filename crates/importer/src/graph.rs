//! Relation file → graph store

use crate::error::ImportError;
use crate::progress::{ImportSummary, Progress};
use crate::reader::LineStream;
use crate::ImportOptions;
use relgraph_core::{GraphMapping, NodeLabel, ParsedLine, RelationRecord};
use relgraph_storage::{id_properties, GraphRepository};
use std::path::Path;
use tracing::{info, warn};

const BACKEND: &str = "Neo4j";

/// Load a relation file into the graph
///
/// Each accepted row writes the subject `User` node, the object node under
/// the mapped label, and the mapped relationship between them. Whether
/// repeated rows duplicate nodes depends on the repository's write policy.
///
/// # Errors
/// * `ImportError::FileAccess` if the input cannot be opened
/// * `ImportError::Read` if reading stops partway through
/// * `ImportError::NotConnected` if the repository has no open connection
pub async fn import_graph(
    repo: &dyn GraphRepository,
    path: &Path,
    options: &ImportOptions,
) -> Result<ImportSummary, ImportError> {
    info!("Importing {} into the graph", path.display());

    let mut progress = Progress::new(BACKEND, options.progress_interval);
    let mut lines = LineStream::spawn(path, options.channel_capacity);

    while let Some(parsed) = lines.recv().await {
        let record = match parsed {
            ParsedLine::Record(record) => record,
            ParsedLine::Malformed { line, fields } => {
                progress.malformed(line, fields);
                continue;
            }
        };
        let Some(mapping) = options.mapper.graph_mapping(&record.relation) else {
            progress.unmapped(&record);
            continue;
        };

        write_record(repo, &record, mapping, &mut progress).await?;
        progress.accept();
    }
    lines.finish().await?;

    Ok(progress.finish())
}

async fn write_record(
    repo: &dyn GraphRepository,
    record: &RelationRecord,
    mapping: GraphMapping,
    progress: &mut Progress,
) -> Result<(), ImportError> {
    let subject = id_properties(&record.subject_id);
    let object = id_properties(&record.object_id);

    progress.settle(repo.create_node(NodeLabel::User, &subject).await)?;
    progress.settle(repo.create_node(mapping.target_label, &object).await)?;

    let created = progress.settle(
        repo.create_relationship(
            NodeLabel::User,
            &subject,
            mapping.target_label,
            &object,
            mapping.rel_type,
            None,
        )
        .await,
    )?;
    if created == Some(false) {
        warn!(
            "No '{}' relationship written for {} -> {}",
            mapping.rel_type, record.subject_id, record.object_id
        );
    }
    Ok(())
}
