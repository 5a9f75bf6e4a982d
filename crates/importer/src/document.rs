//! Relation file → document store

use crate::error::ImportError;
use crate::progress::{ImportSummary, Progress};
use crate::reader::LineStream;
use crate::ImportOptions;
use relgraph_core::{DocumentWritePolicy, ParsedLine, RelationRecord};
use relgraph_storage::bson::{doc, Bson};
use relgraph_storage::{DocumentRepository, RepoOutcome};
use std::path::Path;
use tracing::{info, warn};

const BACKEND: &str = "MongoDB";

/// Load a relation file into `options.collection`
///
/// Under [`DocumentWritePolicy::Append`] every accepted row becomes its own
/// `{user_id, <field>: [object]}` document. Under
/// [`DocumentWritePolicy::Merge`] rows are pushed into one document per
/// `user_id`, created on first sight.
///
/// # Errors
/// * `ImportError::FileAccess` if the input cannot be opened
/// * `ImportError::Read` if reading stops partway through
/// * `ImportError::NotConnected` if the repository has no open connection
pub async fn import_documents(
    repo: &dyn DocumentRepository,
    path: &Path,
    options: &ImportOptions,
) -> Result<ImportSummary, ImportError> {
    let collection = options.collection.as_str();
    info!(
        "Importing {} into collection '{}' ({:?} policy)",
        path.display(),
        collection,
        options.document_policy
    );

    let mut progress = Progress::new(BACKEND, options.progress_interval);

    match repo.ensure_collection(collection).await {
        RepoOutcome::Ok(_) => {}
        RepoOutcome::NotConnected => {
            return Err(ImportError::NotConnected {
                backend: BACKEND,
                accepted: 0,
            })
        }
        // The first insert creates the collection anyway
        RepoOutcome::OperationFailed(reason) => {
            warn!("Could not ensure collection '{}': {}", collection, reason)
        }
    }

    let mut lines = LineStream::spawn(path, options.channel_capacity);
    while let Some(parsed) = lines.recv().await {
        let record = match parsed {
            ParsedLine::Record(record) => record,
            ParsedLine::Malformed { line, fields } => {
                progress.malformed(line, fields);
                continue;
            }
        };
        let Some(field) = options.mapper.document_field(&record.relation) else {
            progress.unmapped(&record);
            continue;
        };

        write_record(repo, collection, options.document_policy, &record, field, &mut progress)
            .await?;
        progress.accept();
    }
    lines.finish().await?;

    Ok(progress.finish())
}

async fn write_record(
    repo: &dyn DocumentRepository,
    collection: &str,
    policy: DocumentWritePolicy,
    record: &RelationRecord,
    field: &str,
    progress: &mut Progress,
) -> Result<(), ImportError> {
    let subject = record.subject_id.as_str();
    let object = record.object_id.as_str();

    match policy {
        DocumentWritePolicy::Append => {
            let document = doc! { "user_id": subject, field: [object] };
            progress.settle(repo.insert_one(collection, document).await)?;
        }
        DocumentWritePolicy::Merge => {
            let query = doc! { "user_id": subject };
            let value = Bson::String(object.to_string());
            progress.settle(repo.push_to_array(collection, query, field, value).await)?;
        }
    }
    Ok(())
}
