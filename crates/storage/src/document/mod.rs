//! Document-model repository

pub(crate) mod mongo;

pub use mongo::MongoDocumentRepository;

use crate::error::StorageError;
use crate::outcome::RepoOutcome;
use async_trait::async_trait;
use mongodb::bson::{Bson, Document};

/// Collection-scoped CRUD over a document store
///
/// Every call checks the connection handle first and answers
/// [`RepoOutcome::NotConnected`] without touching the backend when it is
/// absent. Backend errors are logged and returned as
/// [`RepoOutcome::OperationFailed`].
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Create the collection if it does not exist
    ///
    /// # Returns
    /// * `Ok(true)` if the collection was created, `Ok(false)` if it already existed
    async fn ensure_collection(&self, name: &str) -> RepoOutcome<bool>;

    /// Insert a document and return its id
    async fn insert_one(&self, name: &str, document: Document) -> RepoOutcome<String>;

    /// Insert documents and return their ids in input order
    async fn insert_many(&self, name: &str, documents: Vec<Document>) -> RepoOutcome<Vec<String>>;

    async fn find_one(&self, name: &str, query: Document) -> RepoOutcome<Option<Document>>;

    async fn find_many(&self, name: &str, query: Document) -> RepoOutcome<Vec<Document>>;

    /// Apply `patch` with `$set` to the first match
    ///
    /// # Returns
    /// * Number of modified documents (0 or 1)
    async fn update_one(&self, name: &str, query: Document, patch: Document) -> RepoOutcome<u64>;

    /// Append `value` to the array `field` of the first match, creating the
    /// document from `query` when nothing matches
    ///
    /// # Returns
    /// * Number of modified or inserted documents (0 or 1)
    async fn push_to_array(
        &self,
        name: &str,
        query: Document,
        field: &str,
        value: Bson,
    ) -> RepoOutcome<u64>;

    /// Delete the first match and return the deleted count
    async fn delete_one(&self, name: &str, query: Document) -> RepoOutcome<u64>;

    async fn drop_collection(&self, name: &str) -> RepoOutcome<()>;

    async fn list_collections(&self) -> RepoOutcome<Vec<String>>;

    /// Release the connection
    ///
    /// # Errors
    /// * `StorageError::AlreadyClosed` on every call after the first successful one
    /// * `StorageError::NotConnected` if no connection was ever established
    async fn close(&self) -> Result<(), StorageError>;
}
