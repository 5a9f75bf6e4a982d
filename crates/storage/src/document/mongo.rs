use super::DocumentRepository;
use crate::error::StorageError;
use crate::handle::ConnectionHandle;
use crate::outcome::RepoOutcome;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection, Database};
use relgraph_core::StorageConfig;
use tracing::{debug, error, info, warn};

const BACKEND: &str = "MongoDB";

/// MongoDB-backed [`DocumentRepository`]
///
/// Holds one long-lived [`Client`] for its whole lifetime; the driver pools
/// connections underneath it.
pub struct MongoDocumentRepository {
    handle: ConnectionHandle<Client>,
    database: String,
}

impl MongoDocumentRepository {
    /// Connect to MongoDB and verify the server answers a `ping`
    ///
    /// # Errors
    /// * `StorageError::ConnectionFailed` if the URI is invalid or the server is unreachable
    pub async fn connect(config: &StorageConfig) -> Result<Self, StorageError> {
        info!("Connecting to MongoDB at {}", config.mongo_uri);

        let client = Client::with_uri_str(&config.mongo_uri)
            .await
            .map_err(|e| StorageError::ConnectionFailed(format!("MongoDB: {e}")))?;

        client
            .database(&config.mongo_database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StorageError::ConnectionFailed(format!("MongoDB ping failed: {e}")))?;

        info!(
            "MongoDB repository initialized for database '{}'",
            config.mongo_database
        );

        Ok(Self::from_client(client, &config.mongo_database))
    }

    /// Wrap an existing client without verifying it
    pub fn from_client(client: Client, database: &str) -> Self {
        Self {
            handle: ConnectionHandle::connected(BACKEND, client),
            database: database.to_string(),
        }
    }

    /// A repository with no connection; every operation answers `NotConnected`
    pub fn detached(database: &str) -> Self {
        Self {
            handle: ConnectionHandle::detached(BACKEND),
            database: database.to_string(),
        }
    }

    async fn db(&self, operation: &str) -> Option<Database> {
        match self.handle.get().await {
            Some(client) => Some(client.database(&self.database)),
            None => {
                error!(operation, "No MongoDB client is connected");
                None
            }
        }
    }

    async fn collection(&self, operation: &str, name: &str) -> Option<Collection<Document>> {
        self.db(operation)
            .await
            .map(|db| db.collection::<Document>(name))
    }
}

/// Render an inserted `_id` as a string
fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl DocumentRepository for MongoDocumentRepository {
    async fn ensure_collection(&self, name: &str) -> RepoOutcome<bool> {
        let Some(db) = self.db("ensure_collection").await else {
            return RepoOutcome::NotConnected;
        };

        let existing = match db.list_collection_names().await {
            Ok(names) => names,
            Err(e) => return RepoOutcome::failed("ensure_collection", e),
        };

        if existing.iter().any(|n| n == name) {
            warn!("Collection '{}' already exists", name);
            return RepoOutcome::Ok(false);
        }

        match db.create_collection(name).await {
            Ok(()) => {
                info!("Collection '{}' created successfully", name);
                RepoOutcome::Ok(true)
            }
            Err(e) => RepoOutcome::failed("ensure_collection", e),
        }
    }

    async fn insert_one(&self, name: &str, document: Document) -> RepoOutcome<String> {
        let Some(coll) = self.collection("insert_one", name).await else {
            return RepoOutcome::NotConnected;
        };

        match coll.insert_one(document).await {
            Ok(result) => {
                let id = id_to_string(&result.inserted_id);
                debug!("Inserted one document into '{}' with ID: {}", name, id);
                RepoOutcome::Ok(id)
            }
            Err(e) => RepoOutcome::failed("insert_one", e),
        }
    }

    async fn insert_many(&self, name: &str, documents: Vec<Document>) -> RepoOutcome<Vec<String>> {
        let Some(coll) = self.collection("insert_many", name).await else {
            return RepoOutcome::NotConnected;
        };
        if documents.is_empty() {
            return RepoOutcome::Ok(Vec::new());
        }

        match coll.insert_many(documents).await {
            Ok(result) => {
                let mut ids: Vec<(usize, Bson)> = result.inserted_ids.into_iter().collect();
                ids.sort_by_key(|(index, _)| *index);
                info!("Inserted {} documents into '{}'", ids.len(), name);
                RepoOutcome::Ok(ids.iter().map(|(_, id)| id_to_string(id)).collect())
            }
            Err(e) => RepoOutcome::failed("insert_many", e),
        }
    }

    async fn find_one(&self, name: &str, query: Document) -> RepoOutcome<Option<Document>> {
        let Some(coll) = self.collection("find_one", name).await else {
            return RepoOutcome::NotConnected;
        };

        debug!("find_one in '{}' with query {}", name, query);
        RepoOutcome::from_result("find_one", coll.find_one(query).await)
    }

    async fn find_many(&self, name: &str, query: Document) -> RepoOutcome<Vec<Document>> {
        let Some(coll) = self.collection("find_many", name).await else {
            return RepoOutcome::NotConnected;
        };

        let cursor = match coll.find(query).await {
            Ok(cursor) => cursor,
            Err(e) => return RepoOutcome::failed("find_many", e),
        };

        match cursor.try_collect::<Vec<Document>>().await {
            Ok(docs) => {
                debug!("find_many in '{}' returned {} documents", name, docs.len());
                RepoOutcome::Ok(docs)
            }
            Err(e) => RepoOutcome::failed("find_many", e),
        }
    }

    async fn update_one(&self, name: &str, query: Document, patch: Document) -> RepoOutcome<u64> {
        let Some(coll) = self.collection("update_one", name).await else {
            return RepoOutcome::NotConnected;
        };

        match coll.update_one(query, doc! { "$set": patch }).await {
            Ok(result) => {
                info!(
                    "Updated {} document(s) in '{}'",
                    result.modified_count, name
                );
                RepoOutcome::Ok(result.modified_count)
            }
            Err(e) => RepoOutcome::failed("update_one", e),
        }
    }

    async fn push_to_array(
        &self,
        name: &str,
        query: Document,
        field: &str,
        value: Bson,
    ) -> RepoOutcome<u64> {
        let Some(coll) = self.collection("push_to_array", name).await else {
            return RepoOutcome::NotConnected;
        };

        let update = doc! { "$push": { field: value } };
        match coll.update_one(query, update).upsert(true).await {
            Ok(result) => {
                let upserted = u64::from(result.upserted_id.is_some());
                RepoOutcome::Ok(result.modified_count + upserted)
            }
            Err(e) => RepoOutcome::failed("push_to_array", e),
        }
    }

    async fn delete_one(&self, name: &str, query: Document) -> RepoOutcome<u64> {
        let Some(coll) = self.collection("delete_one", name).await else {
            return RepoOutcome::NotConnected;
        };

        match coll.delete_one(query).await {
            Ok(result) => {
                info!(
                    "Deleted {} document(s) from '{}'",
                    result.deleted_count, name
                );
                RepoOutcome::Ok(result.deleted_count)
            }
            Err(e) => RepoOutcome::failed("delete_one", e),
        }
    }

    async fn drop_collection(&self, name: &str) -> RepoOutcome<()> {
        let Some(coll) = self.collection("drop_collection", name).await else {
            return RepoOutcome::NotConnected;
        };

        match coll.drop().await {
            Ok(()) => {
                info!("Collection '{}' dropped successfully", name);
                RepoOutcome::Ok(())
            }
            Err(e) => RepoOutcome::failed("drop_collection", e),
        }
    }

    async fn list_collections(&self) -> RepoOutcome<Vec<String>> {
        let Some(db) = self.db("list_collections").await else {
            return RepoOutcome::NotConnected;
        };

        match db.list_collection_names().await {
            Ok(names) => {
                debug!("Collections in '{}': {:?}", self.database, names);
                RepoOutcome::Ok(names)
            }
            Err(e) => RepoOutcome::failed("list_collections", e),
        }
    }

    async fn close(&self) -> Result<(), StorageError> {
        let client = self.handle.take().await.inspect_err(|e| {
            error!("Failed to close MongoDB connection: {}", e);
        })?;
        client.shutdown().await;
        info!("MongoDB connection closed");
        Ok(())
    }
}
