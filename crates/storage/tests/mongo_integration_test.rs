//! Integration tests for the MongoDB document repository

mod common;

use anyhow::Result;
use common::*;
use relgraph_storage::bson::{doc, Bson};
use relgraph_storage::{
    create_document_repository, DocumentRepository, MongoDocumentRepository, RepoOutcome,
    StorageError,
};

#[tokio::test]
#[ignore] // Requires MongoDB to be running
async fn test_document_crud_round() -> Result<()> {
    let repo = MongoDocumentRepository::connect(&test_storage_config()).await?;
    let collection = unique_collection();

    assert_eq!(repo.ensure_collection(&collection).await, RepoOutcome::Ok(true));
    assert_eq!(repo.ensure_collection(&collection).await, RepoOutcome::Ok(false));

    let id = repo
        .insert_one(&collection, doc! { "user_id": "u1", "age": 30 })
        .await
        .into_result("MongoDB")?;
    assert!(!id.is_empty());

    let ids = repo
        .insert_many(
            &collection,
            vec![doc! { "user_id": "u2" }, doc! { "user_id": "u3" }],
        )
        .await
        .into_result("MongoDB")?;
    assert_eq!(ids.len(), 2);

    let found = repo
        .find_one(&collection, doc! { "user_id": "u1" })
        .await
        .into_result("MongoDB")?;
    assert_eq!(found.and_then(|d| d.get_i32("age").ok()), Some(30));

    assert_eq!(
        repo.update_one(&collection, doc! { "user_id": "u1" }, doc! { "age": 31 })
            .await,
        RepoOutcome::Ok(1)
    );
    assert_eq!(
        repo.delete_one(&collection, doc! { "user_id": "u2" }).await,
        RepoOutcome::Ok(1)
    );
    assert_eq!(
        repo.find_many(&collection, doc! {})
            .await
            .unwrap_or_default()
            .len(),
        2
    );

    assert!(repo.drop_collection(&collection).await.is_ok());
    repo.close().await?;
    Ok(())
}

#[tokio::test]
#[ignore] // Requires MongoDB to be running
async fn test_push_to_array_upserts_one_document() -> Result<()> {
    let repo = create_document_repository(&test_storage_config()).await?;
    let collection = unique_collection();

    for (field, value) in [("friends", "u2"), ("events", "e5"), ("friends", "u3")] {
        let written = repo
            .push_to_array(&collection, doc! { "user_id": "u1" }, field, value.into())
            .await;
        assert_eq!(written, RepoOutcome::Ok(1));
    }

    let docs = repo
        .find_many(&collection, doc! { "user_id": "u1" })
        .await
        .into_result("MongoDB")?;
    assert_eq!(docs.len(), 1);
    assert_eq!(
        docs[0].get_array("friends")?,
        &vec![Bson::from("u2"), Bson::from("u3")]
    );

    assert!(repo.drop_collection(&collection).await.is_ok());
    repo.close().await?;
    Ok(())
}

#[tokio::test]
#[ignore] // Requires MongoDB to be running
async fn test_operations_after_close() -> Result<()> {
    let repo = MongoDocumentRepository::connect(&test_storage_config()).await?;

    repo.close().await?;
    assert_eq!(
        repo.close().await,
        Err(StorageError::AlreadyClosed("MongoDB"))
    );
    assert!(repo.list_collections().await.is_not_connected());
    Ok(())
}

#[tokio::test]
async fn test_connect_rejects_malformed_uri() {
    let mut config = test_storage_config();
    config.mongo_uri = "not-a-mongo-uri".to_string();

    let result = MongoDocumentRepository::connect(&config).await;
    assert!(matches!(result, Err(StorageError::ConnectionFailed(_))));
}
