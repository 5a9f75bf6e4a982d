//! Integration tests for the Neo4j graph repository

mod common;

use anyhow::Result;
use common::*;
use relgraph_core::{NodeLabel, NodeWritePolicy, RelationshipType};
use relgraph_storage::{
    create_graph_repository, GraphRepository, Neo4jGraphRepository, Properties, RepoOutcome,
    StorageError,
};

#[tokio::test]
#[ignore] // Requires Neo4j to be running
async fn test_node_and_relationship_lifecycle() -> Result<()> {
    let repo = Neo4jGraphRepository::connect(&test_storage_config(), NodeWritePolicy::Create)
        .await?;
    let user = unique_node("user");
    let group = unique_node("group");

    assert_eq!(
        repo.create_node(NodeLabel::User, &user).await,
        RepoOutcome::Ok(true)
    );
    assert_eq!(
        repo.create_node(NodeLabel::Group, &group).await,
        RepoOutcome::Ok(true)
    );
    assert_eq!(
        repo.create_relationship(
            NodeLabel::User,
            &user,
            NodeLabel::Group,
            &group,
            RelationshipType::MemberOf,
            None,
        )
        .await,
        RepoOutcome::Ok(true)
    );

    let found = repo
        .find_nodes(NodeLabel::User, Some(&user))
        .await
        .into_result("Neo4j")?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].properties.get("id"), user.get("id"));

    let mut update = Properties::new();
    update.insert("name".to_string(), "Ada".into());
    assert_eq!(
        repo.update_node(NodeLabel::User, &user, &update).await,
        RepoOutcome::Ok(1)
    );

    assert_eq!(
        repo.delete_node(NodeLabel::User, &user).await,
        RepoOutcome::Ok(1)
    );
    assert_eq!(
        repo.delete_node(NodeLabel::Group, &group).await,
        RepoOutcome::Ok(1)
    );

    repo.close().await?;
    Ok(())
}

#[tokio::test]
#[ignore] // Requires Neo4j to be running
async fn test_merge_policy_is_idempotent() -> Result<()> {
    let repo = create_graph_repository(&test_storage_config(), NodeWritePolicy::Merge).await?;
    let a = unique_node("user");
    let b = unique_node("user");

    for _ in 0..2 {
        assert!(repo.create_node(NodeLabel::User, &a).await.is_ok());
        assert!(repo.create_node(NodeLabel::User, &b).await.is_ok());
        assert!(repo
            .create_relationship(
                NodeLabel::User,
                &a,
                NodeLabel::User,
                &b,
                RelationshipType::FriendWith,
                None,
            )
            .await
            .is_ok());
    }

    let nodes = repo
        .find_nodes(NodeLabel::User, Some(&a))
        .await
        .into_result("Neo4j")?;
    assert_eq!(nodes.len(), 1);

    let mut params = Properties::new();
    params.insert("a".to_string(), a["id"].clone());
    let rows = repo
        .execute_query(
            "MATCH (:User {id: $a})-[r:FRIEND_WITH]->(:User) RETURN count(r) AS count",
            &params,
        )
        .await
        .into_result("Neo4j")?;
    assert_eq!(rows[0]["count"], 1);

    let _ = repo.delete_node(NodeLabel::User, &a).await;
    let _ = repo.delete_node(NodeLabel::User, &b).await;
    repo.close().await?;
    Ok(())
}

#[tokio::test]
#[ignore] // Requires Neo4j to be running
async fn test_relationship_without_endpoints_writes_nothing() -> Result<()> {
    let repo = Neo4jGraphRepository::connect(&test_storage_config(), NodeWritePolicy::Create)
        .await?;

    let created = repo
        .create_relationship(
            NodeLabel::User,
            &unique_node("ghost"),
            NodeLabel::Event,
            &unique_node("ghost"),
            RelationshipType::Attended,
            None,
        )
        .await;
    assert_eq!(created, RepoOutcome::Ok(false));

    repo.close().await?;
    Ok(())
}

#[tokio::test]
#[ignore] // Requires Neo4j to be running
async fn test_double_close() -> Result<()> {
    let repo = Neo4jGraphRepository::connect(&test_storage_config(), NodeWritePolicy::Create)
        .await?;

    repo.close().await?;
    assert_eq!(repo.close().await, Err(StorageError::AlreadyClosed("Neo4j")));
    assert!(repo.verify_connection().await.is_not_connected());
    Ok(())
}
