use super::bolt::properties_to_bolt;
use super::{cypher, GraphNode, GraphRepository, Properties, Row};
use crate::error::StorageError;
use crate::handle::ConnectionHandle;
use crate::outcome::RepoOutcome;
use anyhow::{Context, Result};
use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};
use relgraph_core::{NodeLabel, NodeWritePolicy, RelationshipType, StorageConfig};
use std::sync::Arc;
use tracing::{debug, error, info};

const BACKEND: &str = "Neo4j";

/// Neo4j-backed [`GraphRepository`]
///
/// The shared [`Graph`] driver hands each call its own pooled session.
pub struct Neo4jGraphRepository {
    handle: ConnectionHandle<Arc<Graph>>,
    policy: NodeWritePolicy,
}

impl Neo4jGraphRepository {
    /// Connect to Neo4j and verify the server answers
    ///
    /// # Errors
    /// * `StorageError::InvalidConfig` if the driver rejects the settings
    /// * `StorageError::ConnectionFailed` if the server is unreachable or rejects the credentials
    pub async fn connect(
        config: &StorageConfig,
        policy: NodeWritePolicy,
    ) -> std::result::Result<Self, StorageError> {
        info!("Connecting to Neo4j at {}", config.neo4j_uri);

        let driver_config = ConfigBuilder::default()
            .uri(config.neo4j_uri.as_str())
            .user(config.neo4j_user.as_str())
            .password(config.neo4j_password.as_str())
            .db(config.neo4j_database.as_str())
            .max_connections(config.neo4j_max_connections)
            .build()
            .map_err(|e| StorageError::InvalidConfig(format!("Neo4j: {e}")))?;

        let graph = Graph::connect(driver_config)
            .await
            .map_err(|e| StorageError::ConnectionFailed(format!("Neo4j: {e}")))?;

        let repo = Self::from_graph(graph, policy);
        match repo.verify_connection().await {
            RepoOutcome::Ok(true) => {}
            RepoOutcome::Ok(false) => {
                return Err(StorageError::ConnectionFailed(
                    "Neo4j: verification query returned no rows".to_string(),
                ))
            }
            RepoOutcome::NotConnected => return Err(StorageError::NotConnected(BACKEND)),
            RepoOutcome::OperationFailed(reason) => {
                return Err(StorageError::ConnectionFailed(reason))
            }
        }

        info!(
            "Neo4j repository initialized for database '{}'",
            config.neo4j_database
        );
        Ok(repo)
    }

    /// Wrap an existing driver without verifying it
    pub fn from_graph(graph: Graph, policy: NodeWritePolicy) -> Self {
        Self {
            handle: ConnectionHandle::connected(BACKEND, Arc::new(graph)),
            policy,
        }
    }

    /// A repository with no connection; every operation answers `NotConnected`
    pub fn detached(policy: NodeWritePolicy) -> Self {
        Self {
            handle: ConnectionHandle::detached(BACKEND),
            policy,
        }
    }

    pub fn policy(&self) -> NodeWritePolicy {
        self.policy
    }

    async fn graph(&self, operation: &str) -> Option<Arc<Graph>> {
        let graph = self.handle.get().await;
        if graph.is_none() {
            error!(operation, "Neo4j driver is not initialized");
        }
        graph
    }

    /// Run a query that ends in `RETURN count(..) AS count`
    async fn run_count(graph: &Graph, query: Query) -> Result<u64> {
        let mut result = graph.execute(query).await?;
        let count = match result.next().await? {
            Some(row) => row.get::<i64>("count")?,
            None => 0,
        };
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn run_rows(graph: &Graph, query: Query) -> Result<Vec<Row>> {
        let mut result = graph.execute(query).await?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row.to::<Row>().context("Failed to decode row")?);
        }
        Ok(rows)
    }

    async fn run_nodes(graph: &Graph, label: NodeLabel, query: Query) -> Result<Vec<GraphNode>> {
        let mut result = graph.execute(query).await?;
        let mut nodes = Vec::new();
        while let Some(row) = result.next().await? {
            let properties: Properties = row
                .get("props")
                .context("Failed to decode node properties")?;
            nodes.push(GraphNode { label, properties });
        }
        Ok(nodes)
    }
}

#[async_trait]
impl GraphRepository for Neo4jGraphRepository {
    async fn execute_query(&self, cypher: &str, params: &Properties) -> RepoOutcome<Vec<Row>> {
        let Some(graph) = self.graph("execute_query").await else {
            return RepoOutcome::NotConnected;
        };

        let mut query = Query::new(cypher.to_string());
        for (key, value) in params {
            query = query.param(key.as_str(), super::bolt::to_bolt(value));
        }

        let outcome = RepoOutcome::from_result("execute_query", Self::run_rows(&graph, query).await);
        if let RepoOutcome::Ok(rows) = &outcome {
            debug!("Executed query: {} returned {} rows", cypher, rows.len());
        }
        outcome
    }

    async fn create_node(&self, label: NodeLabel, properties: &Properties) -> RepoOutcome<bool> {
        let Some(graph) = self.graph("create_node").await else {
            return RepoOutcome::NotConnected;
        };
        if self.policy == NodeWritePolicy::Merge && !properties.contains_key("id") {
            return RepoOutcome::failed("create_node", "merge policy requires an 'id' property");
        }

        let query = Query::new(cypher::create_node(label, self.policy))
            .param("props", properties_to_bolt(properties));

        let outcome = RepoOutcome::from_result("create_node", Self::run_count(&graph, query).await)
            .map(|count| count > 0);
        if outcome.is_ok() {
            debug!("Node with label '{}' written", label);
        }
        outcome
    }

    async fn create_relationship(
        &self,
        from_label: NodeLabel,
        from_key: &Properties,
        to_label: NodeLabel,
        to_key: &Properties,
        rel_type: RelationshipType,
        rel_props: Option<&Properties>,
    ) -> RepoOutcome<bool> {
        let Some(graph) = self.graph("create_relationship").await else {
            return RepoOutcome::NotConnected;
        };

        let empty = Properties::new();
        let query = Query::new(cypher::create_relationship(
            from_label,
            to_label,
            rel_type,
            self.policy,
        ))
        .param("from_key", properties_to_bolt(from_key))
        .param("to_key", properties_to_bolt(to_key))
        .param("rel_props", properties_to_bolt(rel_props.unwrap_or(&empty)));

        let outcome = RepoOutcome::from_result(
            "create_relationship",
            Self::run_count(&graph, query).await,
        )
        .map(|count| count > 0);
        if let RepoOutcome::Ok(created) = &outcome {
            debug!(
                "Relationship '{}' between {} and {} written: {}",
                rel_type, from_label, to_label, created
            );
        }
        outcome
    }

    async fn find_nodes(
        &self,
        label: NodeLabel,
        filters: Option<&Properties>,
    ) -> RepoOutcome<Vec<GraphNode>> {
        let Some(graph) = self.graph("find_nodes").await else {
            return RepoOutcome::NotConnected;
        };

        let empty = Properties::new();
        let query = Query::new(cypher::find_nodes(label))
            .param("filters", properties_to_bolt(filters.unwrap_or(&empty)));

        let outcome = RepoOutcome::from_result(
            "find_nodes",
            Self::run_nodes(&graph, label, query).await,
        );
        if let RepoOutcome::Ok(nodes) = &outcome {
            debug!("Found {} nodes with label '{}'", nodes.len(), label);
        }
        outcome
    }

    async fn update_node(
        &self,
        label: NodeLabel,
        match_props: &Properties,
        update_props: &Properties,
    ) -> RepoOutcome<u64> {
        let Some(graph) = self.graph("update_node").await else {
            return RepoOutcome::NotConnected;
        };

        let query = Query::new(cypher::update_node(label))
            .param("match_props", properties_to_bolt(match_props))
            .param("update_props", properties_to_bolt(update_props));

        let outcome = RepoOutcome::from_result("update_node", Self::run_count(&graph, query).await);
        if let RepoOutcome::Ok(count) = &outcome {
            info!("Updated {} node(s) with label '{}'", count, label);
        }
        outcome
    }

    async fn delete_node(&self, label: NodeLabel, match_props: &Properties) -> RepoOutcome<u64> {
        let Some(graph) = self.graph("delete_node").await else {
            return RepoOutcome::NotConnected;
        };

        let query = Query::new(cypher::delete_node(label))
            .param("match_props", properties_to_bolt(match_props));

        let outcome = RepoOutcome::from_result("delete_node", Self::run_count(&graph, query).await);
        if let RepoOutcome::Ok(count) = &outcome {
            info!("Deleted {} node(s) with label '{}'", count, label);
        }
        outcome
    }

    async fn verify_connection(&self) -> RepoOutcome<bool> {
        let Some(graph) = self.graph("verify_connection").await else {
            return RepoOutcome::NotConnected;
        };

        let query = Query::new(cypher::VERIFY.to_string());
        let outcome =
            RepoOutcome::from_result("verify_connection", Self::run_rows(&graph, query).await)
                .map(|rows| !rows.is_empty());
        info!("Neo4j connectivity verified: {}", connectivity_verified(&outcome));
        outcome
    }

    async fn close(&self) -> std::result::Result<(), StorageError> {
        let graph = self.handle.take().await.inspect_err(|e| {
            error!("Failed to close Neo4j driver: {}", e);
        })?;
        drop(graph);
        info!("Neo4j driver closed successfully");
        Ok(())
    }
}

/// Only a query that ran and returned a row counts as verified
fn connectivity_verified(outcome: &RepoOutcome<bool>) -> bool {
    matches!(outcome, RepoOutcome::Ok(true))
}
