//! Graph-model repository

mod bolt;
pub(crate) mod cypher;
pub(crate) mod neo4j;

pub use neo4j::Neo4jGraphRepository;

use crate::error::StorageError;
use crate::outcome::RepoOutcome;
use async_trait::async_trait;
use relgraph_core::{NodeLabel, RelationshipType};
use serde::{Deserialize, Serialize};

/// Property map of a node or relationship
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// One result row, keyed by column name
pub type Row = serde_json::Map<String, serde_json::Value>;

/// A node read back from the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub label: NodeLabel,
    pub properties: Properties,
}

/// Build a property map holding just `id`
pub fn id_properties(id: &str) -> Properties {
    let mut props = Properties::new();
    props.insert("id".to_string(), id.into());
    props
}

/// Validate a user-supplied label against the closed vocabulary
pub fn parse_label(label: &str) -> Result<NodeLabel, StorageError> {
    label
        .parse::<NodeLabel>()
        .map_err(|_| StorageError::InvalidLabel(label.to_string()))
}

/// Label/property-scoped node and relationship CRUD over a graph store
///
/// Labels and relationship types are typed, so only their fixed spellings
/// ever reach query text; every property value is a bound parameter.
#[async_trait]
pub trait GraphRepository: Send + Sync {
    /// Run arbitrary Cypher with bound parameters
    async fn execute_query(&self, cypher: &str, params: &Properties) -> RepoOutcome<Vec<Row>>;

    /// Write a node with `label` and `properties`
    async fn create_node(&self, label: NodeLabel, properties: &Properties) -> RepoOutcome<bool>;

    /// Connect every `from_label` node matching `from_key` to every `to_label`
    /// node matching `to_key`
    ///
    /// # Returns
    /// * `Ok(true)` if at least one relationship was written
    async fn create_relationship(
        &self,
        from_label: NodeLabel,
        from_key: &Properties,
        to_label: NodeLabel,
        to_key: &Properties,
        rel_type: RelationshipType,
        rel_props: Option<&Properties>,
    ) -> RepoOutcome<bool>;

    /// Nodes under `label` whose properties equal every entry of `filters`
    async fn find_nodes(
        &self,
        label: NodeLabel,
        filters: Option<&Properties>,
    ) -> RepoOutcome<Vec<GraphNode>>;

    /// Merge `update_props` into every match and return the match count
    async fn update_node(
        &self,
        label: NodeLabel,
        match_props: &Properties,
        update_props: &Properties,
    ) -> RepoOutcome<u64>;

    /// Detach-delete every match and return the deleted count
    async fn delete_node(&self, label: NodeLabel, match_props: &Properties) -> RepoOutcome<u64>;

    async fn verify_connection(&self) -> RepoOutcome<bool>;

    /// Release the driver
    ///
    /// # Errors
    /// * `StorageError::AlreadyClosed` on every call after the first successful one
    /// * `StorageError::NotConnected` if no connection was ever established
    async fn close(&self) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label("Group"), Ok(NodeLabel::Group));
        assert_eq!(
            parse_label("User)-[:X]->(m"),
            Err(StorageError::InvalidLabel("User)-[:X]->(m".to_string()))
        );
    }

    #[test]
    fn test_id_properties() {
        let props = id_properties("u1");
        assert_eq!(props.len(), 1);
        assert_eq!(props["id"], "u1");
    }
}
