//! In-memory repositories for tests
//!
//! Both mocks honor the same connection lifecycle as the real backends and
//! can be told to reject writes touching a given value.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use crate::document::DocumentRepository;
use crate::error::StorageError;
use crate::graph::{GraphNode, GraphRepository, Properties, Row};
use crate::handle::ConnectionHandle;
use crate::outcome::RepoOutcome;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use relgraph_core::{NodeLabel, NodeWritePolicy, RelationshipType};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

const MOCK_DOCUMENT: &str = "mock document store";
const MOCK_GRAPH: &str = "mock graph store";

fn not_connected<T>() -> RepoOutcome<T> {
    RepoOutcome::NotConnected
}

// ==== Document store ====

#[derive(Debug, Default)]
struct DocumentData {
    collections: BTreeMap<String, Vec<Document>>,
    fail_on: Vec<(String, Bson)>,
}

impl DocumentData {
    fn should_fail(&self, docs: &[&Document]) -> bool {
        self.fail_on.iter().any(|(field, value)| {
            docs.iter()
                .any(|doc| doc.get(field).is_some_and(|v| v == value))
        })
    }
}

fn matches_query(doc: &Document, query: &Document) -> bool {
    query.iter().all(|(key, value)| doc.get(key) == Some(value))
}

fn ensure_id(doc: &mut Document) -> String {
    match doc.get("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => {
            let oid = ObjectId::new();
            doc.insert("_id", oid);
            oid.to_hex()
        }
    }
}

/// In-memory [`DocumentRepository`] with equality-only queries
#[derive(Clone)]
pub struct MockDocumentRepository {
    handle: Arc<ConnectionHandle<()>>,
    data: Arc<Mutex<DocumentData>>,
}

impl MockDocumentRepository {
    pub fn new() -> Self {
        Self {
            handle: Arc::new(ConnectionHandle::connected(MOCK_DOCUMENT, ())),
            data: Arc::new(Mutex::new(DocumentData::default())),
        }
    }

    /// A repository that never connected
    pub fn detached() -> Self {
        Self {
            handle: Arc::new(ConnectionHandle::detached(MOCK_DOCUMENT)),
            data: Arc::new(Mutex::new(DocumentData::default())),
        }
    }

    /// Reject every write whose query or document has `field == value`
    pub fn fail_when(&self, field: &str, value: impl Into<Bson>) {
        self.data
            .lock()
            .unwrap()
            .fail_on
            .push((field.to_string(), value.into()));
    }

    /// Snapshot of a collection in insertion order
    pub fn documents(&self, name: &str) -> Vec<Document> {
        self.data
            .lock()
            .unwrap()
            .collections
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    async fn connected(&self) -> bool {
        self.handle.is_connected().await
    }
}

impl Default for MockDocumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentRepository for MockDocumentRepository {
    async fn ensure_collection(&self, name: &str) -> RepoOutcome<bool> {
        if !self.connected().await {
            return not_connected();
        }
        let mut data = self.data.lock().unwrap();
        if data.collections.contains_key(name) {
            return RepoOutcome::Ok(false);
        }
        data.collections.insert(name.to_string(), Vec::new());
        RepoOutcome::Ok(true)
    }

    async fn insert_one(&self, name: &str, mut document: Document) -> RepoOutcome<String> {
        if !self.connected().await {
            return not_connected();
        }
        let mut data = self.data.lock().unwrap();
        if data.should_fail(&[&document]) {
            return RepoOutcome::failed("insert_one", "injected failure");
        }
        let id = ensure_id(&mut document);
        data.collections
            .entry(name.to_string())
            .or_default()
            .push(document);
        RepoOutcome::Ok(id)
    }

    async fn insert_many(&self, name: &str, documents: Vec<Document>) -> RepoOutcome<Vec<String>> {
        if !self.connected().await {
            return not_connected();
        }
        let mut data = self.data.lock().unwrap();
        if data.should_fail(&documents.iter().collect::<Vec<_>>()) {
            return RepoOutcome::failed("insert_many", "injected failure");
        }
        let collection = data.collections.entry(name.to_string()).or_default();
        let mut ids = Vec::with_capacity(documents.len());
        for mut document in documents {
            ids.push(ensure_id(&mut document));
            collection.push(document);
        }
        RepoOutcome::Ok(ids)
    }

    async fn find_one(&self, name: &str, query: Document) -> RepoOutcome<Option<Document>> {
        if !self.connected().await {
            return not_connected();
        }
        let data = self.data.lock().unwrap();
        RepoOutcome::Ok(
            data.collections
                .get(name)
                .and_then(|docs| docs.iter().find(|d| matches_query(d, &query)).cloned()),
        )
    }

    async fn find_many(&self, name: &str, query: Document) -> RepoOutcome<Vec<Document>> {
        if !self.connected().await {
            return not_connected();
        }
        let data = self.data.lock().unwrap();
        RepoOutcome::Ok(
            data.collections
                .get(name)
                .map(|docs| {
                    docs.iter()
                        .filter(|d| matches_query(d, &query))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
        )
    }

    async fn update_one(&self, name: &str, query: Document, patch: Document) -> RepoOutcome<u64> {
        if !self.connected().await {
            return not_connected();
        }
        let mut data = self.data.lock().unwrap();
        if data.should_fail(&[&query, &patch]) {
            return RepoOutcome::failed("update_one", "injected failure");
        }
        let Some(doc) = data
            .collections
            .get_mut(name)
            .and_then(|docs| docs.iter_mut().find(|d| matches_query(d, &query)))
        else {
            return RepoOutcome::Ok(0);
        };

        let mut modified = false;
        for (key, value) in patch {
            if doc.get(&key) != Some(&value) {
                doc.insert(key, value);
                modified = true;
            }
        }
        RepoOutcome::Ok(u64::from(modified))
    }

    async fn push_to_array(
        &self,
        name: &str,
        query: Document,
        field: &str,
        value: Bson,
    ) -> RepoOutcome<u64> {
        if !self.connected().await {
            return not_connected();
        }
        let mut data = self.data.lock().unwrap();
        if data.should_fail(&[&query]) {
            return RepoOutcome::failed("push_to_array", "injected failure");
        }
        let collection = data.collections.entry(name.to_string()).or_default();

        if let Some(doc) = collection.iter_mut().find(|d| matches_query(d, &query)) {
            return match doc.get_mut(field) {
                Some(Bson::Array(items)) => {
                    items.push(value);
                    RepoOutcome::Ok(1)
                }
                Some(_) => RepoOutcome::failed(
                    "push_to_array",
                    format!("field '{field}' is not an array"),
                ),
                None => {
                    doc.insert(field, vec![value]);
                    RepoOutcome::Ok(1)
                }
            };
        }

        let mut upserted = query;
        upserted.insert(field, vec![value]);
        ensure_id(&mut upserted);
        collection.push(upserted);
        RepoOutcome::Ok(1)
    }

    async fn delete_one(&self, name: &str, query: Document) -> RepoOutcome<u64> {
        if !self.connected().await {
            return not_connected();
        }
        let mut data = self.data.lock().unwrap();
        if data.should_fail(&[&query]) {
            return RepoOutcome::failed("delete_one", "injected failure");
        }
        let Some(docs) = data.collections.get_mut(name) else {
            return RepoOutcome::Ok(0);
        };
        match docs.iter().position(|d| matches_query(d, &query)) {
            Some(index) => {
                docs.remove(index);
                RepoOutcome::Ok(1)
            }
            None => RepoOutcome::Ok(0),
        }
    }

    async fn drop_collection(&self, name: &str) -> RepoOutcome<()> {
        if !self.connected().await {
            return not_connected();
        }
        self.data.lock().unwrap().collections.remove(name);
        RepoOutcome::Ok(())
    }

    async fn list_collections(&self) -> RepoOutcome<Vec<String>> {
        if !self.connected().await {
            return not_connected();
        }
        let data = self.data.lock().unwrap();
        RepoOutcome::Ok(data.collections.keys().cloned().collect())
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.handle.take().await
    }
}

// ==== Graph store ====

#[derive(Debug, Clone)]
struct StoredNode {
    internal_id: u64,
    label: NodeLabel,
    properties: Properties,
}

#[derive(Debug, Clone)]
struct StoredRelationship {
    from: u64,
    to: u64,
    rel_type: RelationshipType,
    properties: Properties,
}

/// A relationship as seen from the outside, keyed by the endpoints' `id`
#[derive(Debug, Clone, PartialEq)]
pub struct MockRelationship {
    pub from_label: NodeLabel,
    pub from_id: Option<Value>,
    pub to_label: NodeLabel,
    pub to_id: Option<Value>,
    pub rel_type: RelationshipType,
    pub properties: Properties,
}

#[derive(Debug, Default)]
struct GraphData {
    nodes: Vec<StoredNode>,
    next_id: u64,
    relationships: Vec<StoredRelationship>,
    queries: Vec<String>,
    fail_on: Vec<(String, Value)>,
}

fn matches_props(node: &StoredNode, label: NodeLabel, filters: &Properties) -> bool {
    node.label == label
        && filters
            .iter()
            .all(|(key, value)| node.properties.get(key) == Some(value))
}

impl GraphData {
    fn should_fail(&self, props: &[&Properties]) -> bool {
        self.fail_on.iter().any(|(key, value)| {
            props
                .iter()
                .any(|p| p.get(key).is_some_and(|v| v == value))
        })
    }

    fn matching_ids(&self, label: NodeLabel, filters: &Properties) -> Vec<u64> {
        self.nodes
            .iter()
            .filter(|n| matches_props(n, label, filters))
            .map(|n| n.internal_id)
            .collect()
    }

    fn node(&self, internal_id: u64) -> Option<&StoredNode> {
        self.nodes.iter().find(|n| n.internal_id == internal_id)
    }

    fn push_node(&mut self, label: NodeLabel, properties: Properties) {
        self.next_id += 1;
        self.nodes.push(StoredNode {
            internal_id: self.next_id,
            label,
            properties,
        });
    }
}

/// In-memory [`GraphRepository`]
///
/// `execute_query` only records the query text and answers no rows.
#[derive(Clone)]
pub struct MockGraphRepository {
    handle: Arc<ConnectionHandle<()>>,
    policy: NodeWritePolicy,
    data: Arc<Mutex<GraphData>>,
}

impl MockGraphRepository {
    pub fn new(policy: NodeWritePolicy) -> Self {
        Self {
            handle: Arc::new(ConnectionHandle::connected(MOCK_GRAPH, ())),
            policy,
            data: Arc::new(Mutex::new(GraphData::default())),
        }
    }

    pub fn detached(policy: NodeWritePolicy) -> Self {
        Self {
            handle: Arc::new(ConnectionHandle::detached(MOCK_GRAPH)),
            policy,
            data: Arc::new(Mutex::new(GraphData::default())),
        }
    }

    /// Reject every write whose properties contain `key == value`
    pub fn fail_when(&self, key: &str, value: impl Into<Value>) {
        self.data
            .lock()
            .unwrap()
            .fail_on
            .push((key.to_string(), value.into()));
    }

    pub fn node_count(&self) -> usize {
        self.data.lock().unwrap().nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.data.lock().unwrap().relationships.len()
    }

    pub fn relationships(&self) -> Vec<MockRelationship> {
        let data = self.data.lock().unwrap();
        data.relationships
            .iter()
            .filter_map(|rel| {
                let from = data.node(rel.from)?;
                let to = data.node(rel.to)?;
                Some(MockRelationship {
                    from_label: from.label,
                    from_id: from.properties.get("id").cloned(),
                    to_label: to.label,
                    to_id: to.properties.get("id").cloned(),
                    rel_type: rel.rel_type,
                    properties: rel.properties.clone(),
                })
            })
            .collect()
    }

    /// Query text passed to `execute_query`, in call order
    pub fn executed_queries(&self) -> Vec<String> {
        self.data.lock().unwrap().queries.clone()
    }

    async fn connected(&self) -> bool {
        self.handle.is_connected().await
    }
}

#[async_trait]
impl GraphRepository for MockGraphRepository {
    async fn execute_query(&self, cypher: &str, _params: &Properties) -> RepoOutcome<Vec<Row>> {
        if !self.connected().await {
            return not_connected();
        }
        self.data.lock().unwrap().queries.push(cypher.to_string());
        RepoOutcome::Ok(Vec::new())
    }

    async fn create_node(&self, label: NodeLabel, properties: &Properties) -> RepoOutcome<bool> {
        if !self.connected().await {
            return not_connected();
        }
        let mut data = self.data.lock().unwrap();
        if data.should_fail(&[properties]) {
            return RepoOutcome::failed("create_node", "injected failure");
        }

        match self.policy {
            NodeWritePolicy::Create => data.push_node(label, properties.clone()),
            NodeWritePolicy::Merge => {
                let Some(id) = properties.get("id") else {
                    return RepoOutcome::failed(
                        "create_node",
                        "merge policy requires an 'id' property",
                    );
                };
                let existing = data
                    .nodes
                    .iter()
                    .position(|n| n.label == label && n.properties.get("id") == Some(id));
                match existing {
                    Some(index) => data.nodes[index].properties.extend(properties.clone()),
                    None => data.push_node(label, properties.clone()),
                }
            }
        }
        RepoOutcome::Ok(true)
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
        if !self.connected().await {
            return not_connected();
        }
        let mut data = self.data.lock().unwrap();
        if data.should_fail(&[from_key, to_key]) {
            return RepoOutcome::failed("create_relationship", "injected failure");
        }

        let properties = rel_props.cloned().unwrap_or_default();
        let sources = data.matching_ids(from_label, from_key);
        let targets = data.matching_ids(to_label, to_key);
        let mut written = 0;

        for &from in &sources {
            for &to in &targets {
                let existing = data
                    .relationships
                    .iter()
                    .position(|r| r.from == from && r.to == to && r.rel_type == rel_type);
                match (self.policy, existing) {
                    (NodeWritePolicy::Merge, Some(index)) => {
                        data.relationships[index].properties.extend(properties.clone())
                    }
                    _ => data.relationships.push(StoredRelationship {
                        from,
                        to,
                        rel_type,
                        properties: properties.clone(),
                    }),
                }
                written += 1;
            }
        }
        RepoOutcome::Ok(written > 0)
    }

    async fn find_nodes(
        &self,
        label: NodeLabel,
        filters: Option<&Properties>,
    ) -> RepoOutcome<Vec<GraphNode>> {
        if !self.connected().await {
            return not_connected();
        }
        let empty = Properties::new();
        let filters = filters.unwrap_or(&empty);
        let data = self.data.lock().unwrap();
        RepoOutcome::Ok(
            data.nodes
                .iter()
                .filter(|n| matches_props(n, label, filters))
                .map(|n| GraphNode {
                    label: n.label,
                    properties: n.properties.clone(),
                })
                .collect(),
        )
    }

    async fn update_node(
        &self,
        label: NodeLabel,
        match_props: &Properties,
        update_props: &Properties,
    ) -> RepoOutcome<u64> {
        if !self.connected().await {
            return not_connected();
        }
        let mut data = self.data.lock().unwrap();
        if data.should_fail(&[match_props, update_props]) {
            return RepoOutcome::failed("update_node", "injected failure");
        }
        let mut count = 0;
        for node in data
            .nodes
            .iter_mut()
            .filter(|n| matches_props(n, label, match_props))
        {
            node.properties.extend(update_props.clone());
            count += 1;
        }
        RepoOutcome::Ok(count)
    }

    async fn delete_node(&self, label: NodeLabel, match_props: &Properties) -> RepoOutcome<u64> {
        if !self.connected().await {
            return not_connected();
        }
        let mut data = self.data.lock().unwrap();
        if data.should_fail(&[match_props]) {
            return RepoOutcome::failed("delete_node", "injected failure");
        }
        let doomed = data.matching_ids(label, match_props);
        data.nodes.retain(|n| !doomed.contains(&n.internal_id));
        data.relationships
            .retain(|r| !doomed.contains(&r.from) && !doomed.contains(&r.to));
        RepoOutcome::Ok(doomed.len() as u64)
    }

    async fn verify_connection(&self) -> RepoOutcome<bool> {
        if !self.connected().await {
            return not_connected();
        }
        RepoOutcome::Ok(true)
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.handle.take().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::id_properties;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_push_to_array_upserts_then_appends() {
        let repo = MockDocumentRepository::new();

        let first = repo
            .push_to_array("users", doc! { "user_id": "u1" }, "friends", "u2".into())
            .await;
        let second = repo
            .push_to_array("users", doc! { "user_id": "u1" }, "events", "e5".into())
            .await;
        assert_eq!(first, RepoOutcome::Ok(1));
        assert_eq!(second, RepoOutcome::Ok(1));

        let docs = repo.documents("users");
        assert_eq!(docs.len(), 1);
        assert_eq!(
            docs[0].get_array("friends").unwrap(),
            &vec![Bson::String("u2".to_string())]
        );
        assert_eq!(
            docs[0].get_array("events").unwrap(),
            &vec![Bson::String("e5".to_string())]
        );
    }

    #[tokio::test]
    async fn test_document_queries_and_failures() {
        let repo = MockDocumentRepository::new();
        repo.fail_when("user_id", "bad");

        assert!(repo.insert_one("users", doc! { "user_id": "u1" }).await.is_ok());
        assert!(matches!(
            repo.insert_one("users", doc! { "user_id": "bad" }).await,
            RepoOutcome::OperationFailed(_)
        ));

        let found = repo
            .find_one("users", doc! { "user_id": "u1" })
            .await
            .unwrap_or_default();
        assert!(found.is_some());
        assert_eq!(
            repo.update_one("users", doc! { "user_id": "u1" }, doc! { "age": 30 })
                .await,
            RepoOutcome::Ok(1)
        );
        assert_eq!(
            repo.delete_one("users", doc! { "user_id": "u1" }).await,
            RepoOutcome::Ok(1)
        );
        assert_eq!(
            repo.delete_one("users", doc! { "user_id": "u1" }).await,
            RepoOutcome::Ok(0)
        );
    }

    #[tokio::test]
    async fn test_close_lifecycle() {
        let repo = MockDocumentRepository::new();
        assert_eq!(repo.close().await, Ok(()));
        assert!(repo.list_collections().await.is_not_connected());
        assert_eq!(
            repo.close().await,
            Err(StorageError::AlreadyClosed(MOCK_DOCUMENT))
        );

        let graph = MockGraphRepository::detached(NodeWritePolicy::Create);
        assert!(graph.verify_connection().await.is_not_connected());
        assert_eq!(
            graph.close().await,
            Err(StorageError::NotConnected(MOCK_GRAPH))
        );
    }

    #[tokio::test]
    async fn test_graph_merge_policy_deduplicates() {
        let repo = MockGraphRepository::new(NodeWritePolicy::Merge);
        for _ in 0..2 {
            assert!(repo.create_node(NodeLabel::User, &id_properties("u1")).await.is_ok());
            assert!(repo.create_node(NodeLabel::User, &id_properties("u2")).await.is_ok());
            let created = repo
                .create_relationship(
                    NodeLabel::User,
                    &id_properties("u1"),
                    NodeLabel::User,
                    &id_properties("u2"),
                    RelationshipType::FriendWith,
                    None,
                )
                .await;
            assert_eq!(created, RepoOutcome::Ok(true));
        }
        assert_eq!(repo.node_count(), 2);
        assert_eq!(repo.relationship_count(), 1);
    }

    #[tokio::test]
    async fn test_graph_delete_detaches_relationships() {
        let repo = MockGraphRepository::new(NodeWritePolicy::Create);
        let _ = repo.create_node(NodeLabel::User, &id_properties("u1")).await;
        let _ = repo.create_node(NodeLabel::Group, &id_properties("g1")).await;
        let _ = repo
            .create_relationship(
                NodeLabel::User,
                &id_properties("u1"),
                NodeLabel::Group,
                &id_properties("g1"),
                RelationshipType::MemberOf,
                None,
            )
            .await;

        let rels = repo.relationships();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].to_id, Some(Value::from("g1")));

        assert_eq!(
            repo.delete_node(NodeLabel::Group, &id_properties("g1")).await,
            RepoOutcome::Ok(1)
        );
        assert_eq!(repo.relationship_count(), 0);
        assert_eq!(
            repo.find_nodes(NodeLabel::User, None)
                .await
                .unwrap_or_default()
                .len(),
            1
        );
    }
}
