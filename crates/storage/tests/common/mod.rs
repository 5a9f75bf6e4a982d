//! Test utilities for storage layer integration tests

use relgraph_core::{config::StorageConfig, Config};
use relgraph_storage::{id_properties, Properties};
use uuid::Uuid;

/// Storage settings for live-server tests
///
/// Honors the same `RELGRAPH_STORAGE__*` and legacy `MONGO_*` / `NEO4J_*`
/// variables as the binary, falling back to localhost defaults.
pub fn test_storage_config() -> StorageConfig {
    Config::load(None)
        .map(|config| config.storage)
        .unwrap_or_default()
}

/// A collection name no other test run will collide with
#[allow(dead_code)]
pub fn unique_collection() -> String {
    format!("test_{}", Uuid::new_v4().simple())
}

/// Node key with a run-unique id so tests can share the default database
#[allow(dead_code)]
pub fn unique_node(prefix: &str) -> Properties {
    id_properties(&format!("{prefix}_{}", Uuid::new_v4().simple()))
}
