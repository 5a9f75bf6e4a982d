//! Tests for configuration module

use super::*;
use crate::error::{Error, Result};
use std::io::Write;
use tempfile::NamedTempFile;

fn create_temp_config_file(content: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .map_err(|e| Error::config(format!("Failed to create temp file: {e}")))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::config(format!("Failed to write temp file: {e}")))?;
    file.flush()
        .map_err(|e| Error::config(format!("Failed to flush temp file: {e}")))?;
    Ok(file)
}

fn with_env_vars<F, T>(vars: &[(&str, &str)], f: F) -> T
where
    F: FnOnce() -> T,
{
    for (key, value) in vars {
        std::env::set_var(key, value);
    }
    let result = f();
    for (key, _) in vars {
        std::env::remove_var(key);
    }
    result
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.storage.mongo_uri, "mongodb://localhost:27017");
    assert_eq!(config.storage.mongo_database, "relgraph");
    assert_eq!(config.storage.neo4j_uri, "bolt://localhost:7687");
    assert_eq!(config.storage.neo4j_user, "neo4j");
    assert_eq!(config.storage.neo4j_database, "neo4j");
    assert_eq!(config.import.progress_interval, 1000);
    assert_eq!(config.import.collection, "users");
    assert_eq!(config.import.document_policy, DocumentWritePolicy::Append);
    assert_eq!(config.import.node_policy, NodeWritePolicy::Create);
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_toml_str_empty_uses_defaults() {
    let config = Config::from_toml_str("").expect("Failed to parse empty TOML");
    assert_eq!(config.import.channel_capacity, 256);
    assert_eq!(config.storage.neo4j_max_connections, 16);
}

#[test]
fn test_from_toml_str_policies() {
    let toml = r#"
        [import]
        document_policy = "merge"
        node_policy = "merge"
        collection = "people"
    "#;

    let config = Config::from_toml_str(toml).expect("Failed to parse valid TOML");
    assert_eq!(config.import.document_policy, DocumentWritePolicy::Merge);
    assert_eq!(config.import.node_policy, NodeWritePolicy::Merge);
    assert_eq!(config.import.collection, "people");
    assert_eq!(config.import.progress_interval, 1000);
}

#[test]
fn test_from_toml_str_unknown_policy() {
    let toml = r#"
        [import]
        document_policy = "upsert"
    "#;

    let result = Config::from_toml_str(toml);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Failed to parse TOML"));
}

#[test]
fn test_from_file() {
    let file = create_temp_config_file(
        r#"
        [storage]
        mongo_database = "social"

        [import]
        progress_interval = 250
    "#,
    )
    .expect("temp config");

    let config = Config::from_file(file.path()).expect("Failed to load config file");
    assert_eq!(config.storage.mongo_database, "social");
    assert_eq!(config.import.progress_interval, 250);
}

#[test]
fn test_from_file_without_extension_is_toml() {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(b"[import]\ncollection = \"people\"\n")
        .expect("write config");
    file.flush().expect("flush config");
    assert!(file.path().extension().is_none());

    let config = Config::from_file(file.path()).expect("extensionless config");
    assert_eq!(config.import.collection, "people");
}

#[test]
fn test_from_file_missing_path_uses_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = Config::from_file(&dir.path().join("absent.toml")).expect("defaults");
    assert_eq!(config.storage.mongo_uri, "mongodb://localhost:27017");
}

#[test]
fn test_env_overrides() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");

    let config = with_env_vars(
        &[
            ("RELGRAPH_IMPORT__COLLECTION", "members"),
            ("NEO4J_DATABASE", "social_graph"),
        ],
        || Config::from_file(&path),
    )
    .expect("env config");

    assert_eq!(config.import.collection, "members");
    assert_eq!(config.storage.neo4j_database, "social_graph");
}

#[test]
fn test_validation_rejects_zero_progress_interval() {
    let mut config = Config::default();
    config.import.progress_interval = 0;
    let result = config.validate();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("import.progress_interval"));
}

#[test]
fn test_validation_channel_capacity_bounds() {
    let mut config = Config::default();

    config.import.channel_capacity = 0;
    assert!(config.validate().is_err());

    config.import.channel_capacity = 100_000;
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("too large"));

    config.import.channel_capacity = 1;
    assert!(config.validate().is_ok());
}

#[test]
fn test_validation_rejects_empty_uri() {
    let mut config = Config::default();
    config.storage.neo4j_uri = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_debug_redacts_password() {
    let mut config = StorageConfig::default();
    config.neo4j_password = "hunter2".to_string();
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("hunter2"));
    assert!(rendered.contains("***REDACTED***"));
}

#[test]
fn test_save_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.import.document_policy = DocumentWritePolicy::Merge;
    config.save(&path).expect("save");

    let content = std::fs::read_to_string(&path).expect("read back");
    let loaded = Config::from_toml_str(&content).expect("parse back");
    assert_eq!(loaded.import.document_policy, DocumentWritePolicy::Merge);
}
