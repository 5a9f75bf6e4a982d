use relgraph_core::config::{Config, DocumentWritePolicy, NodeWritePolicy, StorageConfig};

#[test]
fn test_storage_config_defaults() {
    let config = StorageConfig::default();
    assert_eq!(config.mongo_uri, "mongodb://localhost:27017");
    assert_eq!(config.mongo_database, "relgraph");
    assert_eq!(config.neo4j_uri, "bolt://localhost:7687");
    assert_eq!(config.neo4j_user, "neo4j");
    assert_eq!(config.neo4j_password, "password");
    assert_eq!(config.neo4j_database, "neo4j");
    assert_eq!(config.neo4j_max_connections, 16);
}

#[test]
fn test_config_validation_collection() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.import.collection = String::new();
    let result = config.validate();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("import.collection"));
}

#[test]
fn test_config_validation_neo4j_pool() {
    let mut config = Config::default();
    config.storage.neo4j_max_connections = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_full_toml() {
    let toml = r#"
        [storage]
        mongo_uri = "mongodb://db.internal:27017"
        mongo_database = "social"
        neo4j_uri = "bolt://graph.internal:7687"
        neo4j_user = "importer"
        neo4j_password = "secret"
        neo4j_database = "people"
        neo4j_max_connections = 4

        [import]
        progress_interval = 5000
        channel_capacity = 64
        collection = "members"
        document_policy = "append"
        node_policy = "merge"
    "#;

    let config = Config::from_toml_str(toml).expect("valid TOML");
    assert!(config.validate().is_ok());
    assert_eq!(config.storage.neo4j_user, "importer");
    assert_eq!(config.storage.neo4j_max_connections, 4);
    assert_eq!(config.import.progress_interval, 5000);
    assert_eq!(config.import.document_policy, DocumentWritePolicy::Append);
    assert_eq!(config.import.node_policy, NodeWritePolicy::Merge);
}
