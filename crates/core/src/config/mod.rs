//! Configuration module for relgraph
//!
//! Configuration can be loaded from a TOML file and/or environment variables.

mod defaults;
mod loading;

#[cfg(test)]
mod tests;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use defaults::*;

/// Returns the path to the global configuration file (`~/.relgraph/config.toml`)
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".relgraph").join("config.toml"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Import behaviour
    #[serde(default)]
    pub import: ImportConfig,
}

/// How the document importer writes a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentWritePolicy {
    /// Insert one new document per row, even when `user_id` repeats (default)
    #[default]
    Append,
    /// Push the related id into the `user_id` document, creating it if absent
    Merge,
}

/// How the graph repository writes nodes and relationships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodeWritePolicy {
    /// `CREATE` on every call; repeated ids produce duplicate nodes (default)
    #[default]
    Create,
    /// `MERGE` on label + `id`
    Merge,
}

/// Configuration for storage backends
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// MongoDB connection string
    #[serde(default = "default_mongo_uri")]
    pub mongo_uri: String,

    /// MongoDB database name
    #[serde(default = "default_mongo_database")]
    pub mongo_database: String,

    /// Neo4j bolt URI
    #[serde(default = "default_neo4j_uri")]
    pub neo4j_uri: String,

    /// Neo4j username
    #[serde(default = "default_neo4j_user")]
    pub neo4j_user: String,

    /// Neo4j password
    #[serde(default = "default_neo4j_password")]
    pub neo4j_password: String,

    /// Neo4j database name
    #[serde(default = "default_neo4j_database")]
    pub neo4j_database: String,

    /// Upper bound on pooled bolt connections
    #[serde(default = "default_neo4j_max_connections")]
    pub neo4j_max_connections: usize,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("mongo_uri", &self.mongo_uri)
            .field("mongo_database", &self.mongo_database)
            .field("neo4j_uri", &self.neo4j_uri)
            .field("neo4j_user", &self.neo4j_user)
            .field("neo4j_password", &"***REDACTED***")
            .field("neo4j_database", &self.neo4j_database)
            .field("neo4j_max_connections", &self.neo4j_max_connections)
            .finish()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mongo_uri: default_mongo_uri(),
            mongo_database: default_mongo_database(),
            neo4j_uri: default_neo4j_uri(),
            neo4j_user: default_neo4j_user(),
            neo4j_password: default_neo4j_password(),
            neo4j_database: default_neo4j_database(),
            neo4j_max_connections: default_neo4j_max_connections(),
        }
    }
}

/// Configuration for the import orchestrators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Accepted rows between progress log lines
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,

    /// Bounded buffer between the file reader and the writer loop
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Target collection for document imports
    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(default)]
    pub document_policy: DocumentWritePolicy,

    #[serde(default)]
    pub node_policy: NodeWritePolicy,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            progress_interval: default_progress_interval(),
            channel_capacity: default_channel_capacity(),
            collection: default_collection(),
            document_policy: DocumentWritePolicy::default(),
            node_policy: NodeWritePolicy::default(),
        }
    }
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.mongo_uri.trim().is_empty() {
            return Err(Error::config("storage.mongo_uri must not be empty".to_string()));
        }
        if self.storage.mongo_database.trim().is_empty() {
            return Err(Error::config(
                "storage.mongo_database must not be empty".to_string(),
            ));
        }
        if self.storage.neo4j_uri.trim().is_empty() {
            return Err(Error::config("storage.neo4j_uri must not be empty".to_string()));
        }
        if self.storage.neo4j_max_connections == 0 {
            return Err(Error::config(
                "storage.neo4j_max_connections must be greater than 0".to_string(),
            ));
        }

        if self.import.progress_interval == 0 {
            return Err(Error::config(
                "import.progress_interval must be greater than 0".to_string(),
            ));
        }
        if self.import.channel_capacity == 0 {
            return Err(Error::config(
                "import.channel_capacity must be greater than 0".to_string(),
            ));
        }
        if self.import.channel_capacity > 65_536 {
            return Err(Error::config(format!(
                "import.channel_capacity too large (max 65536, got {})",
                self.import.channel_capacity
            )));
        }
        if self.import.collection.trim().is_empty() {
            return Err(Error::config(
                "import.collection must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Saves the configuration to a TOML file
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, toml_string)
            .map_err(|e| Error::config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}
