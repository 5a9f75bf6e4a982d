//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, Environment, File, FileFormat};
use std::path::Path;
use tracing::debug;

use super::{global_config_path, Config};

/// Unprefixed environment variables honoured for backend connection settings
const LEGACY_STORAGE_VARS: &[(&str, &str)] = &[
    ("MONGO_URI", "storage.mongo_uri"),
    ("MONGO_DATABASE", "storage.mongo_database"),
    ("NEO4J_URI", "storage.neo4j_uri"),
    ("NEO4J_USER", "storage.neo4j_user"),
    ("NEO4J_PASSWORD", "storage.neo4j_password"),
    ("NEO4J_DATABASE", "storage.neo4j_database"),
];

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `RELGRAPH_` and use double underscores
    /// for nested values. For example:
    /// - `RELGRAPH_IMPORT__PROGRESS_INTERVAL=500`
    /// - `RELGRAPH_STORAGE__MONGO_DATABASE=social`
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut builder = ConfigLib::builder();

        // Add the config file if it exists
        if path.exists() {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        } else {
            debug!("No config file at {}, using defaults", path.display());
        }

        builder = builder.add_source(
            Environment::with_prefix("RELGRAPH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        for (var, key) in LEGACY_STORAGE_VARS {
            if let Ok(value) = std::env::var(var) {
                debug!("Applying {var} to {key}");
                builder = builder
                    .set_override(*key, value)
                    .map_err(|e| Error::config(format!("Failed to set {var}: {e}")))?;
            }
        }

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.relgraph/config.toml or custom --config path)
    /// 3. Environment variables (RELGRAPH_*)
    /// 4. Legacy variables (MONGO_URI, NEO4J_URI, NEO4J_USER, ...)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
