//! Default values and functions for configuration

// Default constants
pub(crate) const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
pub(crate) const DEFAULT_MONGO_DATABASE: &str = "relgraph";
pub(crate) const DEFAULT_NEO4J_URI: &str = "bolt://localhost:7687";
pub(crate) const DEFAULT_NEO4J_USER: &str = "neo4j";
pub(crate) const DEFAULT_NEO4J_PASSWORD: &str = "password";
pub(crate) const DEFAULT_NEO4J_DATABASE: &str = "neo4j";
pub(crate) const DEFAULT_COLLECTION: &str = "users";

pub(crate) fn default_mongo_uri() -> String {
    DEFAULT_MONGO_URI.to_string()
}

pub(crate) fn default_mongo_database() -> String {
    DEFAULT_MONGO_DATABASE.to_string()
}

pub(crate) fn default_neo4j_uri() -> String {
    DEFAULT_NEO4J_URI.to_string()
}

pub(crate) fn default_neo4j_user() -> String {
    DEFAULT_NEO4J_USER.to_string()
}

pub(crate) fn default_neo4j_password() -> String {
    DEFAULT_NEO4J_PASSWORD.to_string()
}

pub(crate) fn default_neo4j_database() -> String {
    DEFAULT_NEO4J_DATABASE.to_string()
}

pub(crate) fn default_neo4j_max_connections() -> usize {
    16
}

pub(crate) fn default_progress_interval() -> u64 {
    1000
}

pub(crate) fn default_channel_capacity() -> usize {
    256
}

pub(crate) fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}
