use relgraph_core::Error as CoreError;
use thiserror::Error;

/// Storage-specific error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("No {0} connection is open")]
    NotConnected(&'static str),

    #[error("{0} connection is already closed")]
    AlreadyClosed(&'static str),

    #[error("Invalid node label '{0}'")]
    InvalidLabel(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        CoreError::storage(err.to_string())
    }
}
