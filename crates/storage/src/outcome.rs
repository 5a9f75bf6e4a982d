//! Three-way result of a repository call

use crate::error::StorageError;
use std::fmt::Display;
use tracing::error;

/// Result of a single repository operation
///
/// Callers can tell "no handle" apart from "the backend rejected the call"
/// apart from a legitimately empty answer.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum RepoOutcome<T> {
    /// The call reached the backend and succeeded
    Ok(T),
    /// The repository holds no open connection
    NotConnected,
    /// The backend reported an error
    OperationFailed(String),
}

impl<T> RepoOutcome<T> {
    /// Log a backend failure and wrap it
    pub fn failed(operation: &str, err: impl Display) -> Self {
        error!(operation, error = %err, "Repository operation failed");
        Self::OperationFailed(format!("{operation}: {err}"))
    }

    /// Convert a driver result, logging the error side
    pub fn from_result<E: Display>(operation: &str, result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(e) => Self::failed(operation, e),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn is_not_connected(&self) -> bool {
        matches!(self, Self::NotConnected)
    }

    /// The value, discarding the failure cause
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RepoOutcome<U> {
        match self {
            Self::Ok(value) => RepoOutcome::Ok(f(value)),
            Self::NotConnected => RepoOutcome::NotConnected,
            Self::OperationFailed(reason) => RepoOutcome::OperationFailed(reason),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.ok().unwrap_or(default)
    }

    /// Collapse to the absent/zero sentinel
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.ok().unwrap_or_default()
    }

    /// Upgrade to a typed error for callers that want `?`
    pub fn into_result(self, backend: &'static str) -> Result<T, StorageError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::NotConnected => Err(StorageError::NotConnected(backend)),
            Self::OperationFailed(reason) => Err(StorageError::BackendError(reason)),
        }
    }
}
