use std::path::PathBuf;
use thiserror::Error;

/// Import failures that stop the run
///
/// Per-row problems (malformed lines, unknown tokens, rejected writes) are
/// counted in [`crate::ImportSummary`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Cannot open input file {}: {message}", path.display())]
    FileAccess { path: PathBuf, message: String },

    #[error("Failed reading {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("{backend} connection is not open (stopped after {accepted} accepted lines)")]
    NotConnected {
        backend: &'static str,
        accepted: u64,
    },

    #[error("Reader task failed: {0}")]
    ReaderTask(String),
}

