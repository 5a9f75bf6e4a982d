use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by every relgraph crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The relation file could not be read past `line`
    #[error("Unreadable record near line {line}: {message}")]
    Record { line: u64, message: String },

    /// Backend failure surfaced through the storage layer
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn record(line: u64, message: impl Into<String>) -> Self {
        Self::Record {
            line,
            message: message.into(),
        }
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Wrap `source` under a human-readable context line
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// `.context(..)` for any `Result` whose error is a std error
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_source() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "lastfm.txt",
        ));
        let err = io.context("Failed to open input").unwrap_err();
        assert_eq!(err.to_string(), "Failed to open input: lastfm.txt");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_record_error_display() {
        let err = Error::record(4, "stream did not contain valid data");
        assert_eq!(
            err.to_string(),
            "Unreadable record near line 4: stream did not contain valid data"
        );
    }
}
