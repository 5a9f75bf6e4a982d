//! Blocking file reader feeding the async write loop

use crate::error::ImportError;
use relgraph_core::{ParsedLine, RecordReader};
use std::path::Path;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Parsed lines arriving from a `spawn_blocking` reader
///
/// The channel is bounded, so a slow writer holds the reader back. Dropping
/// the stream closes the channel and the reader stops at its next send.
pub(crate) struct LineStream {
    rx: mpsc::Receiver<ParsedLine>,
    task: JoinHandle<Result<(), ImportError>>,
}

impl LineStream {
    pub(crate) fn spawn(path: &Path, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel::<ParsedLine>(capacity.max(1));
        let path = path.to_path_buf();

        let task = tokio::task::spawn_blocking(move || {
            let reader = RecordReader::open(&path).map_err(|e| ImportError::FileAccess {
                path: path.clone(),
                message: e.to_string(),
            })?;

            for parsed in reader {
                let parsed = parsed.map_err(|e| read_error(&path, e))?;
                // Parks this blocking thread while the writer is behind
                if tx.blocking_send(parsed).is_err() {
                    debug!("Write loop stopped early; closing {}", path.display());
                    break;
                }
            }
            Ok(())
        });

        Self { rx, task }
    }

    pub(crate) async fn recv(&mut self) -> Option<ParsedLine> {
        self.rx.recv().await
    }

    /// Wait for the reader and surface any error it hit
    pub(crate) async fn finish(self) -> Result<(), ImportError> {
        drop(self.rx);
        self.task
            .await
            .map_err(|e| ImportError::ReaderTask(e.to_string()))?
    }
}

fn read_error(path: &Path, err: relgraph_core::Error) -> ImportError {
    ImportError::Read {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_stream_yields_every_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "u1|friend|u2\nbroken\nu3|event|e1").unwrap();

        let mut lines = LineStream::spawn(file.path(), 1);
        let mut received = Vec::new();
        while let Some(line) = lines.recv().await {
            received.push(line);
        }
        assert!(lines.finish().await.is_ok());

        assert_eq!(received.len(), 3);
        assert!(matches!(received[1], ParsedLine::Malformed { fields: 1, .. }));
    }

    #[tokio::test]
    async fn test_missing_file_is_file_access() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");

        let mut lines = LineStream::spawn(&path, 4);
        assert!(lines.recv().await.is_none());
        assert!(matches!(
            lines.finish().await,
            Err(ImportError::FileAccess { .. })
        ));
    }

    #[tokio::test]
    async fn test_early_drop_stops_reader() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for i in 0..100 {
            writeln!(file, "u{i}|friend|u{}", i + 1).unwrap();
        }

        let mut lines = LineStream::spawn(file.path(), 1);
        assert!(lines.recv().await.is_some());
        assert!(lines.finish().await.is_ok());
    }
}
