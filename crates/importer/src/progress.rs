//! Per-run counters and progress logging

use crate::error::ImportError;
use relgraph_core::RelationRecord;
use relgraph_storage::RepoOutcome;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Statistics for one import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows that parsed, mapped and were handed to the repository
    pub accepted: u64,
    /// Rows without exactly three fields
    pub malformed: u64,
    /// Rows whose relation token is not in the mapping table
    pub unmapped: u64,
    /// Repository writes that reported a backend failure
    pub failed_writes: u64,
    /// Number of "Processed N lines." reports emitted
    pub progress_reports: u64,
    pub elapsed: Duration,
}

impl ImportSummary {
    /// Rows the reader produced, accepted or not
    pub fn total_lines(&self) -> u64 {
        self.accepted + self.malformed + self.unmapped
    }
}

pub(crate) struct Progress {
    backend: &'static str,
    interval: u64,
    started: Instant,
    summary: ImportSummary,
}

impl Progress {
    pub(crate) fn new(backend: &'static str, interval: u64) -> Self {
        Self {
            backend,
            // a zero interval would never report; config validation rejects it upstream
            interval: interval.max(1),
            started: Instant::now(),
            summary: ImportSummary::default(),
        }
    }

    pub(crate) fn malformed(&mut self, line: u64, fields: usize) {
        debug!("Skipping line {line}: expected 3 fields, found {fields}");
        self.summary.malformed += 1;
    }

    pub(crate) fn unmapped(&mut self, record: &RelationRecord) {
        debug!(
            "Skipping unknown relation '{}' for subject '{}'",
            record.relation, record.subject_id
        );
        self.summary.unmapped += 1;
    }

    /// Fold one write outcome into the counters
    ///
    /// # Errors
    /// `ImportError::NotConnected` when the repository has no open connection
    pub(crate) fn settle<T>(&mut self, outcome: RepoOutcome<T>) -> Result<Option<T>, ImportError> {
        match outcome {
            RepoOutcome::Ok(value) => Ok(Some(value)),
            RepoOutcome::OperationFailed(reason) => {
                warn!("Write failed, continuing: {}", reason);
                self.summary.failed_writes += 1;
                Ok(None)
            }
            RepoOutcome::NotConnected => Err(ImportError::NotConnected {
                backend: self.backend,
                accepted: self.summary.accepted,
            }),
        }
    }

    pub(crate) fn accept(&mut self) {
        self.summary.accepted += 1;
        if self.summary.accepted % self.interval == 0 {
            info!("Processed {} lines.", self.summary.accepted);
            self.summary.progress_reports += 1;
        }
    }

    pub(crate) fn finish(mut self) -> ImportSummary {
        self.summary.elapsed = self.started.elapsed();
        info!(
            "Completed import into {}. Total relationships processed: {} \
             ({} malformed, {} unmapped, {} failed writes) in {:.2?}",
            self.backend,
            self.summary.accepted,
            self.summary.malformed,
            self.summary.unmapped,
            self.summary.failed_writes,
            self.summary.elapsed
        );
        self.summary
    }
}
