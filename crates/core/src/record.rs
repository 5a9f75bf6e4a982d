//! Pipe-delimited relation records
//!
//! Input files hold one relation per line: `subject_id|relation_token|object_id`.
//! Lines that do not split into exactly three fields are reported as
//! [`ParsedLine::Malformed`] rather than failing the read, so callers can count
//! and skip them.

use crate::error::{Error, Result, ResultExt};
use csv::{ReaderBuilder, StringRecordsIntoIter};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Field separator used by relation files
pub const FIELD_DELIMITER: u8 = b'|';

/// Number of fields an accepted line must have
pub const FIELDS_PER_RECORD: usize = 3;

/// A single `subject|relation|object` row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRecord {
    pub subject_id: String,
    pub relation: String,
    pub object_id: String,
}

impl RelationRecord {
    pub fn new(
        subject_id: impl Into<String>,
        relation: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            relation: relation.into(),
            object_id: object_id.into(),
        }
    }
}

/// Outcome of reading one physical line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Exactly three fields
    Record(RelationRecord),
    /// Wrong field count or undecodable bytes
    Malformed { line: u64, fields: usize },
}

/// Lazy reader over a relation file
///
/// Iterates `Result<ParsedLine>`. An I/O failure is yielded once as `Err`
/// and ends the iteration.
pub struct RecordReader<R: Read> {
    records: StringRecordsIntoIter<R>,
    finished: bool,
}

impl RecordReader<BufReader<File>> {
    /// Open a relation file from disk
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open {}", path.display()))?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: Read> RecordReader<R> {
    /// Wrap any byte source
    pub fn from_reader(reader: R) -> Self {
        let records = ReaderBuilder::new()
            .delimiter(FIELD_DELIMITER)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader)
            .into_records();

        Self {
            records,
            finished: false,
        }
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<ParsedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.records.next()? {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                if record.len() != FIELDS_PER_RECORD {
                    return Some(Ok(ParsedLine::Malformed {
                        line,
                        fields: record.len(),
                    }));
                }
                Some(Ok(ParsedLine::Record(RelationRecord::new(
                    &record[0], &record[1], &record[2],
                ))))
            }
            Err(e) => match e.kind() {
                csv::ErrorKind::Utf8 { pos, .. } => Some(Ok(ParsedLine::Malformed {
                    line: pos.as_ref().map(|p| p.line()).unwrap_or_default(),
                    fields: 0,
                })),
                _ => {
                    self.finished = true;
                    let line = e.position().map(|p| p.line()).unwrap_or_default();
                    Some(Err(Error::record(line, e.to_string())))
                }
            },
        }
    }
}
