//! Reader for compact count files
//!
//! A count file is a sequence of record batches. Each batch starts with a
//! header describing the calls it covers, followed by a data block holding one
//! line per group of ranks that sent identical counts:
//!
//! ```text
//! # Raw counters
//!
//! Number of ranks: 4
//! Datatype size: 8
//! Alltoallv calls 0-2
//! Count: 3 calls
//!
//! BEGINNING DATA
//! Rank(s) 0-3: 50 150 2000
//! END DATA
//! ```
//!
//! Running out of input before a header starts is the normal end of the
//! stream. Running out anywhere else is an error.

use crate::notation::{self, NotationError};
use std::io::BufRead;
use thiserror::Error;
use tracing::debug;

const RANKS_FIELD: &str = "Number of ranks:";
const DATATYPE_FIELD: &str = "Datatype size:";
const COUNT_FIELD: &str = "Count:";
const CALLS_MARKER: &str = " calls ";
const DATA_BEGIN: &str = "BEGINNING DATA";
const DATA_END: &str = "END DATA";

/// Errors raised while reading a count file
#[derive(Error, Debug)]
pub enum CountsError {
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("count file ends in the middle of a {0} (line {1})")]
    Truncated(&'static str, usize),

    #[error("record header is missing the '{0}' field")]
    MissingField(&'static str),

    #[error("line {line}: invalid value for '{field}': {value:?}")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: invalid call list: {source}")]
    InvalidCallList {
        line: usize,
        #[source]
        source: NotationError,
    },

    #[error("header announces {announced} calls but lists {listed}")]
    CallCountMismatch { announced: usize, listed: usize },

    #[error("line {line}: expected '{expected}', found {found:?}")]
    UnexpectedLine {
        line: usize,
        expected: &'static str,
        found: String,
    },
}

/// Result type for count file operations
pub type Result<T> = std::result::Result<T, CountsError>;

/// Header of one record batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountsHeader {
    /// Number of ranks in the communicator
    pub num_ranks: usize,
    /// Size in bytes of one element of the exchanged datatype
    pub datatype_size: usize,
    /// Name of the collective operation (e.g. "Alltoallv")
    pub collective: String,
    /// Identifiers of the calls sharing the counts in this batch
    pub call_ids: Vec<i64>,
}

impl CountsHeader {
    /// Number of calls represented by the batch
    pub fn num_calls(&self) -> usize {
        self.call_ids.len()
    }
}

/// A sequential source of record batches
///
/// Callers alternate `next_header` and `next_counters`. A header of `None`
/// signals the clean end of the stream.
pub trait CountsSource {
    /// Read the next batch header, or `None` at end of stream
    fn next_header(&mut self) -> Result<Option<CountsHeader>>;

    /// Read the rank/count lines of the batch whose header was just read
    fn next_counters(&mut self) -> Result<Vec<String>>;
}

/// [`CountsSource`] over the compact textual count-file format
#[derive(Debug)]
pub struct CompactReader<R> {
    reader: R,
    line_no: usize,
}

impl<R: BufRead> CompactReader<R> {
    /// Wrap a buffered reader positioned at the start of a count file
    pub fn new(reader: R) -> Self {
        Self { reader, line_no: 0 }
    }

    /// Next line without its line terminator, or `None` at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Next line that is neither blank nor a `#` comment
    fn read_content_line(&mut self) -> Result<Option<String>> {
        while let Some(line) = self.read_line()? {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Ok(Some(line));
        }
        Ok(None)
    }

    fn parse_number(&self, field: &'static str, value: &str) -> Result<usize> {
        value
            .trim()
            .parse::<usize>()
            .map_err(|_| CountsError::InvalidField {
                line: self.line_no,
                field,
                value: value.trim().to_string(),
            })
    }
}

impl<R: BufRead> CountsSource for CompactReader<R> {
    fn next_header(&mut self) -> Result<Option<CountsHeader>> {
        let Some(mut line) = self.read_content_line()? else {
            return Ok(None);
        };

        let mut num_ranks = None;
        let mut datatype_size = None;
        let mut calls: Option<(String, Vec<i64>)> = None;

        loop {
            let trimmed = line.trim();
            if let Some(value) = trimmed.strip_prefix(COUNT_FIELD) {
                let value = value.trim();
                let value = value.strip_suffix("calls").unwrap_or(value);
                let announced = self.parse_number(COUNT_FIELD, value)?;
                let (collective, call_ids) = calls.ok_or(CountsError::MissingField("calls"))?;
                if announced != call_ids.len() {
                    return Err(CountsError::CallCountMismatch {
                        announced,
                        listed: call_ids.len(),
                    });
                }
                return Ok(Some(CountsHeader {
                    num_ranks: num_ranks.ok_or(CountsError::MissingField(RANKS_FIELD))?,
                    datatype_size: datatype_size
                        .ok_or(CountsError::MissingField(DATATYPE_FIELD))?,
                    collective,
                    call_ids,
                }));
            } else if let Some(value) = trimmed.strip_prefix(RANKS_FIELD) {
                num_ranks = Some(self.parse_number(RANKS_FIELD, value)?);
            } else if let Some(value) = trimmed.strip_prefix(DATATYPE_FIELD) {
                datatype_size = Some(self.parse_number(DATATYPE_FIELD, value)?);
            } else if let Some((collective, list)) = trimmed.split_once(CALLS_MARKER) {
                let call_ids = notation::expand(list).map_err(|source| {
                    CountsError::InvalidCallList {
                        line: self.line_no,
                        source,
                    }
                })?;
                calls = Some((collective.trim().to_string(), call_ids));
            } else if trimmed == DATA_BEGIN {
                return Err(CountsError::UnexpectedLine {
                    line: self.line_no,
                    expected: COUNT_FIELD,
                    found: line,
                });
            } else {
                debug!(line = self.line_no, "Ignoring unknown header line: {}", trimmed);
            }

            line = self
                .read_content_line()?
                .ok_or(CountsError::Truncated("header", self.line_no))?;
        }
    }

    fn next_counters(&mut self) -> Result<Vec<String>> {
        let begin = self
            .read_content_line()?
            .ok_or(CountsError::Truncated("data block", self.line_no))?;
        if begin.trim() != DATA_BEGIN {
            return Err(CountsError::UnexpectedLine {
                line: self.line_no,
                expected: DATA_BEGIN,
                found: begin,
            });
        }

        let mut counters = Vec::new();
        loop {
            let line = self
                .read_line()?
                .ok_or(CountsError::Truncated("data block", self.line_no))?;
            let trimmed = line.trim();
            if trimmed == DATA_END {
                return Ok(counters);
            }
            if !trimmed.is_empty() {
                counters.push(line);
            }
        }
    }
}
