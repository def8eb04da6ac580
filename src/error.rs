//! Error type shared by the binning pipeline

use crate::counts::CountsError;
use crate::notation::NotationError;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building, filling or saving bins
#[derive(Error, Debug)]
pub enum BinError {
    #[error("unable to get array of thresholds for bins: invalid threshold '{token}': {source}")]
    InvalidThreshold {
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("threshold list is empty")]
    EmptyThresholds,

    #[error("invalid number of calls ({0})")]
    InvalidCallCount(usize),

    #[error("invalid datatype size ({0})")]
    InvalidDatatypeSize(usize),

    #[error("malformed counts record (expected 'Rank(s) <ranks>: <counts>'): {0:?}")]
    MalformedRecord(String),

    #[error("invalid rank set '{descriptor}': {source}")]
    InvalidRankSet {
        descriptor: String,
        #[source]
        source: NotationError,
    },

    #[error("invalid number of ranks: 0 (rank set '{0}')")]
    EmptyRankSet(String),

    #[error("invalid count '{token}': {source}")]
    InvalidCount {
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("count {count} with datatype size {datatype_size} overflows")]
    CountOverflow { count: i64, datatype_size: usize },

    #[error("value {0} does not fall into any bin")]
    Unclassified(i64),

    #[error("undefined input file (list bins: {0})")]
    UndefinedInput(String),

    #[error("unable to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write bin file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Counts(#[from] CountsError),
}

/// Result type for binning operations
pub type Result<T> = std::result::Result<T, BinError>;
