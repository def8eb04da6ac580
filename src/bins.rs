//! Message-size bins and count classification
//!
//! A threshold list `[t0, t1, ..., tn-1]` splits the non-negative integers into
//! `n + 1` contiguous ranges:
//!
//! ```text
//! [0, t0)  [t0, t1)  ...  [tn-2, tn-1)  [tn-1, +inf)
//! ```
//!
//! Every count read from a profile is scaled to bytes and tallied into the
//! single range it falls in. A bin's `size` is an occurrence total, not a byte
//! volume: one count shared by `r` ranks over `c` calls adds `c * r`.
//!
//! # Example
//!
//! ```
//! use binnacle::bins::{self, ClassifyMode};
//!
//! # fn main() -> binnacle::error::Result<()> {
//! let thresholds = bins::parse_thresholds("100,1000")?;
//! let mut bins = bins::create(&thresholds)?;
//!
//! let records = vec!["Rank(s) 0-3: 50 150 2000".to_string()];
//! bins::classify_counts(&mut bins, &records, 1, 1, ClassifyMode::Lenient)?;
//!
//! assert_eq!(bins.iter().map(|b| b.size).collect::<Vec<_>>(), vec![4, 4, 4]);
//! # Ok(())
//! # }
//! ```

use crate::error::{BinError, Result};
use crate::notation;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Literal prefix in front of every rank-set descriptor
const RANKS_PREFIX: &str = "Rank(s)";

/// Separator between the rank-set descriptor and its counts
const RECORD_SEPARATOR: &str = ": ";

/// One contiguous range of byte sizes and the number of occurrences seen in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bin {
    /// Inclusive lower bound in bytes
    pub min: i64,
    /// Exclusive upper bound in bytes, `None` for the open-ended last bin
    pub max: Option<i64>,
    /// Weighted occurrence total
    pub size: u64,
}

impl Bin {
    /// Create an empty bin covering `[min, max)`
    pub fn new(min: i64, max: Option<i64>) -> Self {
        Self { min, max, size: 0 }
    }

    /// Whether this bin has no upper bound
    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }

    /// Whether a byte value falls in this bin's range
    #[inline]
    pub fn contains(&self, val: i64) -> bool {
        match self.max {
            Some(max) => self.min <= val && val < max,
            None => val >= self.min,
        }
    }

    /// Range label: `"<min>-<max>"`, or `"<min>+"` for the last bin
    pub fn label(&self) -> String {
        match self.max {
            Some(max) => format!("{}-{}", self.min, max),
            None => format!("{}+", self.min),
        }
    }
}

/// What to do with a value that matches no bin
///
/// With bins built by [`create`] from increasing thresholds this never
/// happens for non-negative values. Negative counts and malformed threshold
/// lists are the only way to reach it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifyMode {
    /// Drop the value without error
    #[default]
    Lenient,
    /// Fail with [`BinError::Unclassified`]
    Strict,
}

/// Parse a comma-separated threshold list such as `"1024,65536,1048576"`
///
/// Any token that is not an integer fails the whole list.
pub fn parse_thresholds(descr: &str) -> Result<Vec<i64>> {
    if descr.trim().is_empty() {
        return Err(BinError::EmptyThresholds);
    }

    descr
        .split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<i64>()
                .map_err(|source| BinError::InvalidThreshold {
                    token: token.to_string(),
                    source,
                })
        })
        .collect()
}

/// Build `thresholds.len() + 1` empty bins from a threshold list
///
/// Thresholds are expected to be strictly increasing. That is not checked
/// here: out-of-order thresholds yield overlapping or empty ranges.
pub fn create(thresholds: &[i64]) -> Result<Vec<Bin>> {
    if thresholds.is_empty() {
        return Err(BinError::EmptyThresholds);
    }

    let mut bins = Vec::with_capacity(thresholds.len() + 1);
    let mut start = 0;
    for &end in thresholds {
        bins.push(Bin::new(start, Some(end)));
        start = end;
    }
    bins.push(Bin::new(start, None));

    Ok(bins)
}

/// Add `weight` to the first bin containing `val`
///
/// Returns `false` when no bin matches; nothing is modified in that case.
pub fn classify_value(bins: &mut [Bin], val: i64, weight: u64) -> bool {
    match bins.iter_mut().find(|b| b.contains(val)) {
        Some(bin) => {
            bin.size = bin.size.saturating_add(weight);
            true
        }
        None => false,
    }
}

/// Split `"Rank(s) 0-3: 1 2 3"` into its rank-set descriptor and count list
fn split_record(record: &str) -> Result<(&str, &str)> {
    let (ranks, counts) = record
        .split_once(RECORD_SEPARATOR)
        .ok_or_else(|| BinError::MalformedRecord(record.to_string()))?;
    let ranks = ranks.strip_prefix(RANKS_PREFIX).unwrap_or(ranks).trim();
    Ok((ranks, counts.trim_end_matches('\n')))
}

/// Tally a batch of rank/count records into `bins`
///
/// Each record looks like `"Rank(s) <ranks>: <count> <count> ..."`. Every
/// count is multiplied by `datatype_size` to get bytes, and the matching bin
/// grows by `num_calls * <number of ranks>`.
///
/// `num_calls` and `datatype_size` are checked before anything is touched, so
/// `bins` is left unmodified when either is zero. Any later error leaves the
/// bins partially updated and they should be discarded.
pub fn classify_counts(
    bins: &mut [Bin],
    counts: &[String],
    num_calls: usize,
    datatype_size: usize,
    mode: ClassifyMode,
) -> Result<()> {
    if num_calls == 0 {
        return Err(BinError::InvalidCallCount(num_calls));
    }
    if datatype_size == 0 {
        return Err(BinError::InvalidDatatypeSize(datatype_size));
    }

    for record in counts {
        let (descriptor, values) = split_record(record)?;
        let n_ranks = notation::count(descriptor).map_err(|source| BinError::InvalidRankSet {
            descriptor: descriptor.to_string(),
            source,
        })?;
        if n_ranks == 0 {
            return Err(BinError::EmptyRankSet(descriptor.to_string()));
        }
        let weight = (num_calls as u64).saturating_mul(n_ranks);

        for token in values.split(' ').filter(|t| !t.is_empty()) {
            let count = token
                .parse::<i64>()
                .map_err(|source| BinError::InvalidCount {
                    token: token.to_string(),
                    source,
                })?;
            let val = i64::try_from(datatype_size)
                .ok()
                .and_then(|size| count.checked_mul(size))
                .ok_or(BinError::CountOverflow {
                    count,
                    datatype_size,
                })?;

            if !classify_value(bins, val, weight) {
                match mode {
                    ClassifyMode::Strict => return Err(BinError::Unclassified(val)),
                    ClassifyMode::Lenient => {
                        warn!(count, datatype_size, "Value {} matches no bin, dropping it", val);
                    }
                }
            }
        }

        debug!(
            ranks = n_ranks,
            weight, "Classified counts for rank set {}", descriptor
        );
    }

    Ok(())
}
