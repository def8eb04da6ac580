//! Compressed integer-list notation used for rank sets and call lists
//!
//! Count files never spell out every rank that shares a count vector. Instead
//! they write a compact list of ranges: `"0-3, 5, 7-9"` stands for
//! `[0, 1, 2, 3, 5, 7, 8, 9]`. Call identifiers in record headers use the same
//! notation.

use thiserror::Error;

/// Errors produced while expanding a compressed list
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid list element '{token}': {source}")]
    InvalidNumber {
        token: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("invalid range '{0}': start is greater than end")]
    ReversedRange(String),

    #[error("list '{0}' holds more than {MAX_EXPANDED} elements")]
    TooLarge(String),
}

/// Largest list [`expand`] will materialize
pub const MAX_EXPANDED: u64 = 1 << 24;

/// Result type for notation operations
pub type Result<T> = std::result::Result<T, NotationError>;

fn parse_element(token: &str) -> Result<i64> {
    token
        .trim()
        .parse::<i64>()
        .map_err(|source| NotationError::InvalidNumber {
            token: token.trim().to_string(),
            source,
        })
}

/// Parse one list element: either `"n"` or an inclusive range `"a-b"`
fn parse_token(token: &str) -> Result<(i64, i64)> {
    match token.split_once('-') {
        Some((start, end)) if !start.trim().is_empty() => {
            let start = parse_element(start)?;
            let end = parse_element(end)?;
            if start > end {
                return Err(NotationError::ReversedRange(token.trim().to_string()));
            }
            Ok((start, end))
        }
        _ => {
            let value = parse_element(token)?;
            Ok((value, value))
        }
    }
}

/// Number of values `"a-b"` covers, `None` past `u64`
fn span(start: i64, end: i64) -> Option<u64> {
    u64::try_from(i128::from(end) - i128::from(start) + 1).ok()
}

/// Number of elements a compressed list stands for, without expanding it
///
/// `count("0-3,5")` is 5. A blank descriptor counts as zero.
pub fn count(descriptor: &str) -> Result<u64> {
    if descriptor.trim().is_empty() {
        return Ok(0);
    }

    descriptor.split(',').try_fold(0u64, |total, token| {
        let (start, end) = parse_token(token)?;
        span(start, end)
            .and_then(|n| total.checked_add(n))
            .ok_or_else(|| NotationError::TooLarge(descriptor.trim().to_string()))
    })
}

/// Expand a compressed list such as `"0-3,5"` into `[0, 1, 2, 3, 5]`
///
/// Elements keep their written order. A blank descriptor expands to an empty
/// list; deciding whether that is acceptable is left to the caller. Lists
/// longer than [`MAX_EXPANDED`] are rejected before anything is allocated.
pub fn expand(descriptor: &str) -> Result<Vec<i64>> {
    if count(descriptor)? > MAX_EXPANDED {
        return Err(NotationError::TooLarge(descriptor.trim().to_string()));
    }

    let mut values = Vec::new();
    if descriptor.trim().is_empty() {
        return Ok(values);
    }

    for token in descriptor.split(',') {
        let (start, end) = parse_token(token)?;
        values.extend(start..=end);
    }

    Ok(values)
}

/// Collapse a list of integers into compressed notation
///
/// The input is sorted and deduplicated first, so `[5, 0, 1, 2, 3]` becomes
/// `"0-3,5"`.
pub fn compress(values: &[i64]) -> String {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut parts = Vec::new();
    let mut iter = sorted.into_iter();
    let Some(mut start) = iter.next() else {
        return String::new();
    };
    let mut end = start;

    for value in iter {
        if value == end + 1 {
            end = value;
            continue;
        }
        parts.push(format_run(start, end));
        start = value;
        end = value;
    }
    parts.push(format_run(start, end));

    parts.join(",")
}

fn format_run(start: i64, end: i64) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{}-{}", start, end)
    }
}
