//! Stream driver: feeds every batch of a count file through the classifier

use crate::bins::{self, Bin, ClassifyMode};
use crate::counts::{CompactReader, CountsSource};
use crate::error::{BinError, Result};
use crate::notation;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// Classify every batch from `source` into bins built from `thresholds`
///
/// The bins are created once and the same accumulator is threaded through
/// every batch. Reading stops at the clean end of the stream; any other read
/// error is returned as soon as it happens.
pub fn classify_stream<S: CountsSource>(
    source: &mut S,
    thresholds: &[i64],
    mode: ClassifyMode,
) -> Result<Vec<Bin>> {
    let mut bins = bins::create(thresholds)?;
    info!("Successfully initialized {} bins", bins.len());

    let mut batches = 0usize;
    while let Some(header) = source.next_header()? {
        let counters = source.next_counters()?;
        bins::classify_counts(
            &mut bins,
            &counters,
            header.num_calls(),
            header.datatype_size,
            mode,
        )?;

        batches += 1;
        debug!(
            batch = batches,
            calls = header.num_calls(),
            records = counters.len(),
            "Classified {} batch",
            header.collective
        );
    }

    info!("Classified {} batches", batches);
    Ok(bins)
}

/// Open a count file and classify all of its counts
pub fn classify_file(path: &Path, thresholds: &[i64], mode: ClassifyMode) -> Result<Vec<Bin>> {
    if path.as_os_str().is_empty() {
        return Err(BinError::UndefinedInput(notation::compress(thresholds)));
    }
    info!("Creating bins out of values from {}", path.display());

    let file = File::open(path).map_err(|source| BinError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = CompactReader::new(BufReader::new(file));
    classify_stream(&mut reader, thresholds, mode)
}
