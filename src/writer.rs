//! Per-bin output files
//!
//! Each bin of a (job, communicator, rank) scope is saved to its own file:
//!
//! ```text
//! bin.job3.comm1.rank2_100-1000.txt   bounded bin [100, 1000)
//! bin.job3.comm1.rank2_1000+.txt      open-ended bin [1000, inf)
//! ```
//!
//! The file holds the bin's occurrence total followed by a newline.

use crate::bins::{self, Bin};
use crate::error::{BinError, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Identifies the unit of work a set of bins belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub job: u64,
    pub comm: u64,
    pub rank: u64,
}

impl Scope {
    pub fn new(job: u64, comm: u64, rank: u64) -> Self {
        Self { job, comm, rank }
    }

    /// File name for `bin` within this scope
    pub fn file_name(&self, bin: &Bin) -> String {
        format!(
            "bin.job{}.comm{}.rank{}_{}.txt",
            self.job,
            self.comm,
            self.rank,
            bin.label()
        )
    }
}

/// Path of the file holding `bin`; an empty `dir` means the current directory
pub fn output_path(dir: &Path, scope: Scope, bin: &Bin) -> PathBuf {
    let name = scope.file_name(bin);
    if dir.as_os_str().is_empty() {
        PathBuf::from(name)
    } else {
        dir.join(name)
    }
}

/// Write one file per bin, truncating any existing file
///
/// Files written before a failure are left in place.
pub fn save(dir: &Path, scope: Scope, bins: &[Bin]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(bins.len());

    for bin in bins {
        let path = output_path(dir, scope, bin);
        let write = |path: &Path| -> std::io::Result<()> {
            let mut file = File::create(path)?;
            writeln!(file, "{}", bin.size)?;
            file.flush()
        };
        write(&path).map_err(|source| BinError::Write {
            path: path.clone(),
            source,
        })?;

        info!("{} successfully created", path.display());
        written.push(path);
    }

    Ok(written)
}

/// Whether every bin file for `thresholds` already exists under `dir`
///
/// Only presence is checked, not content or freshness.
pub fn files_exist(dir: &Path, scope: Scope, thresholds: &[i64]) -> bool {
    match bins::create(thresholds) {
        Ok(bins) => bins
            .iter()
            .all(|bin| output_path(dir, scope, bin).exists()),
        Err(_) => false,
    }
}
