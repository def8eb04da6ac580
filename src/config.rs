//! Configuration file support
//!
//! Thresholds and output settings can be kept in a TOML file instead of being
//! repeated on every invocation:
//!
//! ```toml
//! thresholds = [1024, 65536, 1048576]
//! output_dir = "bins"
//! strict = false
//! ```

use crate::bins::ClassifyMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Thresholds used when neither the command line nor a config file sets any
pub const DEFAULT_THRESHOLDS: [i64; 3] = [1024, 65536, 1048576];

/// Errors that can occur while loading a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for one binning run
///
/// # Example
/// ```
/// use binnacle::config::BinConfig;
///
/// let config = BinConfig::default();
/// assert_eq!(config.thresholds, vec![1024, 65536, 1048576]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BinConfig {
    /// Bin edges in bytes, strictly increasing
    pub thresholds: Vec<i64>,

    /// Directory receiving the bin files (current directory when unset)
    pub output_dir: Option<PathBuf>,

    /// Fail on values that match no bin instead of dropping them
    pub strict: bool,
}

impl Default for BinConfig {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            output_dir: None,
            strict: false,
        }
    }
}

impl BinConfig {
    /// Load and validate a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Classification mode implied by `strict`
    pub fn mode(&self) -> ClassifyMode {
        if self.strict {
            ClassifyMode::Strict
        } else {
            ClassifyMode::Lenient
        }
    }

    /// Output directory, empty when bins go to the current directory
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(Path::new(""))
    }

    /// Check that the thresholds describe a proper partition
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thresholds.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one threshold is required".to_string(),
            ));
        }

        if let Some(&first) = self.thresholds.first() {
            if first <= 0 {
                return Err(ConfigError::Invalid(format!(
                    "thresholds must be positive, got {}",
                    first
                )));
            }
        }

        if let Some(pair) = self.thresholds.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ConfigError::Invalid(format!(
                "thresholds must be strictly increasing, got {} then {}",
                pair[0], pair[1]
            )));
        }

        Ok(())
    }
}
