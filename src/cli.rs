//! CLI argument parsing for Binnacle

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the bin summary printed after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// Print nothing
    #[value(name = "none")]
    Quiet,
}

#[derive(Parser, Debug)]
#[command(name = "binnacle")]
#[command(version)]
#[command(about = "Classify collective message-size counts into bins", long_about = None)]
pub struct Cli {
    /// Count file to classify
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Comma-separated bin thresholds in bytes (e.g. 1024,65536,1048576)
    #[arg(short, long, value_name = "LIST")]
    pub thresholds: Option<String>,

    /// TOML configuration file (command-line flags take precedence)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory receiving the bin files (default: current directory)
    #[arg(short, long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Job identifier used in output file names
    #[arg(long, default_value = "0")]
    pub job: u64,

    /// Communicator identifier used in output file names
    #[arg(long, default_value = "0")]
    pub comm: u64,

    /// Rank identifier used in output file names
    #[arg(long, default_value = "0")]
    pub rank: u64,

    /// Fail on counts that match no bin instead of dropping them
    #[arg(long)]
    pub strict: bool,

    /// Recompute even when every bin file already exists
    #[arg(short, long)]
    pub force: bool,

    /// Summary output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing output (to stderr)
    #[arg(long)]
    pub debug: bool,
}
