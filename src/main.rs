use anyhow::{Context, Result};
use binnacle::{
    bins,
    cli::{Cli, OutputFormat},
    config::BinConfig,
    driver,
    summary::BinSummary,
    writer::{self, Scope},
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Merge the config file (if any) with command-line overrides
fn resolve_config(args: &Cli) -> Result<BinConfig> {
    let mut config = match &args.config {
        Some(path) => BinConfig::from_file(path)?,
        None => BinConfig::default(),
    };

    if let Some(descr) = &args.thresholds {
        config.thresholds = bins::parse_thresholds(descr)?;
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = Some(dir.clone());
    }
    config.strict |= args.strict;

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = resolve_config(&args)?;
    let scope = Scope::new(args.job, args.comm, args.rank);
    let output_dir = config.output_dir();

    if !args.force && writer::files_exist(output_dir, scope, &config.thresholds) {
        eprintln!(
            "Bins for job {} comm {} rank {} already exist, skipping (use --force to recompute)",
            scope.job, scope.comm, scope.rank
        );
        return Ok(());
    }

    let bins = driver::classify_file(&args.input, &config.thresholds, config.mode())
        .with_context(|| format!("failed to classify counts from {}", args.input.display()))?;
    writer::save(output_dir, scope, &bins)?;

    let summary = BinSummary::new(scope, &bins);
    match args.format {
        OutputFormat::Text => print!("{}", summary.to_text()),
        OutputFormat::Json => println!("{}", summary.to_json()?),
        OutputFormat::Quiet => {}
    }

    Ok(())
}
