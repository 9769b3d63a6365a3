//! # Recap CLI
//!
//! Summarizes a period of marketplace transactions.
//!
//! ## Usage
//! ```text
//! recap --transactions tx.json --entries entries.json \
//!       --countries countries.json --from 2024-03-01 --to 2024-03-31 --pretty
//! ```
//!
//! The summary goes to stdout; logs go to stderr.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use recap_cli::{render, run, Args, RecapConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    let mut config = RecapConfig::load(args.config.clone()).context("Failed to load config")?;
    config.apply_args(&args);
    config.validate()?;

    info!(
        transactions = ?config.input.transactions,
        strict = config.validation.strict,
        "Configuration loaded"
    );

    let summary = run(&config).context("Failed to summarize transactions")?;
    println!("{}", render(&summary, config.output.pretty)?);

    Ok(())
}

/// Initialize logging; RUST_LOG overrides the default filter.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,recap=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
