//! # recap-cli
//!
//! Reads parser output from disk, runs the aggregation engine and prints
//! the summary as JSON.
//!
//! ```text
//! flags / RECAP_* / recap.toml ──► RecapConfig
//!                                      │
//!      tx.json, entries.json, ──► load ┴──► summarize_window ──► stdout
//!      countries.json
//! ```

pub mod args;
pub mod config;
pub mod error;
pub mod load;

pub use args::Args;
pub use config::RecapConfig;
pub use error::{CliError, CliResult};
pub use load::{render, run};
