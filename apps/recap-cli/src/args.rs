//! Command-line arguments.
//!
//! Every flag can also come from a `RECAP_*` environment variable; flags win
//! over the environment, and both win over `recap.toml`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

#[derive(Debug, Default, Parser)]
#[command(name = "recap")]
#[command(about = "Summarize marketplace transactions into per-channel KPIs", long_about = None)]
pub struct Args {
    /// JSON array of normalized transactions.
    #[arg(long, short = 't', env = "RECAP_TRANSACTIONS")]
    pub transactions: Option<PathBuf>,

    /// JSON array of generated ledger entries.
    #[arg(long, short = 'e', env = "RECAP_ENTRIES")]
    pub entries: Option<PathBuf>,

    /// JSON object mapping country codes to display names.
    #[arg(long, short = 'c', env = "RECAP_COUNTRIES")]
    pub countries: Option<PathBuf>,

    /// First day of the period (YYYY-MM-DD, inclusive).
    #[arg(long, env = "RECAP_FROM")]
    pub from: Option<NaiveDate>,

    /// Last day of the period (YYYY-MM-DD, inclusive).
    #[arg(long, env = "RECAP_TO")]
    pub to: Option<NaiveDate>,

    /// Pretty-print the JSON summary.
    #[arg(long, env = "RECAP_PRETTY")]
    pub pretty: bool,

    /// Validate every record before summarizing.
    #[arg(long, env = "RECAP_STRICT")]
    pub strict: bool,

    /// Config file (defaults to the platform config dir).
    #[arg(long, env = "RECAP_CONFIG")]
    pub config: Option<PathBuf>,
}
