//! # Recap Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --transactions tx.json --from 2024-03-01                           │
//! │                                                                         │
//! │  2. Environment Variables (read through the same flags)                │
//! │     RECAP_TRANSACTIONS=tx.json  RECAP_FROM=2024-03-01                  │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, else                                              │
//! │     ~/.config/recap/recap.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.recap.recap/recap.toml (macOS)   │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     no entries, no country table, whole period, compact JSON           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # recap.toml
//! [input]
//! transactions = "exports/transactions.json"
//! entries = "exports/entries.json"
//! countries = "exports/countries.json"
//!
//! [period]
//! from = "2024-03-01"   # quoted: plain TOML dates are not accepted
//! to = "2024-03-31"
//!
//! [output]
//! pretty = true
//!
//! [validation]
//! strict = true
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use directories::ProjectDirs;
use recap_core::DateWindow;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::args::Args;
use crate::error::{CliError, CliResult};

// =============================================================================
// Sections
// =============================================================================

/// Where the parser output lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSettings {
    /// Required by the time the config is validated.
    #[serde(default)]
    pub transactions: Option<PathBuf>,

    /// Without entries the ledger counters stay empty.
    #[serde(default)]
    pub entries: Option<PathBuf>,

    /// Without a table countries are keyed by raw code.
    #[serde(default)]
    pub countries: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSettings {
    #[serde(default)]
    pub from: Option<NaiveDate>,

    #[serde(default)]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Reject the run on the first malformed record.
    #[serde(default)]
    pub strict: bool,
}

// =============================================================================
// Recap Config
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecapConfig {
    #[serde(default)]
    pub input: InputSettings,

    #[serde(default)]
    pub period: PeriodSettings,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub validation: ValidationSettings,
}

impl RecapConfig {
    /// Loads the config file, if any.
    ///
    /// An explicit `config_path` must exist; the platform default is
    /// optional and silently skipped when absent.
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        match config_path {
            Some(path) if !path.exists() => Err(CliError::ConfigNotFound(path)),
            Some(path) => Self::from_file(&path),
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                path => {
                    debug!(?path, "Config file not found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Lays command-line flags (and their env vars) over the file values.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(path) = &args.transactions {
            self.input.transactions = Some(path.clone());
        }
        if let Some(path) = &args.entries {
            self.input.entries = Some(path.clone());
        }
        if let Some(path) = &args.countries {
            self.input.countries = Some(path.clone());
        }
        if args.from.is_some() {
            self.period.from = args.from;
        }
        if args.to.is_some() {
            self.period.to = args.to;
        }
        if args.pretty {
            self.output.pretty = true;
        }
        if args.strict {
            self.validation.strict = true;
        }
    }

    /// Checks the merged configuration.
    pub fn validate(&self) -> CliResult<()> {
        if self.input.transactions.is_none() {
            return Err(CliError::InvalidConfig(
                "no transactions file (use --transactions or RECAP_TRANSACTIONS)".to_string(),
            ));
        }
        self.window()?;
        Ok(())
    }

    /// The configured period as a [`DateWindow`].
    pub fn window(&self) -> CliResult<DateWindow> {
        Ok(DateWindow::new(self.period.from, self.period.to)?)
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "recap", "recap").map(|dirs| dirs.config_dir().join("recap.toml"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
