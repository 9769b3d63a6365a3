//! Loading parser output and running the engine.

use std::path::Path;

use recap_core::validation::{validate_entry, validate_transaction};
use recap_core::{summarize_window, CountryNames, CoreResult, Entry, Summary, Transaction};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::RecapConfig;
use crate::error::{CliError, CliResult};

/// Reads and deserializes a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn check_all<T>(
    path: &Path,
    records: &[T],
    check: impl Fn(&T) -> CoreResult<()>,
) -> CliResult<()> {
    for (index, record) in records.iter().enumerate() {
        check(record).map_err(|source| CliError::InvalidRecord {
            path: path.to_path_buf(),
            index,
            source,
        })?;
    }
    Ok(())
}

pub fn load_transactions(path: &Path, strict: bool) -> CliResult<Vec<Transaction>> {
    let transactions: Vec<Transaction> = read_json(path)?;
    if strict {
        check_all(path, &transactions, validate_transaction)?;
    }
    debug!(?path, count = transactions.len(), "Loaded transactions");
    Ok(transactions)
}

pub fn load_entries(path: &Path, strict: bool) -> CliResult<Vec<Entry>> {
    let entries: Vec<Entry> = read_json(path)?;
    if strict {
        check_all(path, &entries, validate_entry)?;
    }
    debug!(?path, count = entries.len(), "Loaded entries");
    Ok(entries)
}

pub fn load_countries(path: &Path) -> CliResult<CountryNames> {
    read_json(path)
}

/// Loads every configured input and summarizes the configured period.
pub fn run(config: &RecapConfig) -> CliResult<Summary> {
    config.validate()?;
    let strict = config.validation.strict;

    let transactions = match &config.input.transactions {
        Some(path) => load_transactions(path, strict)?,
        None => Vec::new(),
    };
    let entries = match &config.input.entries {
        Some(path) => load_entries(path, strict)?,
        None => Vec::new(),
    };
    let countries = match &config.input.countries {
        Some(path) => load_countries(path)?,
        None => CountryNames::new(),
    };

    let window = config.window()?;
    let summary = summarize_window(&transactions, &entries, &countries, &window);

    info!(
        transactions = transactions.len(),
        entries = entries.len(),
        from = ?window.from(),
        to = ?window.to(),
        channels = summary.channels().len(),
        "Summary ready"
    );

    Ok(summary)
}

/// Serializes the summary for stdout.
pub fn render(summary: &Summary, pretty: bool) -> CliResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(summary)?
    } else {
        serde_json::to_string(summary)?
    };
    Ok(json)
}
