//! # Period Filter
//!
//! Narrows transactions and entries to a date window before summarizing.
//!
//! ## User Workflow
//! ```text
//! Dashboard loaded (full dataset, server-side Summary)
//!      │
//!      ▼
//! User picks "March 2024"
//!      │
//!      ▼
//! filter_transactions / filter_entries  ← THIS MODULE
//!      │
//!      ▼
//! summarize(filtered, filtered, same country table)
//!      │
//!      ▼
//! KPI cards re-render (last result wins, owned by the caller)
//! ```
//!
//! The engine never looks at dates; windowing lives here so every caller
//! slices the same way.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::country::CountryNames;
use crate::error::{CoreError, CoreResult};
use crate::summary::summarize;
use crate::types::{Entry, Summary, Transaction};

/// Inclusive date range. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct DateWindow {
    #[ts(as = "Option<String>")]
    from: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    to: Option<NaiveDate>,
}

impl DateWindow {
    /// Creates a window, rejecting `from > to`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use recap_core::period::DateWindow;
    ///
    /// let march = DateWindow::new(
    ///     NaiveDate::from_ymd_opt(2024, 3, 1),
    ///     NaiveDate::from_ymd_opt(2024, 3, 31),
    /// ).unwrap();
    /// assert!(march.contains(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
    ///
    /// assert!(DateWindow::new(
    ///     NaiveDate::from_ymd_opt(2024, 4, 1),
    ///     NaiveDate::from_ymd_opt(2024, 3, 1),
    /// ).is_err());
    /// ```
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> CoreResult<Self> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(CoreError::InvalidWindow { from, to });
            }
        }
        Ok(DateWindow { from, to })
    }

    /// The window that keeps everything.
    pub const fn unbounded() -> Self {
        DateWindow { from: None, to: None }
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

impl<'de> Deserialize<'de> for DateWindow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Bounds {
            #[serde(default)]
            from: Option<NaiveDate>,
            #[serde(default)]
            to: Option<NaiveDate>,
        }

        let bounds = Bounds::deserialize(deserializer)?;
        DateWindow::new(bounds.from, bounds.to).map_err(serde::de::Error::custom)
    }
}

/// Transactions dated inside `window`, in their original order.
pub fn filter_transactions(transactions: &[Transaction], window: &DateWindow) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| window.contains(tx.date))
        .cloned()
        .collect()
}

/// Entries dated inside `window`, in their original order.
pub fn filter_entries(entries: &[Entry], window: &DateWindow) -> Vec<Entry> {
    entries
        .iter()
        .filter(|entry| window.contains(entry.date))
        .cloned()
        .collect()
}

/// Filters both slices to `window`, then summarizes.
pub fn summarize_window(
    transactions: &[Transaction],
    entries: &[Entry],
    countries: &CountryNames,
    window: &DateWindow,
) -> Summary {
    if window.is_unbounded() {
        return summarize(transactions, entries, countries);
    }
    let transactions = filter_transactions(transactions, window);
    let entries = filter_entries(entries, window);
    summarize(&transactions, &entries, countries)
}
