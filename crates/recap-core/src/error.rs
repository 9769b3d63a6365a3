//! # Error Types
//!
//! Domain-specific error types for recap-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  recap-core errors (this file)                                         │
//! │  ├── CoreError        - Period windows, rejected records               │
//! │  └── ValidationError  - Field-level shape failures                     │
//! │                                                                         │
//! │  recap-cli errors (separate crate)                                     │
//! │  └── CliError         - File, JSON and config failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → exit code              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The summary engine itself has no error path: [`crate::summary::summarize`]
//! is total over well-typed input and returns a `Summary`, never a `Result`.

use chrono::NaiveDate;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised around the engine (never by it).
#[derive(Debug, Error)]
pub enum CoreError {
    /// A period window whose start is after its end.
    ///
    /// ## When This Occurs
    /// - The user picks `from = 2024-03-31`, `to = 2024-03-01` in the period filter
    #[error("Invalid period: {from} is after {to}")]
    InvalidWindow { from: NaiveDate, to: NaiveDate },

    /// A transaction failed caller-side validation.
    #[error("Transaction {reference} ({channel}) rejected: {source}")]
    InvalidTransaction {
        reference: String,
        channel: String,
        #[source]
        source: ValidationError,
    },

    /// A ledger entry failed caller-side validation.
    #[error("Entry {piece} rejected: {source}")]
    InvalidEntry {
        piece: String,
        #[source]
        source: ValidationError,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Amount is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Invalid format (e.g. a channel key with spaces).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
