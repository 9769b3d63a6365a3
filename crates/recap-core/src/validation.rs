//! # Validation Module
//!
//! Record shape checks for callers of the summary engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Marketplace parsers                                          │
//! │  ├── Column mapping, sign conventions                                  │
//! │  └── Produce Transaction / Entry                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Caller (CLI --strict, backend)                               │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: field-level shape checks                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: summarize()                                                  │
//! │  └── NO checks: NaN in, NaN out, so upstream bugs stay visible         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use recap_core::validation::{validate_channel, validate_tva_rate};
//!
//! validate_channel("leroy_merlin").unwrap();
//! validate_tva_rate(5.5).unwrap();
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Entry, Transaction};
use crate::MAX_CHANNEL_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a channel key.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Lowercase ASCII letters, digits, `_` and `-` only
///
/// ## Example
/// ```rust
/// use recap_core::validation::validate_channel;
///
/// assert!(validate_channel("manomano").is_ok());
/// assert!(validate_channel("Leroy Merlin").is_err());
/// assert!(validate_channel("").is_err());
/// ```
pub fn validate_channel(channel: &str) -> ValidationResult<()> {
    if channel.is_empty() {
        return Err(ValidationError::Required {
            field: "channel".to_string(),
        });
    }

    if channel.len() > MAX_CHANNEL_LEN {
        return Err(ValidationError::TooLong {
            field: "channel".to_string(),
            max: MAX_CHANNEL_LEN,
        });
    }

    if !channel
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "channel".to_string(),
            reason: "must contain only lowercase letters, digits, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates an order / transaction reference (must not be blank).
pub fn validate_reference(reference: &str) -> ValidationResult<()> {
    if reference.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "reference".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates that an amount is a finite number. Sign is not checked: refunds
/// arrive negative from some marketplaces and positive from others.
pub fn validate_amount(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a VAT rate in percent.
///
/// ## Rules
/// - Finite
/// - Between 0 and 100
///
/// ## Example
/// ```rust
/// use recap_core::validation::validate_tva_rate;
///
/// assert!(validate_tva_rate(20.0).is_ok());
/// assert!(validate_tva_rate(0.0).is_ok());
/// assert!(validate_tva_rate(-5.5).is_err());
/// ```
pub fn validate_tva_rate(rate: f64) -> ValidationResult<()> {
    validate_amount("tva_rate", rate)?;

    if !(0.0..=100.0).contains(&rate) {
        return Err(ValidationError::OutOfRange {
            field: "tva_rate".to_string(),
            min: 0.0,
            max: 100.0,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

fn check_transaction(tx: &Transaction) -> ValidationResult<()> {
    validate_reference(&tx.reference)?;
    validate_channel(&tx.channel)?;
    validate_tva_rate(tx.tva_rate)?;

    let amounts = [
        ("amount_ht", tx.amount_ht),
        ("amount_tva", tx.amount_tva),
        ("amount_ttc", tx.amount_ttc),
        ("shipping_ht", tx.shipping_ht),
        ("shipping_tva", tx.shipping_tva),
        ("commission_ttc", tx.commission_ttc),
    ];
    for (field, value) in amounts {
        validate_amount(field, value)?;
    }
    if let Some(ht) = tx.commission_ht {
        validate_amount("commission_ht", ht)?;
    }

    Ok(())
}

/// Validates every field of a transaction, naming the record on failure.
pub fn validate_transaction(tx: &Transaction) -> CoreResult<()> {
    check_transaction(tx).map_err(|source| CoreError::InvalidTransaction {
        reference: tx.reference.clone(),
        channel: tx.channel.clone(),
        source,
    })
}

/// Validates a ledger entry.
pub fn validate_entry(entry: &Entry) -> CoreResult<()> {
    let check = || -> ValidationResult<()> {
        validate_channel(&entry.channel)?;
        validate_amount("debit", entry.debit)?;
        validate_amount("credit", entry.credit)?;
        if entry.entry_type.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "entry_type".to_string(),
            });
        }
        Ok(())
    };

    check().map_err(|source| CoreError::InvalidEntry {
        piece: entry.piece.clone(),
        source,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
