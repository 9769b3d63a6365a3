//! # recap-core: Summary Aggregation for Recap
//!
//! This crate is the **heart** of Recap. It folds normalized marketplace
//! transactions (Shopify, ManoMano, Décathlon, Leroy Merlin) and their
//! generated ledger entries into a per-channel financial summary.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Recap Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Marketplace parsers (upstream, external)             │   │
//! │  │    exports ──► Transaction[] + Entry[] + country table          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ recap-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  summary  │  │   money   │  │  period   │  │ validation│  │   │
//! │  │   │ summarize │  │  round2   │  │DateWindow │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • PURE FUNCTIONS                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Summary (JSON, TS bindings)            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │      KPI cards • statistics tables • PDF reports (external)     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Transaction, Entry and the Summary contract
//! - [`summary`] - The aggregation engine
//! - [`money`] - Two-decimal and percent rounding
//! - [`country`] - Country code → display name lookup
//! - [`period`] - Date window filtering
//! - [`validation`] - Caller-side record checks
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, on the server and in the browser
//! 2. **No I/O**: file system and network access are FORBIDDEN here
//! 3. **Round Once**: accumulate raw, round at the boundary
//! 4. **Lazy Keys**: a channel appears in a map only if something qualified for it
//!
//! ## Example Usage
//!
//! ```rust
//! use recap_core::{summarize, CountryNames, Transaction};
//!
//! let refund: Transaction = serde_json::from_str(r#"{
//!     "reference": "MM-77", "channel": "manomano", "date": "2024-02-03",
//!     "type": "refund", "amount_ht": -24.08, "amount_tva": -4.82,
//!     "amount_ttc": -28.9, "tva_rate": 20, "country_code": "FR",
//!     "commission_ttc": 0, "special_type": "returns_avoir"
//! }"#).unwrap();
//!
//! let summary = summarize(&[refund], &[], &CountryNames::new());
//!
//! assert_eq!(summary.revenue("manomano").ttc, 0.0);
//! assert_eq!(summary.remboursements_par_canal["manomano"].ttc, 28.9);
//! assert_eq!(summary.net_vendeur_par_canal["manomano"], -28.9);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod country;
pub mod error;
pub mod money;
pub mod period;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use country::CountryNames;
pub use error::{CoreError, CoreResult, ValidationError};
pub use period::{summarize_window, DateWindow};
pub use summary::summarize;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a channel key.
pub const MAX_CHANNEL_LEN: usize = 50;
