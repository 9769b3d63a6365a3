//! # Money Module
//!
//! Numeric normalization for currency amounts and percentages.
//!
//! ## Why Floats Here?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ONE ALGORITHM, TWO RUNTIMES                                            │
//! │                                                                         │
//! │  Server:  Rust summarize(transactions, entries, countries)              │
//! │  Browser: the same algorithm re-run on every period change             │
//! │                                                                         │
//! │  The browser side works on IEEE-754 doubles. To produce the SAME        │
//! │  digits we accumulate in f64 too, and round with the browser's          │
//! │  convention (half-up, ties toward +∞):                                  │
//! │                                                                         │
//! │    round2(2.675)  = 2.67   (2.675 * 100 = 267.49999999999997)           │
//! │    round2(-1.005) = -1.0                                                │
//! │    round2(0.125)  = 0.13                                                │
//! │                                                                         │
//! │  Rounding happens ONCE per accumulator, after the loop:                 │
//! │    round2(0.333 + 0.333 + 0.333) = 1.00                                 │
//! │    round2(0.333) * 3             = 0.99   ❌ drifts                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use recap_core::money::{round2, round_percent};
//!
//! assert_eq!(round2(120.0 - 5.0 - 36.0), 79.0);
//! assert_eq!(round_percent(1.0 / 3.0), 33.3);
//! ```

// =============================================================================
// Rounding Primitives
// =============================================================================

/// Rounds to the nearest integer, ties toward positive infinity.
///
/// `f64::round` rounds ties away from zero, which disagrees with the browser
/// for negative ties (`-2.5` → `-3` instead of `-2`). NaN and infinities pass
/// through unchanged.
#[inline]
pub fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Rounds a currency amount to two decimals: `round(x * 100) / 100`.
///
/// ## Example
/// ```rust
/// use recap_core::money::round2;
///
/// assert_eq!(round2(28.899999999999995), 28.9);
/// assert_eq!(round2(10.125), 10.13);
/// assert_eq!(round2(-0.001), 0.0);
/// ```
///
/// ## Where It Is Applied
/// ```text
/// accumulate raw f64 over every transaction ──► round2 once ──► Summary
///                                                     │
///                 derived value (ttc − comm − refund) ┴──► round2 again
/// ```
#[inline]
pub fn round2(x: f64) -> f64 {
    // adding +0.0 turns a -0.0 result into 0.0, which is what JSON shows
    round_half_up(x * 100.0) / 100.0 + 0.0
}

/// Turns a ratio into a one-decimal percentage: `round(x * 1000) / 10`.
///
/// ## Example
/// ```rust
/// use recap_core::money::round_percent;
///
/// assert_eq!(round_percent(1.0), 100.0);
/// assert_eq!(round_percent(0.12345), 12.3);
/// ```
#[inline]
pub fn round_percent(ratio: f64) -> f64 {
    round_half_up(ratio * 1000.0) / 10.0 + 0.0
}

/// `part / whole` as a one-decimal percentage, `0` when `whole` is zero.
#[inline]
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        round_percent(part / whole)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
