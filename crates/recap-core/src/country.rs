//! Country display names.
//!
//! The backend returns its code → name table alongside the first summary;
//! clients pass the same table back on every recomputation so both sides key
//! geography by identical strings.

use std::collections::HashMap;

/// Caller-supplied country code → display name table.
pub type CountryNames = HashMap<String, String>;

/// Returns the display name for `code`, or `code` itself when the table has
/// no entry. Codes are looked up verbatim: normalizing case is the caller's job.
///
/// ```rust
/// use recap_core::country::{resolve, CountryNames};
///
/// let table = CountryNames::from([("BE".to_string(), "Belgique".to_string())]);
/// assert_eq!(resolve("BE", &table), "Belgique");
/// assert_eq!(resolve("be", &table), "be");
/// ```
pub fn resolve<'a>(code: &'a str, table: &'a CountryNames) -> &'a str {
    table.get(code).map_or(code, String::as_str)
}
