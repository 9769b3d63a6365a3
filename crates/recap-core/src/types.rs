//! # Domain Types
//!
//! Input records produced by the marketplace parsers, and the `Summary`
//! contract read by dashboards, statistics tables and PDF reports.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUT                                  OUTPUT                          │
//! │  ┌─────────────────┐                    ┌──────────────────────────┐    │
//! │  │  Transaction    │  one per sale /    │  Summary                 │    │
//! │  │  ─────────────  │  refund            │  ──────────────────────  │    │
//! │  │  channel        │                    │  transactions_par_canal  │    │
//! │  │  type           │──┐                 │  ca_par_canal            │    │
//! │  │  amount_*       │  │                 │  remboursements_par_canal│    │
//! │  │  special_type   │  │  summarize()    │  commissions_par_canal   │    │
//! │  └─────────────────┘  ├───────────────► │  net_vendeur_par_canal   │    │
//! │  ┌─────────────────┐  │                 │  repartition_geo_*       │    │
//! │  │  Entry          │──┘                 │  tva_par_pays_par_canal  │    │
//! │  │  one per ledger │                    │  ...                     │    │
//! │  │  line           │                    └──────────────────────────┘    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stable Key Names
//! Every serialized key of [`Summary`] is read by name in the browser. The
//! French names are the contract; renaming one breaks every consumer at once.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::money::{percent_of, round2};

/// `special_type` tag of a refund booked as a credit note.
pub const RETURNS_AVOIR: &str = "returns_avoir";

// =============================================================================
// Transaction Type
// =============================================================================

/// Economic direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Sale,
    Refund,
}

// =============================================================================
// Special Class
// =============================================================================

/// How a transaction's `special_type` tag affects the financial totals.
///
/// ```text
/// special_type       │ revenue / geo / VAT │ refunds │ commissions
/// ───────────────────┼─────────────────────┼─────────┼────────────
/// null               │ yes (sales)         │ yes     │ yes
/// "returns_avoir"    │ no                  │ yes     │ yes
/// anything else      │ no                  │ no      │ no
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialClass {
    /// No tag: an ordinary sale or refund.
    Ordinary,
    /// A refund booked as a credit note.
    ReturnsAvoir,
    /// Structural or diagnostic row (orphan settlement, payout line, ...).
    Structural,
}

// =============================================================================
// Transaction
// =============================================================================

/// One normalized economic event from a marketplace export.
///
/// `reference` is only unique within its `channel`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    /// Order or transaction id.
    pub reference: String,

    /// Channel key, e.g. "shopify", "manomano".
    pub channel: String,

    #[ts(as = "String")]
    pub date: NaiveDate,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Product amount before tax.
    pub amount_ht: f64,

    /// Product VAT.
    pub amount_tva: f64,

    /// Total paid, tax included.
    pub amount_ttc: f64,

    #[serde(default)]
    pub shipping_ht: f64,

    #[serde(default)]
    pub shipping_tva: f64,

    /// VAT rate in percent (20 = 20%).
    pub tva_rate: f64,

    /// Raw country code, resolved to a display name by the caller's table.
    #[serde(default)]
    pub country_code: String,

    #[serde(default)]
    pub commission_ttc: f64,

    /// Some channels never report a pre-tax commission.
    #[serde(default)]
    pub commission_ht: Option<f64>,

    #[serde(default)]
    pub special_type: Option<String>,
}

impl Transaction {
    /// Classifies the `special_type` tag.
    pub fn special_class(&self) -> SpecialClass {
        match self.special_type.as_deref() {
            None => SpecialClass::Ordinary,
            Some(RETURNS_AVOIR) => SpecialClass::ReturnsAvoir,
            Some(_) => SpecialClass::Structural,
        }
    }

    #[inline]
    pub fn is_sale(&self) -> bool {
        self.kind == TransactionType::Sale
    }
}

// =============================================================================
// Entry
// =============================================================================

/// One generated ledger line. A transaction usually yields several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Entry {
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Journal code (e.g. "VE" for sales).
    pub journal: String,

    pub account: String,
    pub label: String,
    pub debit: f64,
    pub credit: f64,

    /// Voucher id.
    pub piece: String,

    /// Reconciliation tag linking a sale line to its settlement line.
    #[serde(default)]
    pub lettrage: Option<String>,

    pub channel: String,

    /// Kind of line ("sale", "commission", "payout", ...), counted as-is.
    pub entry_type: String,
}

// =============================================================================
// Summary Building Blocks
// =============================================================================

/// Raw ledger totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totaux {
    pub debit: f64,
    pub credit: f64,
}

/// A pre-tax / tax-included pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MontantHtTtc {
    pub ht: f64,
    pub ttc: f64,
}

/// Refund totals for a channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Remboursements {
    pub count: u32,
    pub ht: f64,
    pub ttc: f64,
}

/// Pre-tax revenue split into products and shipping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Ventilation {
    pub produits_ht: f64,
    pub port_ht: f64,
    pub total_ht: f64,
}

/// Sales statistics for one country.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GeoStats {
    pub count: u32,
    pub ca_ttc: f64,
    pub ca_ht: f64,
}

/// VAT collected at one rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TvaMontant {
    pub taux: f64,
    pub montant: f64,
}

// =============================================================================
// Ranked Map
// =============================================================================

/// String-keyed map that keeps its entries in a caller-defined order and
/// serializes as a JSON object in that order.
///
/// Used where key order carries meaning, e.g. countries ranked by revenue.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMap<V>(Vec<(String, V)>);

impl<V> RankedMap<V> {
    /// Wraps entries already in their final order.
    pub fn from_ordered(entries: Vec<(String, V)>) -> Self {
        RankedMap(entries)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for RankedMap<V> {
    fn default() -> Self {
        RankedMap(Vec::new())
    }
}

impl<V: Serialize> Serialize for RankedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for RankedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RankedVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for RankedVisitor<V> {
            type Value = RankedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by name")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(RankedMap(entries))
            }
        }

        deserializer.deserialize_map(RankedVisitor(PhantomData))
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Per-channel financial summary.
///
/// A channel with no qualifying transaction for a given map is absent from
/// that map, so key sets differ between fields: a refund-only channel shows
/// up in `remboursements_par_canal` but not in `ca_par_canal`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Summary {
    /// Every transaction, whatever its `special_type`.
    pub transactions_par_canal: BTreeMap<String, u32>,

    pub ecritures_par_type: BTreeMap<String, u32>,

    pub totaux: Totaux,

    /// Ordinary sales only.
    pub ca_par_canal: BTreeMap<String, MontantHtTtc>,

    /// Ordinary refunds and credit notes.
    pub remboursements_par_canal: BTreeMap<String, Remboursements>,

    /// Refund count ÷ sale count, in percent with one decimal.
    pub taux_remboursement_par_canal: BTreeMap<String, f64>,

    pub commissions_par_canal: BTreeMap<String, MontantHtTtc>,

    /// Revenue TTC − commissions TTC − refunds TTC.
    pub net_vendeur_par_canal: BTreeMap<String, f64>,

    pub tva_collectee_par_canal: BTreeMap<String, f64>,

    pub ventilation_ca_par_canal: BTreeMap<String, Ventilation>,

    /// Countries ranked by descending `ca_ttc`.
    #[ts(as = "std::collections::HashMap<String, GeoStats>")]
    pub repartition_geo_globale: RankedMap<GeoStats>,

    pub repartition_geo_par_canal: BTreeMap<String, BTreeMap<String, GeoStats>>,

    /// Per channel, per country, rates in descending order.
    pub tva_par_pays_par_canal: BTreeMap<String, BTreeMap<String, Vec<TvaMontant>>>,
}

impl Summary {
    /// Revenue of a channel, zero when it had no ordinary sale.
    pub fn revenue(&self, channel: &str) -> MontantHtTtc {
        self.ca_par_canal.get(channel).copied().unwrap_or_default()
    }

    /// Refunds of a channel, zero when it had none.
    pub fn refunds(&self, channel: &str) -> Remboursements {
        self.remboursements_par_canal
            .get(channel)
            .copied()
            .unwrap_or_default()
    }

    /// Commission TTC as a share of revenue TTC, in percent with one decimal.
    ///
    /// ## Example
    /// ```rust
    /// use recap_core::{MontantHtTtc, Summary};
    ///
    /// let mut summary = Summary::default();
    /// summary.ca_par_canal.insert("manomano".into(), MontantHtTtc { ht: 100.0, ttc: 120.0 });
    /// summary
    ///     .commissions_par_canal
    ///     .insert("manomano".into(), MontantHtTtc { ht: 15.0, ttc: 18.0 });
    ///
    /// assert_eq!(summary.commission_rate("manomano"), 15.0);
    /// assert_eq!(summary.commission_rate("shopify"), 0.0);
    /// ```
    pub fn commission_rate(&self, channel: &str) -> f64 {
        let commission = self
            .commissions_par_canal
            .get(channel)
            .map_or(0.0, |c| c.ttc);
        percent_of(commission, self.revenue(channel).ttc)
    }

    /// Revenue over every channel, rounded once after the sum.
    pub fn total_revenue(&self) -> MontantHtTtc {
        let (ht, ttc) = self
            .ca_par_canal
            .values()
            .fold((0.0, 0.0), |(ht, ttc), ca| (ht + ca.ht, ttc + ca.ttc));
        MontantHtTtc {
            ht: round2(ht),
            ttc: round2(ttc),
        }
    }

    /// Sorted union of every channel key present anywhere in the summary.
    pub fn channels(&self) -> Vec<String> {
        let mut channels: Vec<String> = self
            .transactions_par_canal
            .keys()
            .chain(self.ca_par_canal.keys())
            .chain(self.remboursements_par_canal.keys())
            .chain(self.commissions_par_canal.keys())
            .chain(self.repartition_geo_par_canal.keys())
            .cloned()
            .collect();
        channels.sort();
        channels.dedup();
        channels
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
