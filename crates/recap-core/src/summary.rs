//! # Summary Aggregation Engine
//!
//! Folds a flat list of transactions and ledger entries into a [`Summary`].
//!
//! ## Passes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      summarize(tx, entries, countries)                  │
//! │                                                                         │
//! │  1. count pass      every transaction ──► transactions_par_canal        │
//! │  2. entry pass      every entry ──► ecritures_par_type, totaux          │
//! │  3. financial pass  special_type filter ──► per-channel accumulators    │
//! │                       round once ──► ca, refunds, commissions, VAT      │
//! │                       derive ──► refund rate, net vendeur               │
//! │  4. geography pass  ordinary sales only ──► countries, VAT by rate      │
//! │                                                                         │
//! │  Each pass decides its own channel keys. Nothing is pre-populated.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Parity
//! The browser re-runs this algorithm on every period change and must print
//! the same digits. Accumulators stay raw `f64` inside the loops and go
//! through [`round2`] exactly once afterwards; a derived value is rounded
//! again after its own arithmetic. NaN in the input propagates into the
//! output rather than being masked.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::country::{resolve, CountryNames};
use crate::money::{percent_of, round2};
use crate::types::{
    Entry, GeoStats, MontantHtTtc, RankedMap, Remboursements, SpecialClass, Summary, Totaux,
    Transaction, TvaMontant, Ventilation,
};

// =============================================================================
// Entry Point
// =============================================================================

/// Builds a fresh [`Summary`] from the given records.
///
/// Pure and total: no I/O, no shared state, inputs are only read. Callers
/// that want a date window filter the slices first (see
/// [`crate::period::summarize_window`]).
///
/// ## Example
/// ```rust
/// use recap_core::{summarize, CountryNames, Transaction};
///
/// let sale: Transaction = serde_json::from_str(r#"{
///     "reference": "1001", "channel": "shopify", "date": "2024-01-05",
///     "type": "sale", "amount_ht": 100, "amount_tva": 20, "amount_ttc": 120,
///     "tva_rate": 20, "country_code": "FR", "commission_ttc": 5
/// }"#).unwrap();
///
/// let summary = summarize(&[sale], &[], &CountryNames::new());
/// assert_eq!(summary.ca_par_canal["shopify"].ttc, 120.0);
/// assert_eq!(summary.net_vendeur_par_canal["shopify"], 115.0);
/// ```
pub fn summarize(
    transactions: &[Transaction],
    entries: &[Entry],
    countries: &CountryNames,
) -> Summary {
    let mut summary = Summary {
        transactions_par_canal: count_transactions(transactions),
        ..Summary::default()
    };

    let (ecritures_par_type, totaux) = tally_entries(entries);
    summary.ecritures_par_type = ecritures_par_type;
    summary.totaux = totaux;

    apply_financials(&mut summary, accumulate_financials(transactions));
    apply_geography(&mut summary, accumulate_geography(transactions, countries));

    debug!(
        transactions = transactions.len(),
        entries = entries.len(),
        channels = summary.transactions_par_canal.len(),
        countries = summary.repartition_geo_globale.len(),
        "Summary computed"
    );

    summary
}

// =============================================================================
// Pass 1 & 2: Counts and Ledger Totals
// =============================================================================

fn count_transactions(transactions: &[Transaction]) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for tx in transactions {
        *counts.entry(tx.channel.clone()).or_insert(0) += 1;
    }
    counts
}

fn tally_entries(entries: &[Entry]) -> (BTreeMap<String, u32>, Totaux) {
    let mut by_type = BTreeMap::new();
    let mut debit = 0.0;
    let mut credit = 0.0;

    for entry in entries {
        *by_type.entry(entry.entry_type.clone()).or_insert(0) += 1;
        debit += entry.debit;
        credit += entry.credit;
    }

    let totaux = Totaux {
        debit: round2(debit),
        credit: round2(credit),
    };
    (by_type, totaux)
}

// =============================================================================
// Pass 3: Financial KPIs
// =============================================================================

/// Raw per-channel sums, created on the channel's first qualifying transaction.
#[derive(Debug, Default)]
struct ChannelTotals {
    sales: u32,
    produits_ht: f64,
    port_ht: f64,
    ca_ttc: f64,
    tva: f64,
    refunds: u32,
    refund_ht: f64,
    refund_ttc: f64,
    commission_ht: f64,
    commission_ttc: f64,
}

fn accumulate_financials(transactions: &[Transaction]) -> BTreeMap<String, ChannelTotals> {
    let mut channels: BTreeMap<String, ChannelTotals> = BTreeMap::new();

    for tx in transactions {
        let class = tx.special_class();
        if class == SpecialClass::Structural {
            continue;
        }

        let totals = channels.entry(tx.channel.clone()).or_default();

        if class == SpecialClass::ReturnsAvoir || !tx.is_sale() {
            totals.refunds += 1;
            totals.refund_ht += tx.amount_ht.abs() + tx.shipping_ht.abs();
            totals.refund_ttc += tx.amount_ttc.abs();
        } else {
            totals.sales += 1;
            totals.produits_ht += tx.amount_ht;
            totals.port_ht += tx.shipping_ht;
            totals.ca_ttc += tx.amount_ttc;
            totals.tva += tx.amount_tva + tx.shipping_tva;
        }

        totals.commission_ttc += tx.commission_ttc.abs();
        if let Some(ht) = tx.commission_ht {
            totals.commission_ht += ht.abs();
        }
    }

    channels
}

fn apply_financials(summary: &mut Summary, channels: BTreeMap<String, ChannelTotals>) {
    for (channel, totals) in channels {
        let total_ht = round2(totals.produits_ht + totals.port_ht);
        let ca = MontantHtTtc {
            ht: total_ht,
            ttc: round2(totals.ca_ttc),
        };
        let refunds = Remboursements {
            count: totals.refunds,
            ht: round2(totals.refund_ht),
            ttc: round2(totals.refund_ttc),
        };
        let commissions = MontantHtTtc {
            ht: round2(totals.commission_ht),
            ttc: round2(totals.commission_ttc),
        };

        // operands are already rounded; round again after the subtraction
        let net = round2(ca.ttc - commissions.ttc - refunds.ttc);
        let refund_rate = percent_of(f64::from(totals.refunds), f64::from(totals.sales));

        if totals.sales > 0 {
            summary.ca_par_canal.insert(channel.clone(), ca);
            summary
                .tva_collectee_par_canal
                .insert(channel.clone(), round2(totals.tva));
            summary.ventilation_ca_par_canal.insert(
                channel.clone(),
                Ventilation {
                    produits_ht: round2(totals.produits_ht),
                    port_ht: round2(totals.port_ht),
                    total_ht,
                },
            );
        }
        if totals.refunds > 0 {
            summary
                .remboursements_par_canal
                .insert(channel.clone(), refunds);
        }

        summary
            .taux_remboursement_par_canal
            .insert(channel.clone(), refund_rate);
        summary.commissions_par_canal.insert(channel.clone(), commissions);
        summary.net_vendeur_par_canal.insert(channel, net);
    }
}

// =============================================================================
// Pass 4: Geography and VAT by Rate
// =============================================================================

#[derive(Debug, Default)]
struct CountryTotals {
    count: u32,
    ca_ttc: f64,
    ca_ht: f64,
}

impl CountryTotals {
    fn add(&mut self, tx: &Transaction) {
        self.count += 1;
        self.ca_ttc += tx.amount_ttc;
        self.ca_ht += tx.amount_ht + tx.shipping_ht;
    }

    fn rounded(&self) -> GeoStats {
        GeoStats {
            count: self.count,
            ca_ttc: round2(self.ca_ttc),
            ca_ht: round2(self.ca_ht),
        }
    }
}

#[derive(Debug, Default)]
struct GeographyTotals {
    /// Countries in first-encounter order.
    global: Vec<(String, CountryTotals)>,
    global_index: HashMap<String, usize>,
    by_channel: BTreeMap<String, BTreeMap<String, CountryTotals>>,
    /// (rate, raw VAT) pairs per channel and country, first-encounter order.
    vat: BTreeMap<String, BTreeMap<String, Vec<(f64, f64)>>>,
}

fn accumulate_geography(transactions: &[Transaction], countries: &CountryNames) -> GeographyTotals {
    let mut geo = GeographyTotals::default();

    let ordinary_sales = transactions
        .iter()
        .filter(|tx| tx.special_class() == SpecialClass::Ordinary && tx.is_sale());

    for tx in ordinary_sales {
        let country = resolve(&tx.country_code, countries);

        let slot = match geo.global_index.get(country) {
            Some(&slot) => slot,
            None => {
                geo.global.push((country.to_string(), CountryTotals::default()));
                geo.global_index.insert(country.to_string(), geo.global.len() - 1);
                geo.global.len() - 1
            }
        };
        geo.global[slot].1.add(tx);

        geo.by_channel
            .entry(tx.channel.clone())
            .or_default()
            .entry(country.to_string())
            .or_default()
            .add(tx);

        let rates = geo
            .vat
            .entry(tx.channel.clone())
            .or_default()
            .entry(country.to_string())
            .or_default();
        let amount = tx.amount_tva + tx.shipping_tva;
        match rates.iter_mut().find(|(rate, _)| *rate == tx.tva_rate) {
            Some((_, total)) => *total += amount,
            None => rates.push((tx.tva_rate, amount)),
        }
    }

    geo
}

/// Descending total order; NaN sorts ahead of every number instead of
/// breaking the sort.
fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

fn apply_geography(summary: &mut Summary, geo: GeographyTotals) {
    let mut global: Vec<(String, GeoStats)> = geo
        .global
        .into_iter()
        .map(|(country, totals)| (country, totals.rounded()))
        .collect();
    // stable: equal revenue keeps first-encounter order
    global.sort_by(|(_, a), (_, b)| descending(a.ca_ttc, b.ca_ttc));
    summary.repartition_geo_globale = RankedMap::from_ordered(global);

    summary.repartition_geo_par_canal = geo
        .by_channel
        .into_iter()
        .map(|(channel, countries)| {
            let stats: BTreeMap<String, GeoStats> = countries
                .into_iter()
                .map(|(country, totals)| (country, totals.rounded()))
                .collect();
            (channel, stats)
        })
        .collect();

    summary.tva_par_pays_par_canal = geo
        .vat
        .into_iter()
        .map(|(channel, countries)| {
            let by_country: BTreeMap<String, Vec<TvaMontant>> = countries
                .into_iter()
                .map(|(country, rates)| {
                    let mut list: Vec<TvaMontant> = rates
                        .into_iter()
                        .map(|(taux, montant)| TvaMontant {
                            taux,
                            montant: round2(montant),
                        })
                        .collect();
                    list.sort_by(|a, b| descending(a.taux, b.taux));
                    (country, list)
                })
                .collect();
            (channel, by_country)
        })
        .collect();
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;
    use chrono::NaiveDate;

    fn sale(channel: &str, ht: f64, tva: f64, ttc: f64, commission_ttc: f64) -> Transaction {
        Transaction {
            reference: format!("{channel}-{ttc}"),
            channel: channel.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            kind: TransactionType::Sale,
            amount_ht: ht,
            amount_tva: tva,
            amount_ttc: ttc,
            shipping_ht: 0.0,
            shipping_tva: 0.0,
            tva_rate: 20.0,
            country_code: "FR".to_string(),
            commission_ttc,
            commission_ht: None,
            special_type: None,
        }
    }

    fn refund(channel: &str, ttc: f64, special_type: Option<&str>) -> Transaction {
        Transaction {
            kind: TransactionType::Refund,
            amount_ht: round2(-ttc / 1.2),
            amount_tva: round2(-ttc + ttc / 1.2),
            amount_ttc: -ttc,
            commission_ttc: 0.0,
            special_type: special_type.map(str::to_string),
            ..sale(channel, 0.0, 0.0, 0.0, 0.0)
        }
    }

    fn entry(entry_type: &str, debit: f64, credit: f64) -> Entry {
        Entry {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            journal: "VE".to_string(),
            account: "411SHOP".to_string(),
            label: "Vente".to_string(),
            debit,
            credit,
            piece: "P1".to_string(),
            lettrage: None,
            channel: "shopify".to_string(),
            entry_type: entry_type.to_string(),
        }
    }

    fn countries() -> CountryNames {
        CountryNames::from([
            ("FR".to_string(), "France".to_string()),
            ("BE".to_string(), "Belgique".to_string()),
            ("ES".to_string(), "Espagne".to_string()),
        ])
    }

    #[test]
    fn test_empty_input() {
        let summary = summarize(&[], &[], &countries());
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn test_idempotent() {
        let transactions = vec![
            sale("shopify", 100.0, 20.0, 120.0, 5.0),
            refund("shopify", 36.0, Some("returns_avoir")),
            sale("decathlon", 50.0, 10.0, 60.0, 9.0),
        ];
        let entries = vec![entry("sale", 120.0, 0.0), entry("sale", 0.0, 120.0)];

        let first = summarize(&transactions, &entries, &countries());
        let second = summarize(&transactions, &entries, &countries());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_lone_returns_avoir_refund() {
        let avoir = refund("manomano", 28.9, Some("returns_avoir"));
        let summary = summarize(&[avoir], &[], &countries());

        assert_eq!(summary.revenue("manomano").ttc, 0.0);
        assert_eq!(summary.remboursements_par_canal["manomano"].ttc, 28.9);
        assert_eq!(summary.remboursements_par_canal["manomano"].count, 1);
        assert_eq!(summary.net_vendeur_par_canal["manomano"], -28.9);
        assert_eq!(summary.taux_remboursement_par_canal["manomano"], 0.0);
    }

    #[test]
    fn test_sale_plus_returns_avoir() {
        let transactions = vec![
            sale("shopify", 100.0, 20.0, 120.0, 5.0),
            refund("shopify", 36.0, Some("returns_avoir")),
        ];
        let summary = summarize(&transactions, &[], &countries());

        assert_eq!(summary.ca_par_canal["shopify"].ttc, 120.0);
        assert_eq!(summary.ca_par_canal["shopify"].ht, 100.0);
        assert_eq!(summary.remboursements_par_canal["shopify"].count, 1);
        assert_eq!(summary.net_vendeur_par_canal["shopify"], 79.0);
        assert_eq!(summary.taux_remboursement_par_canal["shopify"], 100.0);
        assert_eq!(summary.tva_collectee_par_canal["shopify"], 20.0);
    }

    #[test]
    fn test_structural_transaction_is_fully_excluded() {
        let mut orphan = sale("leroy_merlin", 80.0, 16.0, 96.0, 12.0);
        orphan.special_type = Some("orphan_settlement".to_string());

        let summary = summarize(&[orphan], &[], &countries());

        assert_eq!(summary.transactions_par_canal["leroy_merlin"], 1);
        assert!(summary.ca_par_canal.is_empty());
        assert!(summary.remboursements_par_canal.is_empty());
        assert!(summary.commissions_par_canal.is_empty());
        assert!(summary.net_vendeur_par_canal.is_empty());
        assert!(summary.repartition_geo_globale.is_empty());
        assert!(summary.tva_par_pays_par_canal.is_empty());
    }

    #[test]
    fn test_structural_refund_is_fully_excluded() {
        let adjustment = refund("decathlon", 40.0, Some("payout_adjustment"));
        let summary = summarize(&[adjustment], &[], &countries());
        assert!(summary.remboursements_par_canal.is_empty());
        assert!(summary.taux_remboursement_par_canal.is_empty());
    }

    #[test]
    fn test_commission_counts_returns_avoir_but_not_structural() {
        let mut avoir = refund("manomano", 30.0, Some("returns_avoir"));
        avoir.commission_ttc = -3.0;
        avoir.commission_ht = Some(-2.5);
        let mut structural = sale("manomano", 10.0, 2.0, 12.0, 7.0);
        structural.special_type = Some("orphan_settlement".to_string());
        let mut ordinary = sale("manomano", 100.0, 20.0, 120.0, 18.0);
        ordinary.commission_ht = Some(15.0);

        let summary = summarize(&[avoir, structural, ordinary], &[], &countries());

        assert_eq!(
            summary.commissions_par_canal["manomano"],
            MontantHtTtc { ht: 17.5, ttc: 21.0 }
        );
        assert_eq!(summary.net_vendeur_par_canal["manomano"], 120.0 - 21.0 - 30.0);
    }

    #[test]
    fn test_commission_on_ordinary_refund_counts() {
        let order = sale("shopify", 100.0, 20.0, 120.0, 5.0);
        let mut returned = refund("shopify", 36.0, None);
        returned.commission_ttc = 4.0;
        returned.commission_ht = Some(3.0);

        let summary = summarize(&[order, returned], &[], &countries());

        assert_eq!(
            summary.commissions_par_canal["shopify"],
            MontantHtTtc { ht: 3.0, ttc: 9.0 }
        );
        assert_eq!(summary.net_vendeur_par_canal["shopify"], 75.0);
    }

    #[test]
    fn test_returns_avoir_typed_sale_is_a_refund() {
        let order = sale("manomano", 100.0, 20.0, 120.0, 0.0);
        let mut avoir = sale("manomano", 50.0, 10.0, 60.0, 2.0);
        avoir.special_type = Some("returns_avoir".to_string());
        avoir.country_code = "BE".to_string();
        avoir.tva_rate = 5.5;

        let summary = summarize(&[order, avoir], &[], &countries());

        assert_eq!(summary.ca_par_canal["manomano"], MontantHtTtc { ht: 100.0, ttc: 120.0 });
        assert_eq!(summary.ventilation_ca_par_canal["manomano"].total_ht, 100.0);
        assert_eq!(summary.tva_collectee_par_canal["manomano"], 20.0);
        assert_eq!(
            summary.remboursements_par_canal["manomano"],
            Remboursements { count: 1, ht: 50.0, ttc: 60.0 }
        );
        assert_eq!(summary.taux_remboursement_par_canal["manomano"], 100.0);
        assert_eq!(summary.commissions_par_canal["manomano"].ttc, 2.0);
        assert_eq!(summary.net_vendeur_par_canal["manomano"], 58.0);

        assert_eq!(summary.repartition_geo_globale.keys().collect::<Vec<_>>(), vec!["France"]);
        assert!(!summary.repartition_geo_par_canal["manomano"].contains_key("Belgique"));
        assert_eq!(
            summary.tva_par_pays_par_canal["manomano"]["France"],
            vec![TvaMontant { taux: 20.0, montant: 20.0 }]
        );
    }

    #[test]
    fn test_missing_commission_ht_is_skipped() {
        let mut with_ht = sale("decathlon", 100.0, 20.0, 120.0, 12.0);
        with_ht.commission_ht = Some(10.0);
        let without_ht = sale("decathlon", 50.0, 10.0, 60.0, 6.0);

        let summary = summarize(&[with_ht, without_ht], &[], &countries());

        assert_eq!(
            summary.commissions_par_canal["decathlon"],
            MontantHtTtc { ht: 10.0, ttc: 18.0 }
        );
    }

    #[test]
    fn test_rounds_the_sum_not_the_parts() {
        let transactions: Vec<Transaction> = (0..3)
            .map(|_| sale("shopify", 0.2775, 0.0555, 0.333, 0.0))
            .collect();
        let summary = summarize(&transactions, &[], &countries());

        // three individually rounded parts would give 0.99
        assert_eq!(summary.ca_par_canal["shopify"].ttc, 1.0);
        assert_eq!(summary.repartition_geo_globale.get("France").unwrap().ca_ttc, 1.0);
    }

    #[test]
    fn test_net_vendeur_rounded_after_subtraction() {
        let transactions = vec![
            sale("shopify", 0.1, 0.0, 0.1, 0.0),
            sale("shopify", 0.2, 0.0, 0.2, 0.0),
            refund("shopify", 0.3, None),
        ];
        let summary = summarize(&transactions, &[], &countries());

        assert_eq!(summary.ca_par_canal["shopify"].ttc, 0.3);
        let net = summary.net_vendeur_par_canal["shopify"];
        assert_eq!(net, 0.0);
        assert!(net.is_sign_positive());
    }

    #[test]
    fn test_refund_amounts_use_absolute_values() {
        let mut positive = refund("shopify", 12.0, None);
        positive.amount_ht = 10.0;
        positive.amount_ttc = 12.0;
        let negative = refund("shopify", 24.0, None);

        let summary = summarize(&[positive, negative], &[], &countries());

        assert_eq!(summary.remboursements_par_canal["shopify"].ttc, 36.0);
        assert_eq!(summary.remboursements_par_canal["shopify"].ht, 30.0);
    }

    #[test]
    fn test_refund_rate() {
        let transactions = vec![
            sale("decathlon", 10.0, 2.0, 12.0, 0.0),
            sale("decathlon", 10.0, 2.0, 12.0, 0.0),
            sale("decathlon", 10.0, 2.0, 12.0, 0.0),
            refund("decathlon", 12.0, None),
        ];
        let summary = summarize(&transactions, &[], &countries());
        assert_eq!(summary.taux_remboursement_par_canal["decathlon"], 33.3);
    }

    #[test]
    fn test_refund_only_channel_key_sets() {
        let transactions = vec![
            sale("shopify", 100.0, 20.0, 120.0, 0.0),
            refund("manomano", 50.0, None),
        ];
        let summary = summarize(&transactions, &[], &countries());

        assert!(summary.transactions_par_canal.contains_key("manomano"));
        assert!(summary.remboursements_par_canal.contains_key("manomano"));
        assert!(!summary.ca_par_canal.contains_key("manomano"));
        assert!(!summary.ventilation_ca_par_canal.contains_key("manomano"));
        assert!(!summary.repartition_geo_par_canal.contains_key("manomano"));
        assert!(!summary.remboursements_par_canal.contains_key("shopify"));
    }

    #[test]
    fn test_ventilation_splits_products_and_shipping() {
        let mut tx = sale("shopify", 50.0, 10.0, 66.0, 0.0);
        tx.shipping_ht = 5.0;
        tx.shipping_tva = 1.0;

        let summary = summarize(&[tx], &[], &countries());

        assert_eq!(
            summary.ventilation_ca_par_canal["shopify"],
            Ventilation {
                produits_ht: 50.0,
                port_ht: 5.0,
                total_ht: 55.0,
            }
        );
        assert_eq!(summary.ca_par_canal["shopify"].ht, 55.0);
        assert_eq!(summary.tva_collectee_par_canal["shopify"], 11.0);
        assert_eq!(summary.repartition_geo_globale.get("France").unwrap().ca_ht, 55.0);
    }

    #[test]
    fn test_entries_counted_and_totalled_without_filtering() {
        let entries = vec![
            entry("sale", 0.1, 0.0),
            entry("sale", 0.2, 0.0),
            entry("commission", 0.0, 0.3),
        ];
        let summary = summarize(&[], &entries, &countries());

        assert_eq!(summary.ecritures_par_type["sale"], 2);
        assert_eq!(summary.ecritures_par_type["commission"], 1);
        assert_eq!(summary.totaux, Totaux { debit: 0.3, credit: 0.3 });
    }

    #[test]
    fn test_refunds_never_reach_geography() {
        let mut avoir = refund("manomano", 30.0, Some("returns_avoir"));
        avoir.country_code = "BE".to_string();
        let mut plain = refund("manomano", 20.0, None);
        plain.country_code = "ES".to_string();

        let summary = summarize(&[avoir, plain], &[], &countries());

        assert!(summary.repartition_geo_globale.is_empty());
        assert!(summary.repartition_geo_par_canal.is_empty());
        assert!(summary.tva_par_pays_par_canal.is_empty());
    }

    #[test]
    fn test_geography_ranked_by_revenue_with_stable_ties() {
        let mut be = sale("shopify", 50.0, 10.0, 60.0, 0.0);
        be.country_code = "BE".to_string();
        let mut es = sale("manomano", 50.0, 10.0, 60.0, 0.0);
        es.country_code = "ES".to_string();
        let fr = sale("shopify", 100.0, 20.0, 120.0, 0.0);
        let mut unknown = sale("shopify", 1.0, 0.2, 1.2, 0.0);
        unknown.country_code = "CH".to_string();

        let summary = summarize(&[be, es, fr, unknown], &[], &countries());

        let ranked: Vec<&str> = summary.repartition_geo_globale.keys().collect();
        assert_eq!(ranked, vec!["France", "Belgique", "Espagne", "CH"]);
        assert_eq!(
            summary.repartition_geo_globale.get("France"),
            Some(&GeoStats { count: 1, ca_ttc: 120.0, ca_ht: 100.0 })
        );
        assert_eq!(summary.repartition_geo_par_canal["shopify"].len(), 3);
        assert_eq!(summary.repartition_geo_par_canal["manomano"]["Espagne"].count, 1);
    }

    #[test]
    fn test_vat_rates_sorted_descending() {
        let mut reduced = sale("shopify", 100.0, 5.5, 105.5, 0.0);
        reduced.tva_rate = 5.5;
        let standard = sale("shopify", 100.0, 20.0, 120.0, 0.0);
        let mut reduced_again = sale("shopify", 10.0, 0.55, 10.55, 0.0);
        reduced_again.tva_rate = 5.5;

        let summary = summarize(&[reduced, standard, reduced_again], &[], &countries());

        assert_eq!(
            summary.tva_par_pays_par_canal["shopify"]["France"],
            vec![
                TvaMontant { taux: 20.0, montant: 20.0 },
                TvaMontant { taux: 5.5, montant: 6.05 },
            ]
        );
    }

    #[test]
    fn test_nan_propagates() {
        let broken = sale("shopify", f64::NAN, 0.0, f64::NAN, 0.0);
        let summary = summarize(&[broken], &[], &countries());

        assert!(summary.ca_par_canal["shopify"].ttc.is_nan());
        assert!(summary.net_vendeur_par_canal["shopify"].is_nan());
    }

    #[test]
    fn test_nan_ranking_does_not_panic() {
        // enough rows to leave the small-slice sort path
        let transactions: Vec<Transaction> = (0..24)
            .map(|i| {
                let ttc = if i % 2 == 0 { f64::NAN } else { f64::from(i) };
                let mut tx = sale("shopify", ttc, 0.0, ttc, 0.0);
                tx.country_code = format!("C{i:02}");
                tx.tva_rate = if i % 3 == 0 { f64::NAN } else { f64::from(i) };
                tx
            })
            .collect();

        let summary = summarize(&transactions, &[], &CountryNames::new());

        assert_eq!(summary.repartition_geo_globale.len(), 24);
        let finite: Vec<f64> = summary
            .repartition_geo_globale
            .iter()
            .map(|(_, stats)| stats.ca_ttc)
            .filter(|ttc| !ttc.is_nan())
            .collect();
        assert_eq!(finite.len(), 12);
        assert!(finite.windows(2).all(|pair| pair[0] >= pair[1]));
        assert!(summary.repartition_geo_globale.get("C00").unwrap().ca_ttc.is_nan());
        assert_eq!(summary.tva_par_pays_par_canal["shopify"].len(), 24);
    }

    #[test]
    fn test_nan_vat_rates_sort_without_panic() {
        let transactions: Vec<Transaction> = (0..24)
            .map(|i| {
                let mut tx = sale("decathlon", 10.0, 1.0, 11.0, 0.0);
                tx.tva_rate = if i % 2 == 0 { f64::NAN } else { f64::from(i) };
                tx
            })
            .collect();

        let summary = summarize(&transactions, &[], &countries());

        let rates = &summary.tva_par_pays_par_canal["decathlon"]["France"];
        // NaN never equals itself, so each NaN row keeps its own slot
        assert_eq!(rates.len(), 24);
        let finite: Vec<f64> = rates
            .iter()
            .map(|line| line.taux)
            .filter(|taux| !taux.is_nan())
            .collect();
        assert_eq!(finite.first(), Some(&23.0));
        assert!(finite.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn test_inputs_untouched() {
        let transactions = vec![sale("shopify", 100.0, 20.0, 120.0, 5.0)];
        let before = transactions.clone();
        let _ = summarize(&transactions, &[], &countries());
        assert_eq!(transactions, before);
    }
}
