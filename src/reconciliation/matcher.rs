//! Invoice-to-competition reconciliation
//!
//! Pairs externally parsed invoices with per-competition fee totals.
//! Matching is a stateless single pass over the full input: every re-run
//! recomputes from scratch, so re-uploading the same data is idempotent.

use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::str::FromStr;

use crate::reconciliation::{parse_day, DateRange};
use crate::reconciliation::similarity::name_similarity;
use crate::types::{
    BilledRecord, CompetitionAggregate, ParsedInvoice, ReconciliationReport, ReconciliationRow,
};
use crate::utils::rounding::round2;

/// Default minimum Jaccard similarity for a name match. An observed
/// heuristic, tunable via [`MatchOptions`].
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.75;

/// Tunable parameters for one reconciliation pass
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOptions {
    /// Minimum name similarity for an invoice to claim a competition
    pub similarity_threshold: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// Group billed records into per-competition totals.
///
/// The grouping key is the (competition name, raw date string) pair, so two
/// occurrences of the same event on different dates stay separate.
/// Aggregates keep the first-seen order of the input; a competition whose
/// date field cannot be parsed is excluded from matching entirely.
pub fn aggregate_competitions(billed: &[BilledRecord]) -> Vec<CompetitionAggregate> {
    let mut groups: IndexMap<(String, String), CompetitionAggregate> = IndexMap::new();

    for item in billed {
        let record = &item.record;
        let Some(date_range) = DateRange::parse(&record.competition_date) else {
            tracing::warn!(
                competition = %record.competition_name,
                date = %record.competition_date,
                "unparseable competition date, excluded from reconciliation"
            );
            continue;
        };

        let key = (
            record.competition_name.clone(),
            record.competition_date.clone(),
        );
        groups
            .entry(key)
            .and_modify(|agg| agg.total_fee += &record.fee_amount)
            .or_insert_with(|| CompetitionAggregate {
                competition_name: record.competition_name.clone(),
                competition_date: record.competition_date.clone(),
                date_range,
                total_fee: record.fee_amount.clone(),
            });
    }

    groups.into_values().collect()
}

/// Invoice total parsed from the raw extracted string. The flag is true
/// when the amount was missing or unparseable and zero was substituted.
fn invoice_amount(invoice: &ParsedInvoice) -> (BigDecimal, bool) {
    match invoice.total_amount.as_deref() {
        Some(raw) => {
            let cleaned = raw.trim().replace(',', ".");
            match BigDecimal::from_str(&cleaned) {
                Ok(amount) => (amount, false),
                Err(_) => (BigDecimal::from(0), true),
            }
        }
        None => (BigDecimal::from(0), true),
    }
}

/// Best-scoring competition for one invoice: the invoice day must fall
/// inside the competition's date range and the name similarity must reach
/// the threshold. Competitions already claimed are skipped.
fn find_best_match(
    invoice: &ParsedInvoice,
    aggregates: &[CompetitionAggregate],
    claimed: &HashSet<usize>,
    threshold: f64,
) -> Option<(usize, f64)> {
    let invoice_name = invoice.competition_name.as_deref()?;
    let invoice_day = parse_day(invoice.date.as_deref()?)?;

    let mut best: Option<(usize, f64)> = None;
    for (index, aggregate) in aggregates.iter().enumerate() {
        if claimed.contains(&index) || !aggregate.date_range.contains(invoice_day) {
            continue;
        }
        let score = name_similarity(&aggregate.competition_name, invoice_name);
        if score >= threshold && best.map_or(true, |(_, s)| score > s) {
            best = Some((index, score));
        }
    }
    best
}

/// Reconcile parsed invoices against competition totals.
///
/// Each invoice claims at most the single best-scoring competition, and
/// each competition receives at most one invoice. An invoice number that
/// has already been claimed by a successful match is not matched again,
/// and such duplicates are not re-reported as unmatched either. Invoices
/// without a competition name or date are always unmatched.
pub fn reconcile(
    aggregates: &[CompetitionAggregate],
    invoices: &[ParsedInvoice],
    options: &MatchOptions,
) -> ReconciliationReport {
    let mut matched = Vec::new();
    let mut claimed_competitions: HashSet<usize> = HashSet::new();
    let mut claimed_numbers: HashSet<String> = HashSet::new();
    let mut matched_invoices: HashSet<usize> = HashSet::new();

    for (invoice_index, invoice) in invoices.iter().enumerate() {
        if let Some(number) = invoice.invoice_number.as_deref() {
            if claimed_numbers.contains(number) {
                continue;
            }
        }

        let Some((competition_index, score)) = find_best_match(
            invoice,
            aggregates,
            &claimed_competitions,
            options.similarity_threshold,
        ) else {
            continue;
        };

        let aggregate = &aggregates[competition_index];
        let (amount, amount_unparsed) = invoice_amount(invoice);
        if amount_unparsed {
            tracing::warn!(
                source = %invoice.source_file,
                "invoice amount missing or unparseable, using zero"
            );
        }

        matched.push(ReconciliationRow {
            competition_name: aggregate.competition_name.clone(),
            competition_date: aggregate.competition_date.clone(),
            competition_total: aggregate.total_fee.clone(),
            invoice_source_file: invoice.source_file.clone(),
            invoice_entry_name: invoice.entry_name.clone(),
            invoice_competition_name: invoice.competition_name.clone(),
            invoice_date: invoice.date.clone(),
            invoice_amount: amount.clone(),
            invoice_number: invoice.invoice_number.clone(),
            similarity: score,
            difference: round2(&(&aggregate.total_fee - &amount)),
            amount_unparsed,
        });

        claimed_competitions.insert(competition_index);
        matched_invoices.insert(invoice_index);
        if let Some(number) = invoice.invoice_number.clone() {
            claimed_numbers.insert(number);
        }

        tracing::debug!(
            competition = %aggregate.competition_name,
            source = %invoice.source_file,
            score,
            "matched invoice to competition"
        );
    }

    let unmatched: Vec<ParsedInvoice> = invoices
        .iter()
        .enumerate()
        .filter(|(index, invoice)| {
            if matched_invoices.contains(index) {
                return false;
            }
            // duplicates of an already-claimed invoice number are dropped
            match invoice.invoice_number.as_deref() {
                Some(number) => !claimed_numbers.contains(number),
                None => true,
            }
        })
        .map(|(_, invoice)| invoice.clone())
        .collect();

    tracing::info!(
        matched = matched.len(),
        unmatched = unmatched.len(),
        competitions = aggregates.len(),
        "reconciliation pass complete"
    );

    ReconciliationReport { matched, unmatched }
}
