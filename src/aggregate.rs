//! Summary statistics over the hit tables
//!
//! All sums treat missing cells as contributing nothing. Rows without a
//! concept are dropped from concept- and date-level tables but still count
//! toward the scalar sums; rows without a delivery date are dropped only from
//! date-level tables.

use crate::data::{HitColumn, HitRecord, HitTable};
use crate::report::format;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Scalar totals for one hit subset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateMetrics {
    pub distinct_concepts: usize,
    pub total_overpayment: f64,
    pub provider_hits: u64,
    pub claim_hits: u64,
}

impl AggregateMetrics {
    pub fn from_records(records: &[HitRecord]) -> Self {
        let distinct_concepts = records
            .iter()
            .filter_map(|r| r.concept.as_deref())
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            distinct_concepts,
            total_overpayment: records.iter().filter_map(|r| r.total_overpayment).sum(),
            provider_hits: records.iter().filter_map(|r| r.provider_hits).sum(),
            claim_hits: records.iter().filter_map(|r| r.claim_hits).sum(),
        }
    }
}

/// Headline numbers for the summary cards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub presented: AggregateMetrics,
    pub all: AggregateMetrics,
}

impl Summary {
    pub fn new(presented: &HitTable, all: &HitTable) -> Self {
        Self {
            presented: AggregateMetrics::from_records(&presented.records),
            all: AggregateMetrics::from_records(&all.records),
        }
    }

    /// Concepts delivered to date: distinct concepts in the presented subset.
    pub fn concepts_delivered(&self) -> usize {
        self.presented.distinct_concepts
    }
}

/// One row of a concept-level statistics table.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptSummary {
    pub concept: String,
    pub record: HitRecord,
}

/// Concept-level statistics: concept present, duplicates removed, ordered by
/// delivery date when the source has one (undated rows last).
pub fn concept_stats(table: &HitTable) -> Vec<ConceptSummary> {
    let mut rows: Vec<ConceptSummary> = Vec::new();

    for record in &table.records {
        let Some(concept) = record.concept.clone() else {
            continue;
        };
        // Only the recognized columns take part in row identity.
        let mut projected = project(record, &table.columns);
        projected.concept = Some(concept.clone());
        let row = ConceptSummary {
            concept,
            record: projected,
        };
        if !rows.contains(&row) {
            rows.push(row);
        }
    }

    if table.has(HitColumn::DeliveryDate) {
        rows.sort_by_key(|r| date_sort_key(r.record.delivery_date));
    }
    rows
}

fn project(record: &HitRecord, columns: &[HitColumn]) -> HitRecord {
    let keep = |c: HitColumn| columns.contains(&c);
    HitRecord {
        concept: record.concept.clone(),
        delivery_date: record.delivery_date.filter(|_| keep(HitColumn::DeliveryDate)),
        provider_hits: record.provider_hits.filter(|_| keep(HitColumn::ProviderHits)),
        claim_hits: record.claim_hits.filter(|_| keep(HitColumn::ClaimHits)),
        members_impacted: record.members_impacted.filter(|_| keep(HitColumn::MembersImpacted)),
        total_overpayment: record.total_overpayment.filter(|_| keep(HitColumn::TotalOverpayment)),
        total_paid: record.total_paid.filter(|_| keep(HitColumn::TotalPaid)),
        avg_per_provider: record.avg_per_provider.filter(|_| keep(HitColumn::AvgPerProvider)),
        avg_per_claim: record.avg_per_claim.filter(|_| keep(HitColumn::AvgPerClaim)),
        description: None,
    }
}

fn date_sort_key(date: Option<NaiveDate>) -> (bool, Option<NaiveDate>) {
    (date.is_none(), date)
}

/// A row of the "concepts presented" table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptDescription {
    pub concept: String,
    pub delivery_date: Option<NaiveDate>,
    pub description: Option<String>,
}

pub fn concept_descriptions(table: &HitTable) -> Vec<ConceptDescription> {
    let mut rows: Vec<ConceptDescription> = Vec::new();
    for record in &table.records {
        let Some(concept) = record.concept.clone() else {
            continue;
        };
        let row = ConceptDescription {
            concept,
            delivery_date: record.delivery_date,
            description: record.description.clone(),
        };
        if !rows.contains(&row) {
            rows.push(row);
        }
    }
    rows.sort_by_key(|r| date_sort_key(r.delivery_date));
    rows
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CadenceEntry {
    pub concept: String,
    pub date: NaiveDate,
    /// Signed days from the baseline.
    pub delta_days: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryCadence {
    pub baseline: Option<NaiveDate>,
    pub entries: Vec<CadenceEntry>,
    /// Mean gap between consecutive distinct delivery dates.
    pub average_gap_days: Option<f64>,
}

impl DeliveryCadence {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn delivery_cadence(records: &[HitRecord], baseline: NaiveDate) -> DeliveryCadence {
    let pairs: BTreeSet<(NaiveDate, String)> = records
        .iter()
        .filter_map(|r| Some((r.delivery_date?, r.concept.clone()?)))
        .collect();

    let entries: Vec<CadenceEntry> = pairs
        .into_iter()
        .map(|(date, concept)| CadenceEntry {
            delta_days: (date - baseline).num_days(),
            concept,
            date,
        })
        .collect();

    let dates: Vec<NaiveDate> = entries
        .iter()
        .map(|e| e.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let average_gap_days = if dates.len() < 2 {
        None
    } else {
        let total: i64 = dates.windows(2).map(|w| (w[1] - w[0]).num_days()).sum();
        Some(total as f64 / (dates.len() - 1) as f64)
    };

    DeliveryCadence {
        baseline: Some(baseline),
        entries,
        average_gap_days,
    }
}

/// Everything delivered on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct DateSummary {
    pub date: NaiveDate,
    /// `None` when no contributing row had an overpayment.
    pub total_overpayment: Option<f64>,
    /// Sorted, de-duplicated.
    pub concepts: Vec<String>,
    /// `"A, B ($1,234)"`
    pub label: String,
}

pub fn date_summaries(records: &[HitRecord]) -> Vec<DateSummary> {
    let mut by_date: BTreeMap<NaiveDate, (Option<f64>, BTreeSet<String>)> = BTreeMap::new();

    for record in records {
        let (Some(date), Some(concept)) = (record.delivery_date, record.concept.as_ref()) else {
            continue;
        };
        let entry = by_date.entry(date).or_insert((None, BTreeSet::new()));
        if let Some(value) = record.total_overpayment {
            entry.0 = Some(entry.0.unwrap_or(0.0) + value);
        }
        entry.1.insert(concept.clone());
    }

    by_date
        .into_iter()
        .map(|(date, (total, concepts))| {
            let concepts: Vec<String> = concepts.into_iter().collect();
            let label = summary_label(&concepts, total);
            DateSummary {
                date,
                total_overpayment: total,
                concepts,
                label,
            }
        })
        .collect()
}

fn summary_label(concepts: &[String], total: Option<f64>) -> String {
    let amount = format::currency(total);
    if concepts.is_empty() {
        format!("({})", amount)
    } else {
        format!("{} ({})", concepts.join(", "), amount)
    }
}
