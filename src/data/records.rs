//! Typed views over the normalized tables.

use crate::data::table::{Cell, Table};
use chrono::NaiveDate;
use tracing::warn;

pub const CONCEPT: &str = "Concept";
pub const DELIVERY_DATE: &str = "Date of Client Delivery";
pub const PROVIDER_HITS: &str = "Number of Provider Hits";
pub const CLAIM_HITS: &str = "Number of Claim Hits";
pub const MEMBERS_IMPACTED: &str = "Number of Members Impacted";
pub const TOTAL_OVERPAYMENT: &str = "Total Overpayment";
pub const TOTAL_PAID: &str = "Total Paid Amount";
pub const AVG_PER_PROVIDER: &str = "Average Overpayment Per Provider";
pub const AVG_PER_CLAIM: &str = "Average Overpayment Per Claim";
pub const DESCRIPTION: &str = "Description";
pub const BILLING_NPI: &str = "Billing NPI";
/// Older provider exports name the overpayment column this way.
pub const QUALIFYING_PAID: &str = "Total Qualifying Paid Amount";

/// The recognized concept-statistics columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HitColumn {
    Concept,
    DeliveryDate,
    ProviderHits,
    ClaimHits,
    MembersImpacted,
    TotalOverpayment,
    TotalPaid,
    AvgPerProvider,
    AvgPerClaim,
}

impl HitColumn {
    pub const ALL: [HitColumn; 9] = [
        HitColumn::Concept,
        HitColumn::DeliveryDate,
        HitColumn::ProviderHits,
        HitColumn::ClaimHits,
        HitColumn::MembersImpacted,
        HitColumn::TotalOverpayment,
        HitColumn::TotalPaid,
        HitColumn::AvgPerProvider,
        HitColumn::AvgPerClaim,
    ];

    pub fn header(self) -> &'static str {
        match self {
            HitColumn::Concept => CONCEPT,
            HitColumn::DeliveryDate => DELIVERY_DATE,
            HitColumn::ProviderHits => PROVIDER_HITS,
            HitColumn::ClaimHits => CLAIM_HITS,
            HitColumn::MembersImpacted => MEMBERS_IMPACTED,
            HitColumn::TotalOverpayment => TOTAL_OVERPAYMENT,
            HitColumn::TotalPaid => TOTAL_PAID,
            HitColumn::AvgPerProvider => AVG_PER_PROVIDER,
            HitColumn::AvgPerClaim => AVG_PER_CLAIM,
        }
    }

    pub fn is_currency(self) -> bool {
        matches!(
            self,
            HitColumn::TotalOverpayment
                | HitColumn::TotalPaid
                | HitColumn::AvgPerProvider
                | HitColumn::AvgPerClaim
        )
    }

    pub fn is_count(self) -> bool {
        matches!(
            self,
            HitColumn::ProviderHits | HitColumn::ClaimHits | HitColumn::MembersImpacted
        )
    }
}

/// One row of an "All Hits" or "Presented Hits" export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitRecord {
    pub concept: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub provider_hits: Option<u64>,
    pub claim_hits: Option<u64>,
    pub members_impacted: Option<u64>,
    pub total_overpayment: Option<f64>,
    pub total_paid: Option<f64>,
    pub avg_per_provider: Option<f64>,
    pub avg_per_claim: Option<f64>,
    pub description: Option<String>,
}

impl HitRecord {
    /// Currency value for a recognized currency column.
    pub fn currency(&self, column: HitColumn) -> Option<f64> {
        match column {
            HitColumn::TotalOverpayment => self.total_overpayment,
            HitColumn::TotalPaid => self.total_paid,
            HitColumn::AvgPerProvider => self.avg_per_provider,
            HitColumn::AvgPerClaim => self.avg_per_claim,
            _ => None,
        }
    }

    /// Count value for a recognized count column.
    pub fn count(&self, column: HitColumn) -> Option<u64> {
        match column {
            HitColumn::ProviderHits => self.provider_hits,
            HitColumn::ClaimHits => self.claim_hits,
            HitColumn::MembersImpacted => self.members_impacted,
            _ => None,
        }
    }
}

/// A hit subset plus the recognized columns its source actually carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitTable {
    pub columns: Vec<HitColumn>,
    pub has_description: bool,
    pub records: Vec<HitRecord>,
}

impl HitTable {
    pub fn from_table(table: &Table, label: &str) -> Self {
        let columns: Vec<HitColumn> = HitColumn::ALL
            .iter()
            .copied()
            .filter(|c| table.has_column(c.header()))
            .collect();

        for missing in HitColumn::ALL.iter().filter(|c| !columns.contains(*c)) {
            warn!("{}: column '{}' not found", label, missing.header());
        }

        let records = (0..table.len())
            .map(|row| HitRecord {
                concept: text(table.cell(row, CONCEPT)),
                delivery_date: table.cell(row, DELIVERY_DATE).as_date(),
                provider_hits: count(table.cell(row, PROVIDER_HITS)),
                claim_hits: count(table.cell(row, CLAIM_HITS)),
                members_impacted: count(table.cell(row, MEMBERS_IMPACTED)),
                total_overpayment: table.cell(row, TOTAL_OVERPAYMENT).as_number(),
                total_paid: table.cell(row, TOTAL_PAID).as_number(),
                avg_per_provider: table.cell(row, AVG_PER_PROVIDER).as_number(),
                avg_per_claim: table.cell(row, AVG_PER_CLAIM).as_number(),
                description: text(table.cell(row, DESCRIPTION)),
            })
            .collect();

        Self {
            columns,
            has_description: table.has_column(DESCRIPTION),
            records,
        }
    }

    pub fn has(&self, column: HitColumn) -> bool {
        self.columns.contains(&column)
    }
}

/// One row of the provider-level export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderHitRecord {
    /// Kept verbatim; `00123` stays `00123`.
    pub billing_npi: Option<String>,
    pub concept: Option<String>,
    pub total_overpayment: Option<f64>,
    pub claim_hits: Option<u64>,
}

impl ProviderHitRecord {
    pub fn from_table(table: &Table) -> Vec<Self> {
        let overpayment_column = if table.has_column(TOTAL_OVERPAYMENT) {
            TOTAL_OVERPAYMENT
        } else {
            QUALIFYING_PAID
        };

        (0..table.len())
            .map(|row| ProviderHitRecord {
                billing_npi: table.cell(row, BILLING_NPI).as_text().map(str::to_string),
                concept: text(table.cell(row, CONCEPT)),
                total_overpayment: table.cell(row, overpayment_column).as_number(),
                claim_hits: count(table.cell(row, CLAIM_HITS)),
            })
            .collect()
    }
}

fn text(cell: &Cell) -> Option<String> {
    cell.to_label()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Counts are non-negative integers; anything else is treated as missing.
fn count(cell: &Cell) -> Option<u64> {
    cell.as_number()
        .filter(|v| *v >= 0.0)
        .map(|v| v.round() as u64)
}
