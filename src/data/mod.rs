//! Loading and normalizing the three CSV exports
//!
//! - [`loader`]: raw CSV → [`Table`] of text cells
//! - [`normalize`]: currency, grouped-number and date coercion
//! - [`records`]: typed [`HitTable`] / [`ProviderHitRecord`] views

pub mod loader;
pub mod normalize;
pub mod records;
pub mod table;

pub use records::{HitColumn, HitRecord, HitTable, ProviderHitRecord};
pub use table::{Cell, Table};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use normalize::NormalizeOptions;
use tracing::info;

const TEXT_COLUMNS: &[&str] = &[records::BILLING_NPI];
const DATE_COLUMNS: &[&str] = &[records::DELIVERY_DATE];
const NUMERIC_COLUMNS: &[&str] = &[
    records::PROVIDER_HITS,
    records::CLAIM_HITS,
    records::MEMBERS_IMPACTED,
    records::TOTAL_OVERPAYMENT,
    records::TOTAL_PAID,
    records::AVG_PER_PROVIDER,
    records::AVG_PER_CLAIM,
    records::QUALIFYING_PAID,
];

/// Everything the dashboard is built from.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub all_hits: HitTable,
    pub presented_hits: HitTable,
    pub provider_hits: Vec<ProviderHitRecord>,
}

impl Inputs {
    /// Load and normalize all three exports.
    ///
    /// Every input is checked for existence before any is read, so a missing
    /// file fails fast.
    pub fn load(config: &DashboardConfig) -> Result<Self> {
        let all_path = config.input_path(&config.inputs.all_hits);
        let presented_path = config.input_path(&config.inputs.presented_hits);
        let provider_path = config.input_path(&config.inputs.provider_hits);

        for path in [&all_path, &presented_path, &provider_path] {
            if !path.is_file() {
                return Err(DashboardError::MissingInput { path: path.clone() });
            }
        }

        let all = load_normalized(&all_path)?;
        let presented = load_normalized(&presented_path)?;
        let providers = load_normalized(&provider_path)?;

        info!(
            "Loaded {} all-hit rows, {} presented-hit rows, {} provider rows",
            all.len(),
            presented.len(),
            providers.len()
        );

        Ok(Self {
            all_hits: HitTable::from_table(&all, &config.inputs.all_hits),
            presented_hits: HitTable::from_table(&presented, &config.inputs.presented_hits),
            provider_hits: ProviderHitRecord::from_table(&providers),
        })
    }
}

fn load_normalized(path: &std::path::Path) -> Result<Table> {
    let mut table = loader::load_table(path, TEXT_COLUMNS)?;
    normalize::normalize(
        &mut table,
        &NormalizeOptions {
            text_columns: TEXT_COLUMNS,
            date_columns: DATE_COLUMNS,
            numeric_columns: NUMERIC_COLUMNS,
        },
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregateMetrics;
    use std::fs;

    fn write_inputs(dir: &std::path::Path) {
        fs::write(
            dir.join(crate::config::DEFAULT_ALL_HITS_FILE),
            "Concept ,Date of Client Delivery,Total Overpayment,Number of Provider Hits\n\
             A,2025-11-10,\"$1,000\",\"1,200\"\n",
        )
        .unwrap();
        fs::write(
            dir.join(crate::config::DEFAULT_PRESENTED_HITS_FILE),
            "Concept,Date of Client Delivery,Total Overpayment\nA,11/10/2025,$1000\n",
        )
        .unwrap();
        fs::write(
            dir.join(crate::config::DEFAULT_PROVIDER_HITS_FILE),
            "Billing NPI,Concept,Total Qualifying Paid Amount,Number of Claim Hits\n00123,A,$500,3\n",
        )
        .unwrap();
    }

    #[test]
    fn test_load_all_inputs() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            ..DashboardConfig::default()
        };

        let inputs = Inputs::load(&config).unwrap();
        assert_eq!(inputs.all_hits.records[0].total_overpayment, Some(1000.0));
        assert_eq!(inputs.all_hits.records[0].provider_hits, Some(1200));
        assert_eq!(
            inputs.presented_hits.records[0].delivery_date,
            chrono::NaiveDate::from_ymd_opt(2025, 11, 10)
        );
        assert_eq!(inputs.provider_hits[0].billing_npi.as_deref(), Some("00123"));
        assert_eq!(inputs.provider_hits[0].total_overpayment, Some(500.0));
    }

    #[test]
    fn test_unparseable_cell_reduces_sum_by_its_value() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let header = "Concept,Number of Provider Hits,Number of Claim Hits,Total Overpayment\n";
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            ..DashboardConfig::default()
        };
        let all_hits = dir.path().join(crate::config::DEFAULT_ALL_HITS_FILE);

        fs::write(&all_hits, format!("{}A,12,100,1000\nB,5,200,2000\nC,3,50,40\n", header)).unwrap();
        let clean = AggregateMetrics::from_records(&Inputs::load(&config).unwrap().all_hits.records);
        assert_eq!(clean.provider_hits, 20);
        assert_eq!(clean.claim_hits, 350);
        assert_eq!(clean.total_overpayment, 3040.0);

        fs::write(&all_hits, format!("{}A,12,100,1000\nB,pending,200,2000\nC,3,TBD,oops\n", header))
            .unwrap();
        let dirty = AggregateMetrics::from_records(&Inputs::load(&config).unwrap().all_hits.records);
        assert_eq!(clean.provider_hits - dirty.provider_hits, 5);
        assert_eq!(clean.claim_hits - dirty.claim_hits, 50);
        assert_eq!(clean.total_overpayment - dirty.total_overpayment, 40.0);
    }

    #[test]
    fn test_missing_provider_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        fs::remove_file(dir.path().join(crate::config::DEFAULT_PROVIDER_HITS_FILE)).unwrap();
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            ..DashboardConfig::default()
        };

        match Inputs::load(&config) {
            Err(DashboardError::MissingInput { path }) => {
                assert!(path.ends_with(crate::config::DEFAULT_PROVIDER_HITS_FILE))
            }
            other => panic!("expected MissingInput, got {:?}", other),
        }
    }
}
