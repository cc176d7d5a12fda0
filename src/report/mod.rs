//! Dashboard assembly
//!
//! [`Dashboard::build`] runs the aggregation and chart builders over the
//! loaded inputs; [`html::write`] turns the result into one self-contained
//! HTML page.
//!
//! # Usage
//!
//! ```ignore
//! use fwa_dashboard::{report, DashboardConfig, Inputs};
//!
//! let config = DashboardConfig::from_env()?;
//! let inputs = Inputs::load(&config)?;
//! let dashboard = report::Dashboard::build(&inputs, &config);
//! let html = report::render(&dashboard, &config)?;
//! ```

pub mod format;
pub mod html;

use crate::aggregate::{
    concept_descriptions, concept_stats, date_summaries, delivery_cadence, ConceptDescription,
    ConceptSummary, DeliveryCadence, Summary,
};
use crate::chart::{self, Chart, Timeline};
use crate::config::{DashboardConfig, VISUALS_DIR};
use crate::data::{HitColumn, HitTable, Inputs};
use std::io;
use std::path::Path;
use tracing::debug;

const LOGO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg", "gif", "webp"];

/// Concept-level statistics for one subset, with the columns to display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsTable {
    pub columns: Vec<HitColumn>,
    pub rows: Vec<ConceptSummary>,
}

impl StatsTable {
    fn from_hits(table: &HitTable) -> Self {
        Self {
            // Dates drive the sort order; they are shown in the concepts table.
            columns: table
                .columns
                .iter()
                .copied()
                .filter(|c| *c != HitColumn::DeliveryDate)
                .collect(),
            rows: concept_stats(table),
        }
    }
}

/// The cadence table, line charts and timelines.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSection {
    pub cadence: DeliveryCadence,
    pub presented_line: Chart,
    pub all_line: Chart,
    pub presented_timeline: Timeline,
    pub all_timeline: Timeline,
}

/// Every computed section of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub summary: Summary,
    pub concepts: Vec<ConceptDescription>,
    pub presented_stats: StatsTable,
    pub all_stats: StatsTable,
    pub timeline: Option<TimelineSection>,
    pub overpayment_histogram: Chart,
    pub claims_histogram: Chart,
    /// Image file names under `visuals/`, for the brand bar.
    pub logos: Vec<String>,
}

impl Dashboard {
    pub fn build(inputs: &Inputs, config: &DashboardConfig) -> Self {
        let presented = &inputs.presented_hits;
        let all = &inputs.all_hits;

        let timeline = config.extended.then(|| {
            let presented_dates = date_summaries(&presented.records);
            let all_dates = date_summaries(&all.records);
            debug!(
                "{} presented delivery dates, {} overall",
                presented_dates.len(),
                all_dates.len()
            );

            TimelineSection {
                cadence: delivery_cadence(&presented.records, config.baseline),
                presented_line: chart::overpayment_line_chart(
                    &presented_dates,
                    "Total Overpayment over Time for Presented Hits",
                    &config.charts,
                ),
                all_line: chart::overpayment_line_chart(
                    &all_dates,
                    "Total Overpayment over Time for All Identified Hits",
                    &config.charts,
                ),
                presented_timeline: chart::timeline(&presented_dates, "Presented Hits"),
                all_timeline: chart::timeline(&all_dates, "All Identified Hits"),
            }
        });

        Self {
            summary: Summary::new(presented, all),
            concepts: concept_descriptions(presented),
            presented_stats: StatsTable::from_hits(presented),
            all_stats: StatsTable::from_hits(all),
            timeline,
            overpayment_histogram: chart::overpayment_histogram(&inputs.provider_hits, &config.charts),
            claims_histogram: chart::claim_hits_histogram(&inputs.provider_hits, &config.charts),
            logos: find_logos(&config.data_dir.join(VISUALS_DIR)),
        }
    }
}

/// Render the dashboard to a string.
pub fn render(dashboard: &Dashboard, config: &DashboardConfig) -> io::Result<String> {
    let mut buf = Vec::new();
    html::write(&mut buf, dashboard, config)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Image files directly under `dir`, sorted by name. Missing dir → none.
fn find_logos(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut logos: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| LOGO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();
    logos.sort();
    logos
}
