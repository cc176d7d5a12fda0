//! One dashboard run: load → aggregate → render → publish.

use crate::config::DashboardConfig;
use crate::data::Inputs;
use crate::error::{DashboardError, Result};
use crate::publish;
use crate::report::{self, Dashboard};
use std::path::PathBuf;
use tracing::info;

/// Build the dashboard HTML without writing anything.
pub fn build_html(config: &DashboardConfig) -> Result<String> {
    let inputs = Inputs::load(config)?;
    let dashboard = Dashboard::build(&inputs, config);
    info!(
        "Aggregated {} concepts delivered, {} presented rows",
        dashboard.summary.concepts_delivered(),
        inputs.presented_hits.records.len()
    );
    report::render(&dashboard, config).map_err(DashboardError::Render)
}

/// Build and publish. Nothing is written if any input is missing.
pub fn run(config: &DashboardConfig) -> Result<Vec<PathBuf>> {
    let html = build_html(config)?;
    publish::publish(&html, config)
}
