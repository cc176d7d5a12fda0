//! Run configuration
//!
//! Everything that would otherwise be read ambiently (base path for links,
//! extra output directory, input file names, presentation constants) lives
//! in [`DashboardConfig`] and is passed explicitly to each stage.

use crate::error::{DashboardError, Result};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

pub const DEFAULT_ALL_HITS_FILE: &str = "All Hits - Summary Statistics.csv";
pub const DEFAULT_PRESENTED_HITS_FILE: &str = "Presented Hits - Summary Statistics.csv";
pub const DEFAULT_PROVIDER_HITS_FILE: &str = "All Provider Hits.csv";

pub const REPORTS_DIR: &str = "reports";
pub const DASHBOARD_FILE: &str = "executive-dashboard.html";
pub const WHITEPAPERS_DIR: &str = "Whitepapers";
pub const VISUALS_DIR: &str = "visuals";

/// Day zero for the cadence table's signed offsets.
pub const DEFAULT_BASELINE: (i32, u32, u32) = (2025, 11, 5);

/// Presentation constants for the time-series charts. Tuned to the
/// observed data range, so they are overridable rather than baked in.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub y_ceiling: f64,
    pub label_flip_ratio: f64,
    pub x_padding_days: i64,
    pub histogram_bins: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            y_ceiling: 12_000_000.0,
            label_flip_ratio: 0.9,
            x_padding_days: 10,
            histogram_bins: 50,
        }
    }
}

impl ChartSettings {
    /// Values at or above this are labeled below their marker.
    pub fn label_flip_threshold(&self) -> f64 {
        self.y_ceiling * self.label_flip_ratio
    }
}

/// Names of the three source files, relative to the data directory.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFiles {
    pub all_hits: String,
    pub presented_hits: String,
    pub provider_hits: String,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            all_hits: DEFAULT_ALL_HITS_FILE.to_string(),
            presented_hits: DEFAULT_PRESENTED_HITS_FILE.to_string(),
            provider_hits: DEFAULT_PROVIDER_HITS_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Source root: holds the CSV inputs and the asset directories, and
    /// receives the root-level copy of the dashboard.
    pub data_dir: PathBuf,
    /// Prefix for whitepaper links when hosted under a subpath. No trailing `/`.
    pub base_path: String,
    /// Extra destination, relative to `data_dir` unless absolute.
    pub output_dir: Option<PathBuf>,
    pub inputs: InputFiles,
    /// Include the delivery cadence table, line charts and timelines.
    pub extended: bool,
    pub baseline: NaiveDate,
    pub charts: ChartSettings,
    /// Date printed in the "As of" line.
    pub as_of: NaiveDate,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let (y, m, d) = DEFAULT_BASELINE;
        Self {
            data_dir: PathBuf::from("."),
            base_path: String::new(),
            output_dir: None,
            inputs: InputFiles::default(),
            extended: true,
            baseline: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
            charts: ChartSettings::default(),
            as_of: Local::now().date_naive(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables (and `.env`, if present)
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Unset or blank
    /// keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(dir) = get("DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(base) = get("BASE_PATH") {
            config.set_base_path(&base);
        }
        config.output_dir = get("OUTPUT_DIR").map(PathBuf::from);
        if let Some(file) = get("PROVIDER_HITS_FILE") {
            config.inputs.provider_hits = file;
        }
        if let Some(baseline) = get("CADENCE_BASELINE") {
            config.baseline = parse_baseline(&baseline)?;
        }

        Ok(config)
    }

    pub fn set_base_path(&mut self, base: &str) {
        self.base_path = base.trim().trim_end_matches('/').to_string();
    }

    pub fn input_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir.join(REPORTS_DIR)
    }

    /// Resolved extra output directory, if configured.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output_dir.as_ref().map(|dir| resolve_under(&self.data_dir, dir))
    }

    /// Link target for a concept's whitepaper PDF.
    pub fn whitepaper_href(&self, concept: &str) -> String {
        let file = format!("{}/{}.pdf", WHITEPAPERS_DIR, concept);
        if self.base_path.is_empty() {
            file
        } else {
            format!("{}/{}", self.base_path, file)
        }
    }
}

pub fn parse_baseline(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        DashboardError::Config(format!("invalid baseline date '{}': {}", value, e))
    })
}

fn resolve_under(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = DashboardConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.base_path, "");
        assert!(config.output_dir.is_none());
        assert!(config.extended);
        assert_eq!(config.baseline, NaiveDate::from_ymd_opt(2025, 11, 5).unwrap());
        assert_eq!(config.inputs, InputFiles::default());
    }

    #[test]
    fn test_base_path_trailing_slash_trimmed() {
        let config = DashboardConfig::from_lookup(lookup_from(&[("BASE_PATH", "/fwa/")])).unwrap();
        assert_eq!(config.base_path, "/fwa");
        assert_eq!(config.whitepaper_href("Upcoding"), "/fwa/Whitepapers/Upcoding.pdf");
    }

    #[test]
    fn test_whitepaper_href_relative_without_base_path() {
        let config = DashboardConfig::default();
        assert_eq!(config.whitepaper_href("Upcoding"), "Whitepapers/Upcoding.pdf");
    }

    #[test]
    fn test_blank_output_dir_is_none() {
        let config = DashboardConfig::from_lookup(lookup_from(&[("OUTPUT_DIR", "   ")])).unwrap();
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_output_path_resolves_relative_to_data_dir() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("DATA_DIR", "/srv/fwa"),
            ("OUTPUT_DIR", "site"),
        ]))
        .unwrap();
        assert_eq!(config.output_path(), Some(PathBuf::from("/srv/fwa/site")));
        assert_eq!(config.reports_dir(), PathBuf::from("/srv/fwa/reports"));
    }

    #[test]
    fn test_invalid_baseline_is_config_error() {
        let result = DashboardConfig::from_lookup(lookup_from(&[("CADENCE_BASELINE", "soon")]));
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_provider_file_override() {
        let config = DashboardConfig::from_lookup(lookup_from(&[(
            "PROVIDER_HITS_FILE",
            "Presented Provider Hits.csv",
        )]))
        .unwrap();
        assert_eq!(config.inputs.provider_hits, "Presented Provider Hits.csv");
    }

    #[test]
    fn test_label_flip_threshold() {
        let settings = ChartSettings::default();
        assert_eq!(settings.label_flip_threshold(), 10_800_000.0);
    }
}
