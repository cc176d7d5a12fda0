//! fwa-dashboard - Executive dashboard for FWA concept deliveries
//!
//! Turns the CSV exports produced for each fraud/waste/abuse (FWA) concept
//! delivery into a single static HTML page: headline totals, concept
//! tables, a delivery timeline and provider-level distributions.
//!
//! # Pipeline
//!
//! 1. **Load** ([`data::loader`]): read the "All Hits", "Presented Hits" and
//!    provider-level exports. Headers are trimmed; provider identifiers stay
//!    text so `00123` is never turned into `123`.
//! 2. **Normalize** ([`data::normalize`]): `$1,234` → `1234.0`, grouped
//!    counts → numbers, delivery dates → calendar dates. Bad cells become
//!    missing, never errors.
//! 3. **Aggregate** ([`aggregate`]): totals per subset, concept tables,
//!    delivery cadence and per-date summaries.
//! 4. **Chart** ([`chart`]): histograms, line charts and timelines behind the
//!    [`chart::ChartRenderer`] seam.
//! 5. **Assemble** ([`report`]): one self-contained HTML document.
//! 6. **Publish** ([`publish`]): write the page and mirror `Whitepapers/`
//!    and `visuals/` next to each copy.
//!
//! # Quick Start
//!
//! ```no_run
//! use fwa_dashboard::{pipeline, DashboardConfig};
//!
//! let config = DashboardConfig::from_env()?;
//! for path in pipeline::run(&config)? {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), fwa_dashboard::DashboardError>(())
//! ```
//!
//! # Missing Data
//!
//! | Situation | Result |
//! |-----------|--------|
//! | Required CSV absent | [`DashboardError::MissingInput`], nothing written |
//! | Unparseable cell | Treated as missing; sums skip it |
//! | Missing value in a table | Rendered as `—` |
//! | Empty table or chart input | "No data available." placeholder |

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod publish;
pub mod report;

pub use aggregate::{AggregateMetrics, DateSummary, DeliveryCadence, Summary};
pub use config::{ChartSettings, DashboardConfig};
pub use data::{HitRecord, HitTable, Inputs, ProviderHitRecord};
pub use error::{DashboardError, Result};
pub use report::Dashboard;
