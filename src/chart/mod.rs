//! Chart models and the rendering seam
//!
//! Builders here turn records into backend-neutral chart descriptions.
//! A [`ChartRenderer`] turns those into embeddable markup; [`plotly`] is the
//! one backend we ship. The delivery timeline is plain HTML/CSS and lives in
//! [`timeline`].

pub mod plotly;
pub mod timeline;

pub use plotly::{PlotlyRenderer, PLOTLY_CDN};
pub use timeline::{render_timeline, Timeline, TimelineItem};

use crate::aggregate::DateSummary;
use crate::config::ChartSettings;
use crate::data::ProviderHitRecord;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

pub const NO_DATA: &str = "No data available.";

const HISTOGRAM_OPACITY: f64 = 0.75;

/// Produces embeddable markup for a chart. Implementations may keep state
/// across calls (e.g. whether a script library has been loaded yet), so
/// one renderer should be used for every chart on a page.
pub trait ChartRenderer {
    fn render(&mut self, chart: &Chart, div_id: &str) -> String;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Histogram(Histogram),
    Line(LineChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Histogram(h) => &h.title,
            Chart::Line(l) => &l.title,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Chart::Histogram(h) => h.series.iter().all(|s| s.values.is_empty()),
            Chart::Line(l) => l.points.is_empty(),
        }
    }
}

/// One concept's values in an overlaid histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSeries {
    pub name: String,
    pub values: Vec<f64>,
    /// Provider identifier per value, for hover text.
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<HistogramSeries>,
    pub bins: u32,
    pub opacity: f64,
}

/// Where a point's text sits relative to its marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelPosition {
    #[serde(rename = "top center")]
    TopCenter,
    #[serde(rename = "bottom center")]
    BottomCenter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinePoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
    pub label: String,
    pub position: LabelPosition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub points: Vec<LinePoint>,
    pub x_range: Option<(NaiveDate, NaiveDate)>,
    pub y_range: (f64, f64),
}

/// Total overpayment per provider, one overlaid series per concept.
pub fn overpayment_histogram(providers: &[ProviderHitRecord], settings: &ChartSettings) -> Chart {
    histogram_by_concept(
        providers,
        |p| p.total_overpayment,
        "Distribution of Total Overpayment per Provider",
        "Total Overpayment ($)",
        settings,
    )
}

/// Claim-hit count per provider, one overlaid series per concept.
pub fn claim_hits_histogram(providers: &[ProviderHitRecord], settings: &ChartSettings) -> Chart {
    histogram_by_concept(
        providers,
        |p| p.claim_hits.map(|v| v as f64),
        "Distribution of Number of Claim Hits per Provider",
        "Number of Claim Hits",
        settings,
    )
}

fn histogram_by_concept<F>(
    providers: &[ProviderHitRecord],
    value: F,
    title: &str,
    x_title: &str,
    settings: &ChartSettings,
) -> Chart
where
    F: Fn(&ProviderHitRecord) -> Option<f64>,
{
    let mut by_concept: BTreeMap<&str, HistogramSeries> = BTreeMap::new();

    for provider in providers {
        let (Some(concept), Some(v)) = (provider.concept.as_deref(), value(provider)) else {
            continue;
        };
        let series = by_concept.entry(concept).or_insert_with(|| HistogramSeries {
            name: concept.to_string(),
            values: Vec::new(),
            ids: Vec::new(),
        });
        series.values.push(v);
        series.ids.push(provider.billing_npi.clone().unwrap_or_default());
    }

    Chart::Histogram(Histogram {
        title: title.to_string(),
        x_title: x_title.to_string(),
        y_title: "Count of Providers".to_string(),
        series: by_concept.into_values().collect(),
        bins: settings.histogram_bins,
        opacity: HISTOGRAM_OPACITY,
    })
}

/// Total overpayment per delivery date, each point labeled with the
/// concepts delivered that day.
pub fn overpayment_line_chart(
    summaries: &[DateSummary],
    title: &str,
    settings: &ChartSettings,
) -> Chart {
    let threshold = settings.label_flip_threshold();
    let points: Vec<LinePoint> = summaries
        .iter()
        .map(|s| LinePoint {
            date: s.date,
            value: s.total_overpayment,
            label: s.label.clone(),
            position: match s.total_overpayment {
                Some(v) if v >= threshold => LabelPosition::BottomCenter,
                _ => LabelPosition::TopCenter,
            },
        })
        .collect();

    let pad = Duration::days(settings.x_padding_days);
    let x_range = match (points.first(), points.last()) {
        (Some(first), Some(last)) => Some((first.date - pad, last.date + pad)),
        _ => None,
    };

    Chart::Line(LineChart {
        title: title.to_string(),
        x_title: "Date of Client Delivery".to_string(),
        y_title: "Total Overpayment ($)".to_string(),
        points,
        x_range,
        y_range: (0.0, settings.y_ceiling),
    })
}

/// Proportional-position timeline of delivery dates.
pub fn timeline(summaries: &[DateSummary], title: &str) -> Timeline {
    let (Some(min), Some(max)) = (
        summaries.iter().map(|s| s.date).min(),
        summaries.iter().map(|s| s.date).max(),
    ) else {
        return Timeline {
            title: title.to_string(),
            items: Vec::new(),
        };
    };

    let span = (max - min).num_days().max(1) as f64;

    let mut items: Vec<TimelineItem> = summaries
        .iter()
        .map(|s| TimelineItem {
            date: s.date,
            position_pct: (s.date - min).num_days() as f64 / span * 100.0,
            label: s.label.clone(),
        })
        .collect();
    items.sort_by_key(|i| i.date);

    Timeline {
        title: title.to_string(),
        items,
    }
}
