//! Plotly.js backend
//!
//! Charts are emitted as a `<div>` plus an inline `Plotly.newPlot` call.
//! The library itself comes from the CDN, loaded by the first chart that
//! actually draws something; later charts on the page reuse it.

use super::{Chart, ChartRenderer, Histogram, LabelPosition, LineChart, NO_DATA};
use crate::report::format::escape;
use serde::Serialize;
use serde_json::{json, Value};

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const CHART_HEIGHT: u32 = 480;

const HISTOGRAM_HOVER: &str = "Billing NPI: %{customdata}<br>%{x}<extra>%{fullData.name}</extra>";
const LINE_HOVER: &str =
    "<b>%{x|%Y-%m-%d}</b><br>Total Overpayment: $%{y:,}<br>%{text}<extra></extra>";

#[derive(Serialize)]
struct HistogramTrace<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
    x: &'a [f64],
    customdata: &'a [String],
    nbinsx: u32,
    opacity: f64,
    hovertemplate: &'static str,
}

#[derive(Serialize)]
struct TextFont {
    size: u32,
}

#[derive(Serialize)]
struct ScatterTrace<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    mode: &'static str,
    x: Vec<String>,
    y: Vec<Option<f64>>,
    text: Vec<&'a str>,
    textposition: Vec<LabelPosition>,
    textfont: TextFont,
    cliponaxis: bool,
    hovertemplate: &'static str,
}

#[derive(Debug, Default)]
pub struct PlotlyRenderer {
    library_loaded: bool,
}

impl PlotlyRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn library_loaded(&self) -> bool {
        self.library_loaded
    }

    fn library_tag(&mut self) -> String {
        if self.library_loaded {
            String::new()
        } else {
            self.library_loaded = true;
            format!("<script src=\"{}\" charset=\"utf-8\"></script>\n", PLOTLY_CDN)
        }
    }
}

impl ChartRenderer for PlotlyRenderer {
    fn render(&mut self, chart: &Chart, div_id: &str) -> String {
        if chart.is_empty() {
            return placeholder(chart.title());
        }

        let (data, layout) = match chart {
            Chart::Histogram(h) => histogram_figure(h),
            Chart::Line(l) => line_figure(l),
        };

        format!(
            r#"{lib}<div id="{id}" class="plotly-chart" style="height:{height}px; width:100%;"></div>
<script>Plotly.newPlot("{id}", {data}, {layout}, {{"responsive": true}});</script>
"#,
            lib = self.library_tag(),
            id = escape(div_id),
            height = CHART_HEIGHT,
            data = script_json(&data),
            layout = script_json(&layout),
        )
    }
}

/// Shown in place of a chart with nothing to draw.
pub fn placeholder(title: &str) -> String {
    format!(
        "<div class='chart-empty'><div class='caption'>{}</div><div class='small'>{}</div></div>\n",
        escape(title),
        NO_DATA
    )
}

fn histogram_figure(h: &Histogram) -> (Value, Value) {
    let traces: Vec<HistogramTrace> = h
        .series
        .iter()
        .map(|s| HistogramTrace {
            kind: "histogram",
            name: &s.name,
            x: &s.values,
            customdata: &s.ids,
            nbinsx: h.bins,
            opacity: h.opacity,
            hovertemplate: HISTOGRAM_HOVER,
        })
        .collect();

    let layout = json!({
        "title": { "text": h.title },
        "barmode": "overlay",
        "margin": { "l": 40, "r": 40, "t": 60, "b": 40 },
        "legend": { "title": { "text": "Concept" } },
        "xaxis": { "title": { "text": h.x_title } },
        "yaxis": { "title": { "text": h.y_title } },
    });

    (json!(traces), layout)
}

fn line_figure(l: &LineChart) -> (Value, Value) {
    let trace = ScatterTrace {
        kind: "scatter",
        mode: "lines+markers+text",
        x: l.points.iter().map(|p| p.date.format("%Y-%m-%d").to_string()).collect(),
        y: l.points.iter().map(|p| p.value).collect(),
        text: l.points.iter().map(|p| p.label.as_str()).collect(),
        textposition: l.points.iter().map(|p| p.position).collect(),
        textfont: TextFont { size: 11 },
        cliponaxis: false,
        hovertemplate: LINE_HOVER,
    };
    let data = json!([trace]);

    let mut xaxis = json!({ "title": { "text": l.x_title }, "type": "date" });
    if let Some((start, end)) = l.x_range {
        xaxis["range"] = json!([
            start.format("%Y-%m-%d").to_string(),
            end.format("%Y-%m-%d").to_string()
        ]);
    }

    let layout = json!({
        "title": { "text": l.title },
        "margin": { "l": 60, "r": 60, "t": 100, "b": 60 },
        "showlegend": false,
        "xaxis": xaxis,
        "yaxis": { "title": { "text": l.y_title }, "range": [l.y_range.0, l.y_range.1] },
    });

    (data, layout)
}

/// JSON safe to inline inside a `<script>` element.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{HistogramSeries, LinePoint};
    use chrono::NaiveDate;

    fn histogram(values: Vec<f64>) -> Chart {
        Chart::Histogram(Histogram {
            title: "Claims".into(),
            x_title: "x".into(),
            y_title: "y".into(),
            series: vec![HistogramSeries {
                name: "A".into(),
                ids: values.iter().map(|_| "00123".to_string()).collect(),
                values,
            }],
            bins: 50,
            opacity: 0.75,
        })
    }

    #[test]
    fn test_library_loaded_once() {
        let mut renderer = PlotlyRenderer::new();
        let first = renderer.render(&histogram(vec![1.0]), "a");
        let second = renderer.render(&histogram(vec![2.0]), "b");
        assert!(first.contains(PLOTLY_CDN));
        assert!(!second.contains(PLOTLY_CDN));
        assert!(second.contains("Plotly.newPlot(\"b\""));
    }

    #[test]
    fn test_empty_chart_renders_placeholder_without_loading_library() {
        let mut renderer = PlotlyRenderer::new();
        let html = renderer.render(&histogram(vec![]), "a");
        assert!(html.contains(NO_DATA));
        assert!(!renderer.library_loaded());

        let next = renderer.render(&histogram(vec![3.0]), "b");
        assert!(next.contains(PLOTLY_CDN));
    }

    #[test]
    fn test_histogram_payload() {
        let mut renderer = PlotlyRenderer::new();
        let html = renderer.render(&histogram(vec![1.0, 2.0]), "h");
        assert!(html.contains("\"nbinsx\":50"));
        assert!(html.contains("\"barmode\":\"overlay\""));
        assert!(html.contains("\"opacity\":0.75"));
        assert!(html.contains("\"00123\""));
        assert!(html.contains("\"type\":\"histogram\""));
    }

    #[test]
    fn test_label_positions_serialize_as_plotly_names() {
        let v = json!([LabelPosition::TopCenter, LabelPosition::BottomCenter]);
        assert_eq!(v.to_string(), "[\"top center\",\"bottom center\"]");
    }

    #[test]
    fn test_line_payload() {
        let d = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap();
        let chart = Chart::Line(LineChart {
            title: "Over time".into(),
            x_title: "x".into(),
            y_title: "y".into(),
            points: vec![LinePoint {
                date: d,
                value: Some(2000.0),
                label: "B ($2,000)".into(),
                position: LabelPosition::TopCenter,
            }],
            x_range: Some((d, d)),
            y_range: (0.0, 12_000_000.0),
        });
        let html = PlotlyRenderer::new().render(&chart, "line");
        assert!(html.contains("\"textposition\":[\"top center\"]"));
        assert!(html.contains("\"type\":\"scatter\""));
        assert!(html.contains("\"range\":[0.0,12000000.0]"));
        assert!(html.contains("\"2025-11-15\""));
        assert!(html.contains("B ($2,000)"));
    }

    #[test]
    fn test_script_json_cannot_close_script_tag() {
        let v = json!({ "name": "</script><b>" });
        assert!(!script_json(&v).contains("</script>"));
    }
}
