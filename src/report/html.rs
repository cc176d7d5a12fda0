//! HTML dashboard with inline styling and Plotly charts

use crate::aggregate::{ConceptDescription, DeliveryCadence, Summary};
use crate::chart::{render_timeline, ChartRenderer, PlotlyRenderer, NO_DATA};
use crate::config::{DashboardConfig, VISUALS_DIR};
use crate::data::HitColumn;
use crate::report::format::{self, escape};
use crate::report::{Dashboard, StatsTable, TimelineSection};
use std::io::{self, Write};

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif; color: #222; }
h1, h2, h3 { color: #0b5cab; }
.container { max-width: 1100px; margin: 0 auto; padding: 20px; }
.summary { display: grid; grid-template-columns: repeat(2, 1fr); gap: 16px; }
.card { background: #f8fafc; border: 1px solid #e2e8f0; border-radius: 8px; padding: 16px; }
.small { color: #475569; font-size: 0.9em; }
.table-wrap { overflow-x: auto; margin: 12px 0; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #e2e8f0; padding: 8px 10px; text-align: left; }
th { background: #eff6ff; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
.caption { font-weight: 600; margin: 8px 0; }
.note { background: #fff7ed; border: 1px solid #fed7aa; padding: 8px; border-radius: 6px; }
.chart-empty { border: 1px dashed #cbd5e1; border-radius: 8px; padding: 16px; margin: 12px 0; }
.timeline { margin: 48px 0 24px; }
.timeline-title { font-weight: 600; margin-bottom: 44px; }
.timeline-line { position: relative; height: 4px; background: #e2e8f0; border-radius: 2px; }
.timeline-line::after { content: ''; position: absolute; right: -12px; top: -8px; border-top: 10px solid transparent; border-bottom: 10px solid transparent; border-left: 12px solid #94a3b8; }
.timeline-tick { position: absolute; top: -4px; width: 12px; height: 12px; background: #0b5cab; border-radius: 50%; transform: translateX(-50%); }
.timeline-label { position: absolute; bottom: 14px; transform: translateX(-50%); white-space: normal; font-size: 0.85em; color: #334155; background: #f8fafc; padding: 4px 8px; border: 1px solid #e2e8f0; border-radius: 6px; max-width: 320px; box-shadow: 0 1px 2px rgba(0,0,0,0.04); }
.brand-bar { display: flex; justify-content: space-between; align-items: center; gap: 16px; margin-bottom: 8px; }
.brand-bar img { height: 96px; object-fit: contain; }
.footer { margin-top: 2rem; padding-top: 1rem; border-top: 1px solid #e2e8f0; color: #475569; font-size: 0.85em; text-align: center; }
"#;

pub fn write<W: Write>(writer: &mut W, dashboard: &Dashboard, config: &DashboardConfig) -> io::Result<()> {
    // Charts render in page order so only the first one pulls in the library.
    let mut renderer = PlotlyRenderer::new();
    let timeline_html = dashboard
        .timeline
        .as_ref()
        .map(|section| render_timeline_section(section, &mut renderer))
        .unwrap_or_default();
    let paid_hist = renderer.render(&dashboard.overpayment_histogram, "paid_hist");
    let claims_hist = renderer.render(&dashboard.claims_histogram, "claims_hist");

    write!(
        writer,
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Executive Dashboard — FWA Deliverables</title>
<style>{style}</style>
</head>
<body>
<div class="container">
{brand_bar}
  <h1>FWA Deliverables — Executive Tracking Dashboard</h1>
  <p class="small">This dashboard summarizes delivered FWA concepts, key statistics, and provider-level distributions.</p>
  <p class="small">As of {as_of}</p>

  <h2>Aggregate Summary</h2>
{summary}
  <h2>FWA Concepts Presented</h2>
  <div class="table-wrap">
{concepts}
  </div>

  <h2>Concept-Level Statistics — Presented Hits</h2>
  <div class="table-wrap">
{presented_stats}
  </div>

  <h2>Concept-Level Statistics — All Identified Hits</h2>
  <div class="table-wrap">
{all_stats}
  </div>
{timeline}
  <h2>Provider-Level Distributions Across All Identified Hits</h2>
  <p class="small">Distribution of Total Overpayment and Number of Claim Hits per provider, shown by concept.</p>
{paid_hist}
{claims_hist}
  <div class="footer">Generated by fwa-dashboard {version}</div>
</div>
</body>
</html>
"#,
        style = STYLE,
        brand_bar = brand_bar(&dashboard.logos),
        as_of = format::long_date(config.as_of),
        summary = summary_cards(&dashboard.summary),
        concepts = concepts_table(&dashboard.concepts, config),
        presented_stats = stats_table(&dashboard.presented_stats),
        all_stats = stats_table(&dashboard.all_stats),
        timeline = timeline_html,
        paid_hist = paid_hist,
        claims_hist = claims_hist,
        version = env!("CARGO_PKG_VERSION"),
    )?;

    Ok(())
}

fn brand_bar(logos: &[String]) -> String {
    if logos.is_empty() {
        return String::new();
    }
    let images: String = logos
        .iter()
        .map(|name| {
            format!(
                "    <img src=\"{}/{}\" alt=\"{}\">\n",
                VISUALS_DIR,
                escape(&format::url_path(name)),
                escape(logo_alt(name))
            )
        })
        .collect();
    format!("  <div class=\"brand-bar\">\n{}  </div>", images)
}

fn logo_alt(file_name: &str) -> &str {
    file_name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(file_name)
}

fn summary_cards(summary: &Summary) -> String {
    let card = |caption: &str, headline: String, detail: String| {
        format!(
            "  <div class=\"card\">\n    <div class=\"caption\">{}</div>\n    <div>{}</div>\n    <div class=\"small\">{}</div>\n  </div>\n",
            caption, headline, detail
        )
    };

    let presented = &summary.presented;
    let all = &summary.all;

    let mut out = String::from("<div class=\"summary\">\n");
    out.push_str(&card(
        "Number of Concepts Delivered to Date",
        format!("<strong>{}</strong>", summary.concepts_delivered()),
        "Distinct concepts in Presented Hits.".to_string(),
    ));
    out.push_str(&card(
        "Total Estimated Overpayment",
        format!("<strong>{}</strong> (presented)", format::currency(Some(presented.total_overpayment))),
        format!("Overall: {}", format::currency(Some(all.total_overpayment))),
    ));
    out.push_str(&card(
        "Providers Flagged",
        format!("<strong>{}</strong> presented", format::count(Some(presented.provider_hits))),
        format!("Overall flagged: {}", format::count(Some(all.provider_hits))),
    ));
    out.push_str(&card(
        "Claims Flagged",
        format!("<strong>{}</strong> presented", format::count(Some(presented.claim_hits))),
        format!("Overall flagged: {}", format::count(Some(all.claim_hits))),
    ));
    out.push_str("</div>\n");
    out
}

fn table(headers: &[&str], rows: Vec<String>) -> String {
    let head: String = headers
        .iter()
        .map(|h| format!("<th>{}</th>", escape(h)))
        .collect();
    let body = if rows.is_empty() {
        format!(
            "<tr><td colspan=\"{}\" class=\"small\">{}</td></tr>",
            headers.len().max(1),
            NO_DATA
        )
    } else {
        rows.join("\n")
    };
    format!(
        "<table>\n<thead><tr>{}</tr></thead>\n<tbody>\n{}\n</tbody>\n</table>",
        head, body
    )
}

fn concepts_table(concepts: &[ConceptDescription], config: &DashboardConfig) -> String {
    let rows = concepts
        .iter()
        .map(|c| {
            let href = config.whitepaper_href(&format::url_path(&c.concept));
            format!(
                "<tr><td><a href=\"{}\" target=\"_blank\" title=\"{} white paper\">📄</a></td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&href),
                escape(&c.concept),
                escape(&c.concept),
                format::date(c.delivery_date),
                format::text(c.description.as_deref()),
            )
        })
        .collect();

    table(
        &["White paper", "Concept", "Date of Client Delivery", "Description"],
        rows,
    )
}

fn stats_table(stats: &StatsTable) -> String {
    let headers: Vec<&str> = stats.columns.iter().map(|c| c.header()).collect();
    let rows = stats
        .rows
        .iter()
        .map(|row| {
            let cells: String = stats
                .columns
                .iter()
                .map(|&column| match column {
                    HitColumn::Concept => format!("<td>{}</td>", escape(&row.concept)),
                    HitColumn::DeliveryDate => {
                        format!("<td>{}</td>", format::date(row.record.delivery_date))
                    }
                    c if c.is_count() => {
                        format!("<td class=\"num\">{}</td>", format::count(row.record.count(c)))
                    }
                    c => format!("<td class=\"num\">{}</td>", format::currency(row.record.currency(c))),
                })
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();

    table(&headers, rows)
}

fn cadence_table(cadence: &DeliveryCadence) -> String {
    let rows = cadence
        .entries
        .iter()
        .map(|e| {
            format!(
                "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td></tr>",
                escape(&e.concept),
                e.date.format("%Y-%m-%d"),
                e.delta_days
            )
        })
        .collect();
    table(&["Concept", "Date of Client Delivery", "Delta Days"], rows)
}

fn render_timeline_section(section: &TimelineSection, renderer: &mut dyn ChartRenderer) -> String {
    let baseline = section
        .cadence
        .baseline
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| format::PLACEHOLDER.to_string());

    format!(
        r#"
  <h2>Live Tracker — Estimated Identified Overpayment Over Time</h2>
  <p class="small">Live tracking of total overpayments identified over time.</p>
  <h3>Delivery Cadence</h3>
  <p class="small">Days since baseline ({baseline}); average successive cadence: <strong>{average}</strong>.</p>
  <div class="table-wrap">
{cadence}
  </div>
  <h3>Presented Hits</h3>
{presented_line}
{presented_timeline}
  <h3>All Identified Hits</h3>
{all_line}
{all_timeline}
"#,
        baseline = baseline,
        average = format::days(section.cadence.average_gap_days),
        cadence = cadence_table(&section.cadence),
        presented_line = renderer.render(&section.presented_line, "overpayment_presented"),
        presented_timeline = render_timeline(&section.presented_timeline),
        all_line = renderer.render(&section.all_line, "overpayment_all"),
        all_timeline = render_timeline(&section.all_timeline),
    )
}
