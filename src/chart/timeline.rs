//! Arrow-of-time delivery timeline, rendered as plain HTML/CSS.

use super::NO_DATA;
use crate::report::format::escape;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineItem {
    pub date: NaiveDate,
    /// Horizontal offset within the observed date span, 0..=100.
    pub position_pct: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub title: String,
    pub items: Vec<TimelineItem>,
}

const LINE_COLOR: &str = "#94a3b8";
const TICK_COLOR: &str = "#0b5cab";

pub fn render_timeline(timeline: &Timeline) -> String {
    let title = escape(&timeline.title);

    if timeline.items.is_empty() {
        return format!(
            "<div class='timeline'><div class='timeline-title'>{}</div><div class='small'>{}</div></div>\n",
            title, NO_DATA
        );
    }

    let items: String = timeline
        .items
        .iter()
        .map(|item| {
            format!(
                "<div class='timeline-label' style='left:{pos:.2}%'>{date}<br>{label}</div>\
                 <div class='timeline-tick' style='left:{pos:.2}%; background:{tick}'></div>",
                pos = item.position_pct,
                date = item.date.format("%Y-%m-%d"),
                label = escape(&item.label),
                tick = TICK_COLOR,
            )
        })
        .collect();

    format!(
        "<div class='timeline'><div class='timeline-title'>{}</div>\
         <div class='timeline-line' style='background:{}'>{}</div></div>\n",
        title, LINE_COLOR, items
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_timeline_placeholder() {
        let html = render_timeline(&Timeline {
            title: "Presented Hits".into(),
            items: vec![],
        });
        assert!(html.contains("Presented Hits"));
        assert!(html.contains(NO_DATA));
        assert!(!html.contains("timeline-tick"));
    }

    #[test]
    fn test_items_positioned_and_escaped() {
        let html = render_timeline(&Timeline {
            title: "All".into(),
            items: vec![TimelineItem {
                date: NaiveDate::from_ymd_opt(2025, 11, 15).unwrap(),
                position_pct: 25.0,
                label: "A&B ($2,000)".into(),
            }],
        });
        assert!(html.contains("left:25.00%"));
        assert!(html.contains("2025-11-15<br>A&amp;B ($2,000)"));
    }
}
