//! Display formatting shared by every table, label and card.
//!
//! Missing values always render as [`PLACEHOLDER`], never as an empty
//! string or `NaN`.

use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

pub const PLACEHOLDER: &str = "—";

/// `Some(1234567.4)` → `"$1,234,567"`
pub fn currency(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("${}", grouped(v.round() as i64)),
        None => PLACEHOLDER.to_string(),
    }
}

/// `Some(12345)` → `"12,345"`
pub fn count(value: Option<u64>) -> String {
    match value {
        Some(v) => v.to_formatted_string(&Locale::en),
        None => PLACEHOLDER.to_string(),
    }
}

/// `Some(5.0)` → `"5.0 days"`
pub fn days(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.1} days", v),
        None => PLACEHOLDER.to_string(),
    }
}

/// ISO calendar date.
pub fn date(value: Option<NaiveDate>) -> String {
    match value {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// `"November 05, 2025"`, for the "As of" line.
pub fn long_date(value: NaiveDate) -> String {
    value.format("%B %d, %Y").to_string()
}

pub fn text(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => escape(s),
        _ => PLACEHOLDER.to_string(),
    }
}

fn grouped(v: i64) -> String {
    v.to_formatted_string(&Locale::en)
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode the characters that break a relative URL path segment.
pub fn url_path(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '%' => out.push_str("%25"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(currency(Some(1_234_567.0)), "$1,234,567");
        assert_eq!(currency(Some(2000.4)), "$2,000");
        assert_eq!(currency(Some(0.0)), "$0");
        assert_eq!(currency(Some(-1500.0)), "$-1,500");
    }

    #[test]
    fn test_missing_values_use_placeholder() {
        assert_eq!(currency(None), PLACEHOLDER);
        assert_eq!(currency(Some(f64::NAN)), PLACEHOLDER);
        assert_eq!(count(None), PLACEHOLDER);
        assert_eq!(days(None), PLACEHOLDER);
        assert_eq!(date(None), PLACEHOLDER);
        assert_eq!(text(Some("  ")), PLACEHOLDER);
    }

    #[test]
    fn test_count_grouping() {
        assert_eq!(count(Some(12345)), "12,345");
        assert_eq!(count(Some(7)), "7");
    }

    #[test]
    fn test_days_one_decimal() {
        assert_eq!(days(Some(5.0)), "5.0 days");
        assert_eq!(days(Some(6.333)), "6.3 days");
    }

    #[test]
    fn test_dates() {
        let d = NaiveDate::from_ymd_opt(2025, 11, 5).unwrap();
        assert_eq!(date(Some(d)), "2025-11-05");
        assert_eq!(long_date(d), "November 05, 2025");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
        assert_eq!(escape("O'Brien"), "O&#39;Brien");
    }

    #[test]
    fn test_url_path() {
        assert_eq!(url_path("Dup Billing #2"), "Dup%20Billing%20%232");
    }
}
