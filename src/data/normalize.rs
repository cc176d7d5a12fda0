//! Cell coercion: currency, grouped numbers, delivery dates.
//!
//! Every failure is local to one cell, which becomes [`Cell::Missing`].
//! Running the pass twice yields the same table.

use crate::data::table::{Cell, Table};
use chrono::{NaiveDate, NaiveDateTime};

const CURRENCY_MARKER: char = '$';

/// Accepted delivery-date layouts, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d-%b-%y",
    "%B %d, %Y",
    "%b %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions<'a> {
    /// Never coerced.
    pub text_columns: &'a [&'a str],
    /// Parsed as calendar dates.
    pub date_columns: &'a [&'a str],
    /// Known counts and amounts, coerced cell by cell whatever else the
    /// column holds.
    pub numeric_columns: &'a [&'a str],
}

/// Coerce every column of `table` in place.
pub fn normalize(table: &mut Table, options: &NormalizeOptions) {
    for idx in 0..table.columns.len() {
        let name = table.columns[idx].clone();
        if options.text_columns.contains(&name.as_str()) {
            continue;
        }

        if options.date_columns.contains(&name.as_str()) {
            coerce_column(table, idx, |s| parse_date(s).map(Cell::Date));
            continue;
        }

        if options.numeric_columns.contains(&name.as_str()) {
            coerce_column(table, idx, |s| parse_currency(s).map(Cell::Number));
            continue;
        }

        let has_currency = table
            .rows
            .iter()
            .any(|row| matches!(&row[idx], Cell::Text(s) if s.contains(CURRENCY_MARKER)));

        if has_currency {
            coerce_column(table, idx, |s| parse_currency(s).map(Cell::Number));
        } else if is_numeric_column(table, idx) {
            coerce_column(table, idx, |s| parse_number(s).map(Cell::Number));
        }
    }
}

/// Replace every `Text` cell of a column with `parse(text)`, or `Missing`.
fn coerce_column<F>(table: &mut Table, idx: usize, parse: F)
where
    F: Fn(&str) -> Option<Cell>,
{
    for row in &mut table.rows {
        if let Cell::Text(s) = &row[idx] {
            row[idx] = parse(s).unwrap_or(Cell::Missing);
        }
    }
}

/// An unrecognized column is numeric when it has text and all of it parses
/// once grouping commas are removed. Already-numeric cells count as numeric.
fn is_numeric_column(table: &Table, idx: usize) -> bool {
    let mut saw_text = false;
    for row in &table.rows {
        match &row[idx] {
            Cell::Text(s) => {
                saw_text = true;
                if parse_number(s).is_none() {
                    return false;
                }
            }
            Cell::Date(_) => return false,
            Cell::Number(_) | Cell::Missing => {}
        }
    }
    saw_text
}

/// `"$1,234.50"` → `1234.5`. Accepts accounting negatives like `"($1,000)"`.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != CURRENCY_MARKER && *c != ',' && !c.is_whitespace())
        .collect();

    if let Some(inner) = cleaned.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        return parse_plain(inner).map(|v| -v);
    }
    parse_plain(&cleaned)
}

/// `"12,345"` → `12345`. Currency markers are not accepted here.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    parse_plain(&cleaned)
}

fn parse_plain(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Lenient date parsing; `None` when nothing matches.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}
