//! CSV loading
//!
//! Reads the exports as raw text cells. Type coercion happens afterwards in
//! [`crate::data::normalize`], so this layer only cares about getting every
//! field out of the file intact: headers trimmed, Latin-1 bytes decoded,
//! ragged rows padded.

use crate::data::table::{Cell, Table};
use crate::error::{DashboardError, Result};
use std::path::Path;
use tracing::debug;

/// Values that load as `Missing` regardless of column.
const NA_VALUES: &[&str] = &["NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "#N/A"];

/// Load a CSV file into a [`Table`] of text cells.
///
/// Columns listed in `text_columns` are tagged so the normalizer never
/// coerces them (identifiers like `00123` must survive as written).
pub fn load_table<P: AsRef<Path>>(path: P, text_columns: &[&str]) -> Result<Table> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(DashboardError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| DashboardError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader
        .byte_headers()
        .map_err(|source| DashboardError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let name = decode_field(raw);
            let name = if i == 0 {
                name.trim_start_matches('\u{feff}').to_string()
            } else {
                name
            };
            name.trim().to_string()
        })
        .collect();

    let mut table = Table::new(columns);
    let width = table.columns.len();

    for record in reader.byte_records() {
        let record = record.map_err(|source| DashboardError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        if record.iter().all(|f| f.iter().all(u8::is_ascii_whitespace)) {
            continue;
        }

        let mut row: Vec<Cell> = record.iter().take(width).map(load_cell).collect();
        row.resize(width, Cell::Missing);
        table.rows.push(row);
    }

    mark_text_columns(&mut table, text_columns);

    debug!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        width,
        path.display()
    );

    Ok(table)
}

/// Decode a field as UTF-8, falling back to Latin-1 when the bytes are not
/// valid UTF-8.
pub fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn load_cell(bytes: &[u8]) -> Cell {
    let text = decode_field(bytes);
    let trimmed = text.trim();
    if trimmed.is_empty() || NA_VALUES.contains(&trimmed) {
        Cell::Missing
    } else {
        Cell::Text(text)
    }
}

/// Text-preserved columns keep their exact string, whitespace aside.
fn mark_text_columns(table: &mut Table, text_columns: &[&str]) {
    for name in text_columns {
        if let Some(idx) = table.column_index(name) {
            for row in &mut table.rows {
                if let Cell::Text(s) = &row[idx] {
                    row[idx] = Cell::Text(s.trim().to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_table(dir.path().join("nope.csv"), &[]).unwrap_err();
        assert!(matches!(err, DashboardError::MissingInput { .. }));
    }

    #[test]
    fn test_headers_are_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "a.csv", b" Concept ,Total Overpayment  \nA,\"$1,000\"\n");
        let table = load_table(&path, &[]).unwrap();
        assert_eq!(table.columns, vec!["Concept", "Total Overpayment"]);
        assert_eq!(table.cell(0, "Total Overpayment"), &Cell::Text("$1,000".into()));
    }

    #[test]
    fn test_bom_stripped_from_first_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "a.csv", "\u{feff}Concept\nA\n".as_bytes());
        let table = load_table(&path, &[]).unwrap();
        assert!(table.has_column("Concept"));
    }

    #[test]
    fn test_provider_id_keeps_leading_zeros() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "p.csv", b"Billing NPI,Concept\n00123,A\n");
        let table = load_table(&path, &["Billing NPI"]).unwrap();
        assert_eq!(table.cell(0, "Billing NPI"), &Cell::Text("00123".into()));
    }

    #[test]
    fn test_latin1_bytes_decoded() {
        let dir = tempfile::tempdir().unwrap();
        // 0xE9 is 'é' in Latin-1 and invalid as a lone UTF-8 byte
        let path = write_csv(&dir, "l.csv", b"Concept,Description\nA,Caf\xe9 billing\n");
        let table = load_table(&path, &[]).unwrap();
        assert_eq!(table.cell(0, "Description"), &Cell::Text("Café billing".into()));
    }

    #[test]
    fn test_ragged_rows_padded_and_extras_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "r.csv", b"Concept,Description\nA\nB,desc,extra\n");
        let table = load_table(&path, &[]).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.cell(0, "Description").is_missing());
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn test_blank_and_na_cells_are_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "n.csv", b"Concept,Total Overpayment\nA,  \nB,N/A\n,,\n");
        let table = load_table(&path, &[]).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.cell(0, "Total Overpayment").is_missing());
        assert!(table.cell(1, "Total Overpayment").is_missing());
    }
}
