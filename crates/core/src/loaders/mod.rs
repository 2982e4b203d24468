//! Readers for the input files: holdings exports, the exchange listing,
//! model-fund weight sheets and override tables.
//!
//! `.csv` files go through the `csv` crate; `.xlsx`, `.xlsm`, `.xls` and
//! `.ods` through `calamine`. Either way a file becomes a grid of trimmed
//! strings before any column logic runs.

pub mod fund_weights;
pub mod holdings;
pub mod listing;
pub mod overrides;

use calamine::{open_workbook_auto, Reader};
use std::path::Path;

use crate::errors::CoreError;

/// Raw cell grid of a table, header row included.
pub type Table = Vec<Vec<String>>;

/// Read every row of a CSV file or one worksheet of a spreadsheet.
///
/// For spreadsheets, `sheet` selects the worksheet; when it is `None` or
/// absent from the workbook the first sheet is used.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table, CoreError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "txt" => read_csv(path),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_sheet(path, sheet),
        other => Err(CoreError::UnsupportedFileType(format!(
            "{} (.{other})",
            path.display()
        ))),
    }
}

fn read_csv(path: &Path) -> Result<Table, CoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn read_sheet(path: &Path, sheet: Option<&str>) -> Result<Table, CoreError> {
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_vec();

    let name = match sheet {
        Some(wanted) if names.iter().any(|n| n == wanted) => wanted.to_string(),
        _ => {
            let first = names
                .first()
                .cloned()
                .ok_or_else(|| CoreError::SheetNotFound(path.display().to_string()))?;
            if let Some(wanted) = sheet {
                tracing::warn!(
                    file = %path.display(),
                    wanted,
                    using = %first,
                    "Worksheet not found, reading the first sheet"
                );
            }
            first
        }
    };

    let range = workbook.worksheet_range(&name)?;
    Ok(range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
        .collect())
}

/// Index of the header cell equal to `name`, ignoring case and surrounding spaces.
pub(crate) fn column_index(header: &[String], name: &str, path: &Path) -> Result<usize, CoreError> {
    let wanted = name.trim();
    header
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| CoreError::MissingColumn {
            column: wanted.to_string(),
            file: path.display().to_string(),
        })
}

/// Parse a spreadsheet number such as `1,23,456.50`, `₹ 1200` or `12.5%`.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Cell at `idx`, or "" for short rows.
pub(crate) fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}
