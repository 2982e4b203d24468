use std::path::Path;

use super::{cell, read_table};
use crate::errors::CoreError;

/// Load `security_name,symbol` pairs. A header row naming those columns is
/// optional; rows with an empty name or symbol are ignored.
pub fn load_overrides(path: &Path) -> Result<Vec<(String, String)>, CoreError> {
    let table = read_table(path, None)?;
    let mut rows = table.as_slice();

    if let Some(first) = rows.first() {
        let first_cell = cell(first, 0).to_ascii_lowercase();
        if first_cell.contains("name") || first_cell.contains("security") {
            rows = &rows[1..];
        }
    }

    let pairs: Vec<(String, String)> = rows
        .iter()
        .map(|row| (cell(row, 0).to_string(), cell(row, 1).to_string()))
        .filter(|(name, symbol)| !name.is_empty() && !symbol.is_empty())
        .collect();

    tracing::info!(file = %path.display(), overrides = pairs.len(), "Overrides loaded");
    Ok(pairs)
}
