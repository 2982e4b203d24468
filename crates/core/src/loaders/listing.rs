use std::path::Path;

use super::{cell, column_index, read_table};
use crate::errors::CoreError;
use crate::models::settings::ListingColumns;
use crate::models::ticker::ListingEntry;

/// Load the exchange's equity listing (e.g. NSE `EQUITY_L.csv`).
pub fn load_listing(path: &Path, columns: &ListingColumns) -> Result<Vec<ListingEntry>, CoreError> {
    let table = read_table(path, None)?;
    let Some((header, rows)) = table.split_first() else {
        return Ok(Vec::new());
    };

    let symbol_idx = column_index(header, &columns.symbol, path)?;
    let name_idx = column_index(header, &columns.company_name, path)?;

    let entries: Vec<ListingEntry> = rows
        .iter()
        .filter(|row| !cell(row, symbol_idx).is_empty() && !cell(row, name_idx).is_empty())
        .map(|row| ListingEntry::new(cell(row, symbol_idx), cell(row, name_idx)))
        .collect();

    tracing::info!(file = %path.display(), companies = entries.len(), "Listing loaded");
    Ok(entries)
}
