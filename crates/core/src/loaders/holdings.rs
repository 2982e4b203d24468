use std::path::Path;

use super::{cell, column_index, parse_number, read_table};
use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::settings::HoldingColumns;

/// Load holdings from a CSV or spreadsheet export.
///
/// Rows missing the investor or security name, or whose quantity or current
/// value is not a number, are skipped.
pub fn load_holdings(path: &Path, columns: &HoldingColumns) -> Result<Vec<Holding>, CoreError> {
    let table = read_table(path, columns.sheet.as_deref())?;
    let Some((header, rows)) = table.split_first() else {
        return Ok(Vec::new());
    };

    let investor_idx = column_index(header, &columns.investor, path)?;
    let security_idx = column_index(header, &columns.security, path)?;
    let quantity_idx = column_index(header, &columns.quantity, path)?;
    let value_idx = column_index(header, &columns.current_value, path)?;

    let mut holdings = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for row in rows {
        let investor = cell(row, investor_idx);
        let security = cell(row, security_idx);
        let quantity = parse_number(cell(row, quantity_idx));
        let value = parse_number(cell(row, value_idx));

        match (quantity, value) {
            (Some(quantity), Some(value)) if !investor.is_empty() && !security.is_empty() => {
                holdings.push(Holding::new(investor, security, quantity, value));
            }
            _ => skipped += 1,
        }
    }

    tracing::info!(
        file = %path.display(),
        holdings = holdings.len(),
        skipped,
        "Holdings loaded"
    );
    Ok(holdings)
}
