use std::path::Path;

use super::{cell, parse_number, read_table};
use crate::errors::CoreError;
use crate::models::fund::{FundWeight, ModelFund};

const NAME_HEADERS: &[&str] = &["name", "security", "company", "stock", "scrip"];
const WEIGHT_HEADERS: &[&str] = &["weight", "%", "allocation"];

/// Load model funds from a weights sheet holding several funds one below the other.
///
/// Each block starts with a title row containing one of `fund_titles`
/// (e.g. "GM Multi Cap (As on 31-Aug-2025)"), followed by a header row and
/// then one row per constituent. A block ends at a "Total" row, a blank row
/// or the next title. Titles not present in the sheet are logged and skipped.
pub fn load_fund_weights(
    path: &Path,
    sheet: Option<&str>,
    fund_titles: &[String],
) -> Result<Vec<ModelFund>, CoreError> {
    let table = read_table(path, sheet)?;
    let mut funds = Vec::new();

    for title in fund_titles {
        let Some(title_idx) = table.iter().position(|row| row_has_title(row, title)) else {
            tracing::warn!(file = %path.display(), fund = %title, "Fund title not found");
            continue;
        };
        let Some(header_idx) = (title_idx + 1..table.len()).find(|&i| !is_blank(&table[i])) else {
            tracing::warn!(fund = %title, "Fund block has no header row");
            continue;
        };

        let header = &table[header_idx];
        let name_idx = find_column(header, NAME_HEADERS).ok_or_else(|| CoreError::MissingColumn {
            column: format!("security name for {title}"),
            file: path.display().to_string(),
        })?;
        let weight_idx = find_column(header, WEIGHT_HEADERS).ok_or_else(|| CoreError::MissingColumn {
            column: format!("weight for {title}"),
            file: path.display().to_string(),
        })?;

        let mut weights = Vec::new();
        for row in &table[header_idx + 1..] {
            if is_blank(row)
                || is_total(cell(row, name_idx))
                || fund_titles.iter().any(|t| row_has_title(row, t))
            {
                break;
            }
            let name = cell(row, name_idx);
            match parse_number(cell(row, weight_idx)) {
                Some(weight) if !name.is_empty() => weights.push(FundWeight {
                    security_name: name.to_string(),
                    weight,
                }),
                _ => {}
            }
        }

        tracing::info!(fund = %title, constituents = weights.len(), "Fund weights loaded");
        funds.push(ModelFund::new(title.clone(), weights));
    }

    Ok(funds)
}

fn row_has_title(row: &[String], title: &str) -> bool {
    let title = title.to_ascii_lowercase();
    row.iter().any(|c| c.to_ascii_lowercase().contains(&title))
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

fn find_column(header: &[String], keywords: &[&str]) -> Option<usize> {
    header.iter().position(|h| {
        let h = h.to_ascii_lowercase();
        keywords.iter().any(|k| h.contains(k))
    })
}

/// "Total" or "Total (…)"-style closing rows; constituent names that merely
/// contain the word do not count.
fn is_total(name: &str) -> bool {
    let lower = name.trim().to_ascii_lowercase();
    lower == "total" || lower.starts_with("total ") || lower.starts_with("total:")
}
