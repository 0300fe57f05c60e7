use anyhow::{anyhow, Result};
use tracing::debug;

use super::{Column, ColumnType};

/// Map each header to a destination column type by fixed-name matching:
///  - `Date` becomes a DATE column
///  - `StratName` and `Region` become VARCHAR(255) columns
///  - every other header is a strategy value column stored as FLOAT
///
/// Matching is case-insensitive on the trimmed header name.
pub fn derive_columns(table_name: &str, headers: &[String]) -> Result<Vec<Column>> {
    if headers.is_empty() {
        return Err(anyhow!("derive_columns: `{}` has no headers", table_name));
    }

    let mut cols = Vec::with_capacity(headers.len());

    for (idx, raw_name) in headers.iter().enumerate() {
        // Strip all leading/trailing whitespace (spaces, tabs, \r, \n, etc.)
        let col_name = raw_name.trim();
        if col_name.is_empty() {
            return Err(anyhow!(
                "derive_columns: header at index {} in `{}` is empty after trimming",
                idx,
                table_name
            ));
        }

        let ty = match col_name.to_ascii_lowercase().as_str() {
            "date" => ColumnType::Date,
            "stratname" | "region" => ColumnType::Text,
            _ => {
                debug!(
                    "derive_columns: `{}` in `{}` treated as strategy value column",
                    col_name, table_name
                );
                ColumnType::Float
            }
        };

        cols.push(Column {
            name: col_name.to_string(),
            ty,
        });
    }

    Ok(cols)
}
