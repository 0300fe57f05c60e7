use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::debug;

/// One CSV file held in memory.
#[derive(Debug)]
pub struct RawTable {
    /// Column names, taken from the file's header row.
    pub headers: Vec<String>,
    /// Each data row, one cell per header. Empty cells arrive as `None`.
    pub rows: Vec<Vec<Option<String>>>,
}

/// Read the CSV file at `path` into a `RawTable`.
///
/// Comma-delimited, quoted fields, first row is the header. The reader is
/// strict: a row whose width differs from the header row is an error, not
/// a silently dropped record.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(anyhow!("csv file not found: {}", path.display()));
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening csv file {}", path.display()))?;

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("reading header row of {}", path.display()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result
            .with_context(|| format!("CSV parse error in {} at record {}", path.display(), idx))?;
        let row: Vec<Option<String>> = record
            .iter()
            .map(|cell| {
                if cell.is_empty() {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();
        rows.push(row);
    }

    debug!(path = %path.display(), rows = rows.len(), "loaded csv");
    Ok(RawTable { headers, rows })
}
