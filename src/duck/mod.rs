use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use duckdb::types::{Null, ToSql, ToSqlOutput};
use duckdb::Connection;
use tracing::debug;

use crate::extract::RawTable;
use crate::schema::{self, Column, ColumnType};

/// Date renderings accepted in DATE cells. Values are normalised to ISO
/// form before they reach the database.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Open a DuckDB database on disk at `path`, creating the file if it doesn't exist.
pub fn open_disk_db(path: &str) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("opening database {}", path))?;
    Ok(conn)
}

/// Open a DuckDB in-memory database
pub fn open_mem_db() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    Ok(conn)
}

/// Drop and recreate `table` from the derived columns in a single batch.
pub fn recreate_table(conn: &Connection, table: &str, columns: &[Column]) -> Result<()> {
    let batch = format!(
        "{}\n{}",
        schema::drop_table_sql(table),
        schema::create_table_sql(table, columns)
    );
    conn.execute_batch(&batch)
        .with_context(|| format!("recreating table `{}`", table))?;
    Ok(())
}

/// One converted cell, ready to append.
#[derive(Debug)]
enum CellValue {
    Null,
    Float(f64),
    Date(NaiveDate),
    Text(String),
}

impl ToSql for CellValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        match self {
            CellValue::Null => Null.to_sql(),
            CellValue::Float(v) => v.to_sql(),
            CellValue::Date(d) => Ok(ToSqlOutput::from(d.format("%Y-%m-%d").to_string())),
            CellValue::Text(s) => s.to_sql(),
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Ok(d);
        }
    }
    Err(anyhow!(
        "`{}` matches none of the supported date formats",
        raw
    ))
}

fn convert_cell(col: &Column, cell: Option<&str>) -> Result<CellValue> {
    let raw = match cell {
        None => return Ok(CellValue::Null),
        Some(v) => v.trim(),
    };
    if raw.is_empty() {
        return Ok(CellValue::Null);
    }

    match col.ty {
        ColumnType::Float => raw
            .parse::<f64>()
            .map(CellValue::Float)
            .map_err(|e| anyhow!("`{}` is not numeric: {}", raw, e)),
        ColumnType::Date => parse_date(raw).map(CellValue::Date),
        ColumnType::Text => Ok(CellValue::Text(raw.to_string())),
    }
}

/// Stream every row of `raw` into `table` in one appender pass.
///
/// The leading `ID` column is left NULL; the remaining cells are converted
/// to the derived column types, with `None` appended as SQL NULL. Returns
/// the number of rows appended.
pub fn bulk_insert(
    conn: &Connection,
    table: &str,
    columns: &[Column],
    raw: &RawTable,
) -> Result<u64> {
    let mut appender = conn
        .appender(table)
        .with_context(|| format!("opening appender for `{}`", table))?;

    for (row_idx, row) in raw.rows.iter().enumerate() {
        let mut values = Vec::with_capacity(columns.len() + 1);
        values.push(CellValue::Null); // ID is created but never populated
        for (col, cell) in columns.iter().zip(row) {
            let value = convert_cell(col, cell.as_deref()).with_context(|| {
                format!(
                    "table `{}`, column `{}`, row {}",
                    table,
                    col.name,
                    row_idx + 1
                )
            })?;
            values.push(value);
        }
        let params: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
        appender
            .append_row(params.as_slice())
            .with_context(|| format!("appending row {} to `{}`", row_idx + 1, table))?;
    }

    appender
        .flush()
        .with_context(|| format!("flushing appender for `{}`", table))?;

    debug!(table, rows = raw.rows.len(), "bulk insert done");
    Ok(raw.rows.len() as u64)
}

/// Row count of `table`.
pub fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    let count: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {};", table), [], |r| {
            r.get(0)
        })
        .with_context(|| format!("counting rows in `{}`", table))?;
    Ok(count)
}
