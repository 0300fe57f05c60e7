use anyhow::{anyhow, Context, Result};
use duckdb::Connection;
use std::path::Path;
use tracing::info;

use crate::{duck, extract, schema};

/// Full refresh of `table` from the CSV file at `path`: parse the file,
/// derive the destination schema from its header row, drop and recreate
/// the table, then bulk-append every row. Returns the number of rows
/// loaded, verified against the table.
pub fn refresh_from_csv(conn: &Connection, table: &str, path: &Path) -> Result<u64> {
    let raw = extract::load_table(path)
        .with_context(|| format!("loading {} for table `{}`", path.display(), table))?;
    let columns = schema::derive_columns(table, &raw.headers)?;

    duck::recreate_table(conn, table, &columns)?;
    let inserted = duck::bulk_insert(conn, table, &columns, &raw)?;

    let counted = duck::count_rows(conn, table)?;
    if counted != inserted as i64 {
        return Err(anyhow!(
            "table `{}` holds {} rows after loading {}",
            table,
            counted,
            inserted
        ));
    }

    info!(table, rows = inserted, "refreshed");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,stratload=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn write_csv(content: &str) -> Result<NamedTempFile> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(content.as_bytes())?;
        Ok(tmp)
    }

    #[test]
    fn end_to_end_refresh() -> Result<()> {
        init_test_logging();
        let tmp = write_csv(
            "Date,StratName,Region\n\
             2015-01-02,Momentum,EU\n\
             2015-01-02,Value,US\n\
             2015-01-05,Momentum,\n",
        )?;
        let conn = duck::open_mem_db()?;

        let rows = refresh_from_csv(&conn, "properties", tmp.path())?;

        assert_eq!(rows, 3);
        let regions: i64 = conn.query_row(
            "SELECT COUNT(*) FROM properties WHERE Region IS NULL;",
            [],
            |r| r.get(0),
        )?;
        assert_eq!(regions, 1);
        Ok(())
    }

    #[test]
    fn rerun_is_a_full_replace() -> Result<()> {
        init_test_logging();
        let tmp = write_csv("Date,Strat1\n2015-01-02,1.0\n2015-01-05,2.0\n")?;
        let conn = duck::open_mem_db()?;

        refresh_from_csv(&conn, "capital", tmp.path())?;
        let rows = refresh_from_csv(&conn, "capital", tmp.path())?;

        assert_eq!(rows, 2);
        assert_eq!(duck::count_rows(&conn, "capital")?, 2);
        Ok(())
    }

    #[test]
    fn parse_failure_reports_the_file() -> Result<()> {
        init_test_logging();
        let tmp = write_csv("Date,Strat1\n2015-01-02,1.0,oops\n")?;
        let conn = duck::open_mem_db()?;

        let err = refresh_from_csv(&conn, "capital", tmp.path()).unwrap_err();

        let chain = format!("{:#}", err);
        assert!(chain.contains("CSV parse error"));
        assert!(chain.contains("capital"));
        Ok(())
    }
}
