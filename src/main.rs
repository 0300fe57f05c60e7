use anyhow::Result;
use std::io::{self, BufRead};
use std::path::Path;
use stratload::{duck, refresh};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const CAPITAL_CSV: &str = "data/capital.csv";
const PNL_CSV: &str = "data/pnl.csv";
const PROPERTIES_CSV: &str = "data/properties.csv";
const DB_PATH: &str = "strategies.duckdb";

fn main() -> Result<()> {
    // ─── init logging ────────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── fixed sources, in load order ────────────────────────────────
    let sources = [
        (CAPITAL_CSV, "capital"),
        (PNL_CSV, "pnl"),
        (PROPERTIES_CSV, "properties"),
    ];

    for (path, table) in sources {
        info!("converting {} into table `{}`", path, table);
        // one connection per file operation, dropped at end of iteration
        let conn = duck::open_disk_db(DB_PATH)?;
        let rows = refresh::refresh_from_csv(&conn, table, Path::new(path))?;
        info!("completed writing {} rows to `{}`", rows, table);
    }

    info!("all conversion tasks completed");

    // hold the console open until Enter; EOF falls through immediately
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);

    Ok(())
}
