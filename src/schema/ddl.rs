use super::Column;

/// `DROP TABLE IF EXISTS` for `table`, so a re-run replaces the destination
/// instead of appending to it.
pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {};", quote_ident(table))
}

/// CREATE TABLE statement for `table`: an `ID INTEGER` column followed by
/// the derived columns, in header order.
pub fn create_table_sql(table: &str, columns: &[Column]) -> String {
    let mut defs = Vec::with_capacity(columns.len() + 1);
    defs.push(r#""ID" INTEGER"#.to_string());
    for col in columns {
        defs.push(format!("{} {}", quote_ident(&col.name), col.ty.sql()));
    }
    format!("CREATE TABLE {} ({});", quote_ident(table), defs.join(", "))
}

/// Double-quote an identifier, doubling any embedded quotes.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
