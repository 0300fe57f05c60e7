pub mod ddl;
pub mod derive;
pub mod types;

pub use ddl::{create_table_sql, drop_table_sql};
pub use derive::derive_columns;
pub use types::{Column, ColumnType};
