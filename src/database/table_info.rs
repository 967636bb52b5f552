use chrono::{DateTime, Utc};

use crate::model::SqlTable;

/// Catalog entry returned by [`crate::database::DatabaseSchemaProvider::get_tables`].
#[derive(Debug, Clone, PartialEq)]
pub struct SqlTableInfo {
    pub table: SqlTable,
    pub table_rows: Option<u64>,
    pub created: DateTime<Utc>,
}

impl SqlTableInfo {
    pub fn new(table: SqlTable, created: DateTime<Utc>) -> Self {
        Self { table, table_rows: None, created }
    }

    pub fn with_rows(mut self, rows: u64) -> Self {
        self.table_rows = Some(rows);
        self
    }
}

/// Answer to "which tables does database X hold?".
///
/// `serviced` is false when the provider does not own the database at all,
/// which is different from owning it with no tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableListing {
    pub serviced: bool,
    pub tables: Vec<SqlTableInfo>,
}

impl TableListing {
    pub fn unserviced() -> Self {
        Self::default()
    }

    pub fn serviced(tables: Vec<SqlTableInfo>) -> Self {
        Self { serviced: true, tables }
    }
}
