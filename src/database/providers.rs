use std::sync::Arc;

use crate::{
    database::{DataType, SchemaColumn, TableListing, Value},
    executor::Row,
    model::{SqlFunction, SqlTable},
    Result,
};

/// Lazily produced rows of one table. Dropping the iterator releases whatever
/// the source holds.
pub type RowSource<'a> = Box<dyn Iterator<Item = Result<Row>> + 'a>;

/// Zero-argument callback producing a value on demand.
pub type ValueResolver = Arc<dyn Fn() -> Value + Send + Sync>;

/// Supplies the ordered column list of a table.
pub trait TableSchemaProvider {
    /// Columns in ordinal order, or `None` when the table is unknown.
    /// The order is the order wildcards expand to.
    fn get_columns(&self, table: &SqlTable) -> Option<Vec<SchemaColumn>>;
}

/// Lists the tables of a database.
pub trait DatabaseSchemaProvider {
    fn get_tables(&self, database: Option<&str>) -> TableListing;
}

/// Supplies the rows of a table.
pub trait TableDataProvider: TableSchemaProvider + DatabaseSchemaProvider {
    /// Rows of `table`, or `None` when the table is unknown.
    ///
    /// `columns` lists every column the engine will read from the rows;
    /// providers may use it to narrow what they load but may also return
    /// wider rows.
    fn get_table_data(&self, table: &SqlTable, columns: &[String]) -> Option<RowSource<'_>>;
}

/// Supplies type and value of statement-scoped functions such as
/// `LAST_INSERT_ID()`.
pub trait FunctionProvider {
    fn get_data_type(&self, function: &SqlFunction) -> Option<DataType>;
    fn get_data_value(&self, function: &SqlFunction) -> Option<ValueResolver>;
}

impl<T: TableSchemaProvider + ?Sized> TableSchemaProvider for &T {
    fn get_columns(&self, table: &SqlTable) -> Option<Vec<SchemaColumn>> {
        (**self).get_columns(table)
    }
}

impl<T: DatabaseSchemaProvider + ?Sized> DatabaseSchemaProvider for &T {
    fn get_tables(&self, database: Option<&str>) -> TableListing {
        (**self).get_tables(database)
    }
}

impl<T: TableDataProvider + ?Sized> TableDataProvider for &T {
    fn get_table_data(&self, table: &SqlTable, columns: &[String]) -> Option<RowSource<'_>> {
        (**self).get_table_data(table, columns)
    }
}

impl<T: TableSchemaProvider + ?Sized> TableSchemaProvider for Box<T> {
    fn get_columns(&self, table: &SqlTable) -> Option<Vec<SchemaColumn>> {
        (**self).get_columns(table)
    }
}

impl<T: DatabaseSchemaProvider + ?Sized> DatabaseSchemaProvider for Box<T> {
    fn get_tables(&self, database: Option<&str>) -> TableListing {
        (**self).get_tables(database)
    }
}

impl<T: TableDataProvider + ?Sized> TableDataProvider for Box<T> {
    fn get_table_data(&self, table: &SqlTable, columns: &[String]) -> Option<RowSource<'_>> {
        (**self).get_table_data(table, columns)
    }
}
