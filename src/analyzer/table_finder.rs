use once_cell::unsync::OnceCell;

use crate::{
    database::{ConnectionConfig, DataType, SchemaColumn, TableSchemaProvider},
    model::{SqlColumnRef, SqlTable},
};

/// A table a column can be bound to, with the type the column has there.
#[derive(Debug, Clone, PartialEq)]
pub struct TableWithColumnType {
    pub table: SqlTable,
    pub column_type: DataType,
}

/// Looks up which FROM/JOIN tables own a column.
///
/// Schemas are fetched from the provider the first time they are needed and
/// cached for the life of the finder. Tables the provider does not know are
/// skipped.
pub struct TableFinder<'a> {
    tables: Vec<SqlTable>,
    schema_provider: &'a dyn TableSchemaProvider,
    config: &'a ConnectionConfig,
    schemas: OnceCell<Vec<(SqlTable, Vec<SchemaColumn>)>>,
}

impl<'a> TableFinder<'a> {
    pub fn new(tables: Vec<SqlTable>, schema_provider: &'a dyn TableSchemaProvider, config: &'a ConnectionConfig) -> Self {
        Self { tables, schema_provider, config, schemas: OnceCell::new() }
    }

    pub fn tables(&self) -> &[SqlTable] {
        &self.tables
    }

    fn schemas(&self) -> &[(SqlTable, Vec<SchemaColumn>)] {
        self.schemas.get_or_init(|| {
            self.tables
                .iter()
                .filter_map(|t| self.schema_provider.get_columns(t).map(|cols| (t.clone(), cols)))
                .collect()
        })
    }

    /// Every table whose schema has a column named `column_name`, in FROM/JOIN order.
    pub fn possible_tables(&self, column_name: &str) -> Vec<TableWithColumnType> {
        self.schemas()
            .iter()
            .filter_map(|(table, columns)| {
                columns
                    .iter()
                    .find(|c| self.config.names_match(&c.name, column_name))
                    .map(|c| TableWithColumnType { table: table.clone(), column_type: c.data_type })
            })
            .collect()
    }

    /// Type of `column_name` in `table`, `None` when the table or column is unknown.
    pub fn column_type(&self, table: &SqlTable, column_name: &str) -> Option<DataType> {
        self.schemas()
            .iter()
            .find(|(t, _)| t == table)
            .and_then(|(_, columns)| columns.iter().find(|c| self.config.names_match(&c.name, column_name)))
            .map(|c| c.data_type)
    }

    /// Table named exactly by a reference: through an alias when no database
    /// is given, through database and table name otherwise.
    ///
    /// `Ok(None)` means the reference has to be looked up by column name.
    pub fn matched_table(&self, column_ref: &SqlColumnRef) -> Result<Option<TableWithColumnType>, String> {
        let table = match (&column_ref.database_name, &column_ref.table_name) {
            (None, None) => return Ok(None),
            (None, Some(table_name)) => {
                let aliased = self
                    .tables
                    .iter()
                    .find(|t| t.table_alias.as_deref().is_some_and(|a| self.config.names_match(a, table_name)));
                match aliased {
                    Some(table) => table,
                    None => return Ok(None),
                }
            }
            (Some(database), table_name) => {
                let named = self.tables.iter().find(|t| {
                    t.database_name.as_deref().is_some_and(|db| self.config.names_match(db, database))
                        && table_name.as_deref().is_some_and(|n| self.config.names_match(n, &t.table_name))
                });
                named.ok_or_else(|| {
                    format!(
                        "Column reference {} specifies the database to which it belongs, but no tables in the FROM/JOIN specify a table from that database.",
                        column_ref
                    )
                })?
            }
        };

        let column_type = self
            .column_type(table, &column_ref.column_name)
            .ok_or_else(|| format!("There is no column named {} in the {}'s schema.", column_ref, table))?;
        Ok(Some(TableWithColumnType { table: table.clone(), column_type }))
    }

    /// Whether a qualifier (`db.table.` or `table.`) names `table`.
    ///
    /// Without a database the qualifier may be the alias or the table name.
    /// With a database both parts have to agree.
    pub fn references_table(&self, database_name: Option<&str>, table_name: Option<&str>, table: &SqlTable) -> bool {
        let Some(table_name) = table_name else {
            return false;
        };
        match database_name {
            None => {
                self.is_alias_of(table_name, table) || self.config.names_match(table_name, &table.table_name)
            }
            Some(database) => {
                self.config.names_match(table_name, &table.table_name)
                    && table.database_name.as_deref().is_some_and(|db| self.config.names_match(database, db))
            }
        }
    }

    pub fn is_alias_of(&self, name: &str, table: &SqlTable) -> bool {
        table.table_alias.as_deref().is_some_and(|a| self.config.names_match(a, name))
    }
}
