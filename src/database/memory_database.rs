use indexmap::IndexMap;

use crate::{
    database::{
        DatabaseSchemaProvider, MemoryTable, RowSource, SchemaColumn, SqlTableInfo, TableDataProvider,
        TableListing, TableSchemaProvider,
    },
    model::SqlTable,
    Error, Result,
};

/// A named set of [`MemoryTable`]s acting as one database.
///
/// It services exactly its own database name (compared case-insensitively)
/// and is the reference implementation of the provider traits. Tables
/// without a database qualifier are looked up here as well.
#[derive(Debug, Clone)]
pub struct MemoryDatabase {
    name: String,
    tables: IndexMap<String, MemoryTable>,
}

impl MemoryDatabase {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), tables: IndexMap::new() }
    }

    pub fn name(&self) -> &str { &self.name }

    /// Add a table. Table names are unique, ignoring case.
    pub fn add_table(&mut self, table: MemoryTable) -> Result<()> {
        if self.table(table.name()).is_some() {
            return Err(Error::Other(format!(
                "table {} already exists in database {}",
                table.name(),
                self.name
            )));
        }
        self.tables.insert(table.name().to_string(), table);
        Ok(())
    }

    /// Builder flavour of [`MemoryDatabase::add_table`].
    pub fn with_table(mut self, table: MemoryTable) -> Result<Self> {
        self.add_table(table)?;
        Ok(self)
    }

    pub fn table(&self, name: &str) -> Option<&MemoryTable> {
        self.tables
            .get(name)
            .or_else(|| self.tables.values().find(|t| t.name().eq_ignore_ascii_case(name)))
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut MemoryTable> {
        let key = self
            .tables
            .keys()
            .find(|k| k.as_str() == name)
            .or_else(|| self.tables.keys().find(|k| k.eq_ignore_ascii_case(name)))?
            .clone();
        self.tables.get_mut(&key)
    }

    pub fn drop_table(&mut self, name: &str) -> Option<MemoryTable> {
        let key = self.table(name)?.name().to_string();
        self.tables.shift_remove(&key)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &String> {
        self.tables.keys()
    }

    fn services(&self, database: Option<&str>) -> bool {
        database.is_none_or(|db| db.eq_ignore_ascii_case(&self.name))
    }

    fn lookup(&self, table: &SqlTable) -> Option<&MemoryTable> {
        if !self.services(table.database_name.as_deref()) {
            return None;
        }
        self.table(&table.table_name)
    }
}

impl TableSchemaProvider for MemoryDatabase {
    fn get_columns(&self, table: &SqlTable) -> Option<Vec<SchemaColumn>> {
        self.lookup(table).map(|t| t.schema().to_columns())
    }
}

impl DatabaseSchemaProvider for MemoryDatabase {
    fn get_tables(&self, database: Option<&str>) -> TableListing {
        if !self.services(database) {
            return TableListing::unserviced();
        }
        let tables = self
            .tables
            .values()
            .map(|t| {
                SqlTableInfo::new(SqlTable::new(Some(&self.name), t.name()), t.created()).with_rows(t.len() as u64)
            })
            .collect();
        TableListing::serviced(tables)
    }
}

impl TableDataProvider for MemoryDatabase {
    fn get_table_data(&self, table: &SqlTable, columns: &[String]) -> Option<RowSource<'_>> {
        let found = self.lookup(table)?;
        tracing::trace!(target: "sqlblocks::database", table = %table, ?columns, "scan");
        Some(found.scan(columns))
    }
}
