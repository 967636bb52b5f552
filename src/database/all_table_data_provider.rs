use crate::{
    database::{
        DatabaseSchemaProvider, RowSource, SchemaColumn, SqlTableInfo, TableDataProvider, TableListing,
        TableSchemaProvider,
    },
    model::SqlTable,
    Error, Result,
};

/// Consolidates several table-data providers behind one.
///
/// A database is routed to the first provider whose `get_tables` reports it
/// as serviced. When more than one provider claims the same database the
/// first still wins and a warning is logged.
#[derive(Default)]
pub struct AllTableDataProvider {
    providers: Vec<Box<dyn TableDataProvider>>,
}

impl AllTableDataProvider {
    pub fn new(providers: Vec<Box<dyn TableDataProvider>>) -> Self {
        Self { providers }
    }

    pub fn push(&mut self, provider: Box<dyn TableDataProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider servicing `database` together with its table listing.
    pub fn provider_for(&self, database: Option<&str>) -> Result<(&dyn TableDataProvider, Vec<SqlTableInfo>)> {
        let mut serviced = self
            .providers
            .iter()
            .map(|p| (p.as_ref(), p.get_tables(database)))
            .filter(|(_, listing)| listing.serviced);

        let Some((provider, listing)) = serviced.next() else {
            return Err(Error::DatabaseNotFound(database.unwrap_or_default().to_string()));
        };

        let others = serviced.count();
        if others > 0 {
            tracing::warn!(
                target: "sqlblocks::database",
                database = database.unwrap_or_default(),
                others,
                "database is serviced by more than one provider, using the first"
            );
        }

        Ok((provider, listing.tables))
    }

    /// Tables of `database`; an unserviced database is an error.
    pub fn tables(&self, database: Option<&str>) -> Result<Vec<SqlTableInfo>> {
        self.provider_for(database).map(|(_, tables)| tables)
    }

    /// Rows of `table`; an unserviced database or an unknown table is an error.
    pub fn table_data(&self, table: &SqlTable, columns: &[String]) -> Result<RowSource<'_>> {
        let (provider, _) = self.provider_for(table.database_name.as_deref())?;
        provider
            .get_table_data(table, columns)
            .ok_or_else(|| Error::TableNotFound(table.to_string()))
    }
}

impl TableSchemaProvider for AllTableDataProvider {
    fn get_columns(&self, table: &SqlTable) -> Option<Vec<SchemaColumn>> {
        let (provider, _) = self.provider_for(table.database_name.as_deref()).ok()?;
        provider.get_columns(table)
    }
}

impl DatabaseSchemaProvider for AllTableDataProvider {
    fn get_tables(&self, database: Option<&str>) -> TableListing {
        match self.tables(database) {
            Ok(tables) => TableListing::serviced(tables),
            Err(_) => TableListing::unserviced(),
        }
    }
}

impl TableDataProvider for AllTableDataProvider {
    fn get_table_data(&self, table: &SqlTable, columns: &[String]) -> Option<RowSource<'_>> {
        match self.table_data(table, columns) {
            Ok(rows) => Some(rows),
            Err(e) => {
                tracing::debug!(target: "sqlblocks::database", table = %table, error = %e, "no table data");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::database::{MemoryDatabase, MemoryTable, Value};

    fn db(name: &str, table: &str, value: i32) -> Box<dyn TableDataProvider> {
        let t = MemoryTable::from_json(table, json!([{ "v": value }])).unwrap();
        Box::new(MemoryDatabase::new(name).with_table(t).unwrap())
    }

    fn first_value(rows: RowSource<'_>) -> Value {
        rows.map(|r| r.unwrap()).next().unwrap().get("v").cloned().unwrap()
    }

    #[test]
    fn routes_by_database() {
        let all = AllTableDataProvider::new(vec![db("A", "T", 1), db("B", "T", 2)]);
        let rows = all.table_data(&SqlTable::new(Some("B"), "T"), &[]).unwrap();
        assert_eq!(first_value(rows), Value::Int(2));
        assert!(all.get_tables(Some("A")).serviced);
    }

    #[test]
    fn first_serviced_provider_wins() {
        let all = AllTableDataProvider::new(vec![db("A", "T", 1), db("A", "T", 2)]);
        let rows = all.table_data(&SqlTable::new(Some("A"), "T"), &[]).unwrap();
        assert_eq!(first_value(rows), Value::Int(1));
    }

    #[test]
    fn unserviced_database_and_unknown_table_are_errors() {
        let all = AllTableDataProvider::new(vec![db("A", "T", 1)]);
        assert_eq!(
            all.tables(Some("Nope")).unwrap_err(),
            Error::DatabaseNotFound("Nope".into())
        );
        assert!(matches!(
            all.table_data(&SqlTable::new(Some("A"), "Missing"), &[]),
            Err(Error::TableNotFound(_))
        ));
        assert!(!all.get_tables(Some("Nope")).serviced);
        assert!(all.get_columns(&SqlTable::new(Some("Nope"), "T")).is_none());
    }

    #[test]
    fn schema_is_delegated() {
        let all = AllTableDataProvider::new(vec![db("A", "T", 1)]);
        let cols = all.get_columns(&SqlTable::new(Some("a"), "t")).unwrap();
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].name, "v");
    }
}
