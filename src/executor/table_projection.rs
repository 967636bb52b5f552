use indexmap::IndexMap;

use crate::{
    database::DataType,
    executor::{level_of, ColumnSource, OutputSchema},
    model::{SqlSelectDefinition, SqlTable},
    visitor::ColumnRefsVisitor,
    Error, Result,
};

/// Columns the engine needs from each level of a FROM/JOIN chain.
///
/// Levels are positions in the chain, so the two sides of a self-join keep
/// separate column sets.
#[derive(Debug, Clone, Default)]
pub struct TableProjections {
    levels: Vec<(SqlTable, IndexMap<String, DataType>)>,
}

impl TableProjections {
    /// Visible columns of `schema`, plus, for joined statements, every column
    /// of WHERE and ON that is read while a later level is being scanned
    /// (that is, any column not on the last level of the chain).
    pub fn build(select: &SqlSelectDefinition, schema: &OutputSchema) -> Result<Self> {
        let tables: Vec<SqlTable> = select.tables().into_iter().cloned().collect();
        let mut projections = Self {
            levels: tables.iter().map(|t| (t.clone(), IndexMap::new())).collect(),
        };
        for column in schema.columns() {
            if let ColumnSource::Table { level, column: name, .. } = &column.source {
                projections.add(*level, name, column.data_type);
            }
        }

        if select.joins.is_empty() {
            return Ok(projections);
        }
        let last = tables.len() - 1;
        let mut refs = ColumnRefsVisitor::new();
        if let Some(where_clause) = &select.where_clause {
            where_clause.inspect(&mut refs)?;
        }
        for join in &select.joins {
            join.condition.inspect(&mut refs)?;
        }
        for column_ref in &refs.results {
            let Some(column) = &column_ref.column else { continue };
            let Some(table) = &column.table_ref else { continue };
            let level = level_of(&tables, table)
                .ok_or_else(|| Error::Other(format!("column {} reads table {} outside the FROM/JOIN list", column_ref, table)))?;
            if level != last {
                projections.add(level, &column.column_name, column.column_type.unwrap_or(DataType::String));
            }
        }
        Ok(projections)
    }

    /// Add a column unless the level already projects one of that name.
    /// Levels outside the chain are ignored.
    pub fn add(&mut self, level: usize, column: &str, data_type: DataType) {
        if let Some((_, columns)) = self.levels.get_mut(level) {
            columns.entry(column.to_string()).or_insert(data_type);
        }
    }

    pub fn get(&self, level: usize) -> Option<&IndexMap<String, DataType>> {
        self.levels.get(level).map(|(_, columns)| columns)
    }

    /// Column names projected from `level`; empty when none are needed.
    pub fn columns(&self, level: usize) -> Vec<String> {
        self.get(level).map(|c| c.keys().cloned().collect()).unwrap_or_default()
    }

    pub fn tables(&self) -> impl Iterator<Item = &SqlTable> {
        self.levels.iter().map(|(table, _)| table)
    }
}
