use std::fmt;

use crate::{
    model::{SqlColumn, SqlExpression, SqlSelectDefinition, SqlTable},
    visitor::SqlVisitor,
    Result,
};

/// Rows fed to an INSERT.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlInsertSource {
    Values(Vec<Vec<SqlExpression>>),
    Select(Box<SqlSelectDefinition>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlInsertDefinition {
    pub table: SqlTable,
    pub columns: Vec<SqlColumn>,
    pub source: SqlInsertSource,
}

impl SqlInsertDefinition {
    pub fn values(table: SqlTable, columns: &[&str], rows: Vec<Vec<SqlExpression>>) -> Self {
        Self {
            table,
            columns: columns.iter().map(|c| SqlColumn::named(c)).collect(),
            source: SqlInsertSource::Values(rows),
        }
    }

    pub fn select(table: SqlTable, columns: &[&str], select: SqlSelectDefinition) -> Self {
        Self {
            table,
            columns: columns.iter().map(|c| SqlColumn::named(c)).collect(),
            source: SqlInsertSource::Select(Box::new(select)),
        }
    }

    pub fn accept<V: SqlVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        match &mut self.source {
            SqlInsertSource::Values(rows) => {
                for value in rows.iter_mut().flatten() {
                    value.accept(visitor)?;
                }
                Ok(())
            }
            SqlInsertSource::Select(select) => select.accept(visitor),
        }
    }
}

impl fmt::Display for SqlInsertDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<String> = self.columns.iter().map(|c| c.to_string()).collect();
        write!(f, "INSERT INTO {} ({}) ", self.table, columns.join(", "))?;
        match &self.source {
            SqlInsertSource::Values(rows) => {
                let rows: Vec<String> = rows
                    .iter()
                    .map(|r| {
                        let values: Vec<String> = r.iter().map(|v| v.to_string()).collect();
                        format!("({})", values.join(", "))
                    })
                    .collect();
                write!(f, "VALUES {}", rows.join(", "))
            }
            SqlInsertSource::Select(select) => write!(f, "{}", select),
        }
    }
}
