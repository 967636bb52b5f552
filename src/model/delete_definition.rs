use std::fmt;

use crate::{
    model::{SqlExpression, SqlReturning, SqlTable},
    visitor::SqlVisitor,
    Result,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SqlDeleteDefinition {
    pub table: SqlTable,
    pub where_clause: Option<SqlExpression>,
    pub returning: Option<SqlReturning>,
}

impl SqlDeleteDefinition {
    pub fn new(table: SqlTable) -> Self {
        Self { table, where_clause: None, returning: None }
    }

    pub fn with_where(mut self, where_clause: SqlExpression) -> Self {
        self.where_clause = Some(where_clause);
        self
    }

    pub fn accept<V: SqlVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        match &mut self.where_clause {
            Some(where_clause) => where_clause.accept(visitor),
            None => Ok(()),
        }
    }
}

impl fmt::Display for SqlDeleteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM {}", self.table)?;
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {}", where_clause)?;
        }
        if let Some(returning) = &self.returning {
            write!(f, " {}", returning)?;
        }
        Ok(())
    }
}
