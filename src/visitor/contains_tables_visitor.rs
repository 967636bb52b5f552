use std::collections::HashSet;

use crate::{
    model::{SqlColumnRef, SqlExpression, SqlTable},
    visitor::SqlVisitor,
    Error, Result,
};

/// Answers whether every column reference of a walk belongs to one of
/// `tables`. References must already be bound.
#[derive(Debug)]
pub struct ContainsTablesVisitor<'a> {
    tables: &'a HashSet<SqlTable>,
    pub result: bool,
}

impl<'a> ContainsTablesVisitor<'a> {
    pub fn new(tables: &'a HashSet<SqlTable>) -> Self {
        Self { tables, result: true }
    }
}

impl SqlVisitor for ContainsTablesVisitor<'_> {
    fn visit_column(&mut self, column: &SqlColumnRef) -> Result<Option<SqlExpression>> {
        let table = column.bound_table().ok_or_else(|| Error::UnboundColumn(column.to_string()))?;
        if !self.tables.contains(table) {
            self.result = false;
        }
        Ok(None)
    }
}
