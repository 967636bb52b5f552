use std::collections::HashSet;

use crate::{
    model::{SqlColumnRef, SqlExpression, SqlTable},
    visitor::SqlVisitor,
    Result,
};

/// Collects the column references met during a walk.
///
/// With a table filter, references are kept when their bound table is in the
/// set (`include`) or not in it (`exclude`). Unbound references only pass
/// an unfiltered or excluding visitor.
#[derive(Debug, Default)]
pub struct ColumnRefsVisitor {
    filter: Option<(HashSet<SqlTable>, bool)>,
    pub results: Vec<SqlColumnRef>,
}

impl ColumnRefsVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(tables: HashSet<SqlTable>) -> Self {
        Self { filter: Some((tables, true)), results: Vec::new() }
    }

    pub fn exclude(tables: HashSet<SqlTable>) -> Self {
        Self { filter: Some((tables, false)), results: Vec::new() }
    }

    fn keeps(&self, column: &SqlColumnRef) -> bool {
        match &self.filter {
            None => true,
            Some((tables, include)) => {
                let found = column.bound_table().is_some_and(|t| tables.contains(t));
                found == *include
            }
        }
    }
}

impl SqlVisitor for ColumnRefsVisitor {
    fn visit_column(&mut self, column: &SqlColumnRef) -> Result<Option<SqlExpression>> {
        if self.keeps(column) {
            self.results.push(column.clone());
        }
        Ok(None)
    }
}
