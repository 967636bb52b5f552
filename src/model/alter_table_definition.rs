use std::fmt;

use crate::model::{SqlColumnDefinition, SqlConstraintDefinition, SqlTable};

#[derive(Debug, Clone, PartialEq)]
pub struct SqlAlterTableDefinition {
    pub table: SqlTable,
    pub columns_to_add: Vec<SqlColumnDefinition>,
    pub constraints_to_add: Vec<SqlConstraintDefinition>,
    pub columns_to_drop: Vec<String>,
}

impl SqlAlterTableDefinition {
    pub fn new(table: SqlTable) -> Self {
        Self {
            table,
            columns_to_add: Vec::new(),
            constraints_to_add: Vec::new(),
            columns_to_drop: Vec::new(),
        }
    }

    pub fn add_column(mut self, column: SqlColumnDefinition) -> Self {
        self.columns_to_add.push(column);
        self
    }

    pub fn add_constraint(mut self, constraint: SqlConstraintDefinition) -> Self {
        self.constraints_to_add.push(constraint);
        self
    }

    pub fn drop_column(mut self, column: &str) -> Self {
        self.columns_to_drop.push(column.to_string());
        self
    }
}

impl fmt::Display for SqlAlterTableDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let actions: Vec<String> = self
            .columns_to_add
            .iter()
            .map(|c| format!("ADD {}", c))
            .chain(self.constraints_to_add.iter().map(|c| format!("ADD {}", c)))
            .chain(self.columns_to_drop.iter().map(|c| format!("DROP COLUMN {}", c)))
            .collect();
        write!(f, "ALTER TABLE {} {}", self.table, actions.join(", "))
    }
}
