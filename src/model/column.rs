use std::fmt;

use crate::{database::DataType, model::SqlTable};

/// A concrete column: what a projection names, or what a column reference
/// ends up pointing at once resolved.
///
/// `column_type` and `table_ref` are filled in by the reference resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlColumn {
    pub database_name: Option<String>,
    pub table_name: Option<String>,
    pub column_name: String,
    pub column_alias: Option<String>,
    pub column_type: Option<DataType>,
    pub table_ref: Option<SqlTable>,
}

impl SqlColumn {
    pub fn new(database_name: Option<&str>, table_name: Option<&str>, column_name: &str) -> Self {
        Self {
            database_name: database_name.map(str::to_string),
            table_name: table_name.map(str::to_string),
            column_name: column_name.to_string(),
            ..Self::default()
        }
    }

    pub fn named(column_name: &str) -> Self {
        Self::new(None, None, column_name)
    }

    pub fn qualified(table_name: &str, column_name: &str) -> Self {
        Self::new(None, Some(table_name), column_name)
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.column_alias = Some(alias.to_string());
        self
    }

    /// Column bound to `table` with `column_type`, as produced by resolution.
    pub fn bound(table: &SqlTable, column_name: &str, column_type: DataType) -> Self {
        Self {
            database_name: table.database_name.clone(),
            table_name: Some(table.table_name.clone()),
            column_name: column_name.to_string(),
            column_alias: None,
            column_type: Some(column_type),
            table_ref: Some(table.clone()),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.table_ref.is_some()
    }
}

impl fmt::Display for SqlColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(table) = &self.table_name {
            if let Some(db) = &self.database_name {
                write!(f, "{}.", db)?;
            }
            write!(f, "{}.", table)?;
        }
        write!(f, "{}", self.column_name)?;
        if let Some(alias) = &self.column_alias {
            write!(f, " AS {}", alias)?;
        }
        Ok(())
    }
}
