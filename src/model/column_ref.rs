use std::fmt;

use crate::{
    database::ConnectionConfig,
    model::{SqlColumn, SqlTable},
};

/// A column mentioned inside an expression (`ON`, `WHERE`, function
/// arguments). Unbound until the reference resolver points `column` at the
/// concrete column it names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlColumnRef {
    pub database_name: Option<String>,
    pub table_name: Option<String>,
    pub column_name: String,
    pub column: Option<SqlColumn>,
}

impl SqlColumnRef {
    pub fn new(database_name: Option<&str>, table_name: Option<&str>, column_name: &str) -> Self {
        Self {
            database_name: database_name.map(str::to_string),
            table_name: table_name.map(str::to_string),
            column_name: column_name.to_string(),
            column: None,
        }
    }

    pub fn named(column_name: &str) -> Self {
        Self::new(None, None, column_name)
    }

    pub fn qualified(table_name: &str, column_name: &str) -> Self {
        Self::new(None, Some(table_name), column_name)
    }

    pub fn is_bound(&self) -> bool {
        self.column.is_some()
    }

    /// Owning table of the bound column.
    pub fn bound_table(&self) -> Option<&SqlTable> {
        self.column.as_ref().and_then(|c| c.table_ref.as_ref())
    }

    /// Whether this reference names the projected `column`: either by
    /// (database,) table and column name, or, when unqualified, by the
    /// column's name or alias.
    pub fn refers_to(&self, column: &SqlColumn, config: &ConnectionConfig) -> bool {
        let database_ok = match &self.database_name {
            None => true,
            Some(db) => column.database_name.as_deref().is_some_and(|c| config.names_match(db, c)),
        };
        if database_ok
            && config.optional_names_match(self.table_name.as_deref(), column.table_name.as_deref())
            && config.names_match(&self.column_name, &column.column_name)
        {
            return true;
        }

        self.table_name.is_none()
            && (config.names_match(&self.column_name, &column.column_name)
                || column.column_alias.as_deref().is_some_and(|a| config.names_match(&self.column_name, a)))
    }
}

impl fmt::Display for SqlColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(table) = &self.table_name {
            if let Some(db) = &self.database_name {
                write!(f, "{}.", db)?;
            }
            write!(f, "{}.", table)?;
        }
        write!(f, "{}", self.column_name)
    }
}
