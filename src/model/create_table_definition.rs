use std::fmt;

use crate::{
    database::{DataType, SchemaColumn},
    model::SqlTable,
    Result,
};

/// A column type as written in DDL, e.g. `VARCHAR(50)` or `DECIMAL(10, 2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlDataType {
    pub name: String,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl SqlDataType {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), length: None, precision: None, scale: None }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn to_data_type(&self) -> Result<DataType> {
        self.name.parse()
    }
}

impl fmt::Display for SqlDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        match (self.length, self.precision, self.scale) {
            (Some(length), _, _) => write!(f, "({})", length),
            (None, Some(p), Some(s)) => write!(f, "({}, {})", p, s),
            (None, Some(p), None) => write!(f, "({})", p),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlColumnDefinition {
    pub column_name: String,
    pub data_type: SqlDataType,
    pub allow_nulls: bool,
}

impl SqlColumnDefinition {
    pub fn new(column_name: &str, data_type: SqlDataType) -> Self {
        Self { column_name: column_name.to_string(), data_type, allow_nulls: true }
    }

    pub fn not_null(mut self) -> Self {
        self.allow_nulls = false;
        self
    }

    /// Schema entry for this definition; fails on an unknown type name.
    pub fn to_schema_column(&self) -> Result<SchemaColumn> {
        let column = SchemaColumn::new(&self.column_name, self.data_type.to_data_type()?);
        Ok(if self.allow_nulls { column } else { column.not_null() })
    }
}

impl fmt::Display for SqlColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column_name, self.data_type)?;
        if !self.allow_nulls {
            write!(f, " NOT NULL")?;
        }
        Ok(())
    }
}

/// `(child column, parent column)` pairs of a foreign key.
pub type SqlColumnReferences = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq)]
pub enum SqlConstraintKind {
    PrimaryKey(Vec<String>),
    Unique(Vec<String>),
    ForeignKey { parent_table: SqlTable, column_references: SqlColumnReferences },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlConstraintDefinition {
    pub name: Option<String>,
    pub kind: SqlConstraintKind,
}

impl fmt::Display for SqlConstraintDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "CONSTRAINT {} ", name)?;
        }
        match &self.kind {
            SqlConstraintKind::PrimaryKey(cols) => write!(f, "PRIMARY KEY ({})", cols.join(", ")),
            SqlConstraintKind::Unique(cols) => write!(f, "UNIQUE ({})", cols.join(", ")),
            SqlConstraintKind::ForeignKey { parent_table, column_references } => {
                let (child, parent): (Vec<&str>, Vec<&str>) =
                    column_references.iter().map(|(c, p)| (c.as_str(), p.as_str())).unzip();
                write!(
                    f,
                    "FOREIGN KEY ({}) REFERENCES {} ({})",
                    child.join(", "),
                    parent_table,
                    parent.join(", ")
                )
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlCreateTableDefinition {
    pub table: SqlTable,
    pub columns: Vec<SqlColumnDefinition>,
    pub constraints: Vec<SqlConstraintDefinition>,
}

impl SqlCreateTableDefinition {
    pub fn new(table: SqlTable) -> Self {
        Self { table, columns: Vec::new(), constraints: Vec::new() }
    }

    pub fn with_column(mut self, column: SqlColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_constraint(mut self, constraint: SqlConstraintDefinition) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn schema_columns(&self) -> Result<Vec<SchemaColumn>> {
        self.columns.iter().map(|c| c.to_schema_column()).collect()
    }
}

impl fmt::Display for SqlCreateTableDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self
            .columns
            .iter()
            .map(|c| c.to_string())
            .chain(self.constraints.iter().map(|c| c.to_string()))
            .collect();
        write!(f, "CREATE TABLE {} ({})", self.table, items.join(", "))
    }
}
