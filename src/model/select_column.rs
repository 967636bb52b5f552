use std::fmt;

use crate::model::{SqlColumn, SqlExpression, SqlFunction, SqlLiteralValue, SqlParameter, SqlTable};

/// `*` or `table.*`. Resolution fills `table_refs` and `columns`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlAllColumns {
    pub table_name: Option<String>,
    pub table_refs: Vec<SqlTable>,
    pub columns: Vec<SqlColumn>,
}

impl SqlAllColumns {
    pub fn of_table(table_name: &str) -> Self {
        Self { table_name: Some(table_name.to_string()), ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlFunctionColumn {
    pub function: SqlFunction,
    pub column_alias: Option<String>,
}

/// An aggregate call; `argument` is `None` for `*`.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlAggregate {
    pub aggregate_name: String,
    pub argument: Option<SqlExpression>,
    pub column_alias: Option<String>,
}

impl SqlAggregate {
    pub fn count_all() -> Self {
        Self { aggregate_name: "COUNT".to_string(), argument: None, column_alias: None }
    }

    pub fn is_count(&self) -> bool {
        self.aggregate_name.eq_ignore_ascii_case("COUNT")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlParameterColumn {
    pub parameter: SqlParameter,
    pub column_alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlLiteralValueColumn {
    pub value: SqlLiteralValue,
    pub column_alias: Option<String>,
}

/// One item of a SELECT projection list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectColumn {
    Column(SqlColumn),
    AllColumns(SqlAllColumns),
    Function(SqlFunctionColumn),
    Aggregate(SqlAggregate),
    Parameter(SqlParameterColumn),
    Literal(SqlLiteralValueColumn),
}

impl SelectColumn {
    pub fn column(name: &str) -> Self {
        SelectColumn::Column(SqlColumn::named(name))
    }

    pub fn qualified(table: &str, name: &str) -> Self {
        SelectColumn::Column(SqlColumn::qualified(table, name))
    }

    pub fn all() -> Self {
        SelectColumn::AllColumns(SqlAllColumns::default())
    }

    pub fn function(function: SqlFunction) -> Self {
        SelectColumn::Function(SqlFunctionColumn { function, column_alias: None })
    }

    pub fn parameter(parameter: SqlParameter) -> Self {
        SelectColumn::Parameter(SqlParameterColumn { parameter, column_alias: None })
    }

    pub fn literal(value: SqlLiteralValue) -> Self {
        SelectColumn::Literal(SqlLiteralValueColumn { value, column_alias: None })
    }

    /// Set the alias of any item except a wildcard.
    pub fn with_alias(mut self, alias: &str) -> Self {
        let alias = Some(alias.to_string());
        match &mut self {
            SelectColumn::Column(c) => c.column_alias = alias,
            SelectColumn::Function(c) => c.column_alias = alias,
            SelectColumn::Aggregate(c) => c.column_alias = alias,
            SelectColumn::Parameter(c) => c.column_alias = alias,
            SelectColumn::Literal(c) => c.column_alias = alias,
            SelectColumn::AllColumns(_) => {}
        }
        self
    }

    /// Source name of the item: column or function or aggregate name.
    pub fn column_name(&self) -> Option<&str> {
        match self {
            SelectColumn::Column(c) => Some(&c.column_name),
            SelectColumn::Function(c) => Some(&c.function.function_name),
            SelectColumn::Aggregate(c) => Some(&c.aggregate_name),
            SelectColumn::AllColumns(_) | SelectColumn::Parameter(_) | SelectColumn::Literal(_) => None,
        }
    }

    pub fn column_alias(&self) -> Option<&str> {
        match self {
            SelectColumn::Column(c) => c.column_alias.as_deref(),
            SelectColumn::Function(c) => c.column_alias.as_deref(),
            SelectColumn::Aggregate(c) => c.column_alias.as_deref(),
            SelectColumn::Parameter(c) => c.column_alias.as_deref(),
            SelectColumn::Literal(c) => c.column_alias.as_deref(),
            SelectColumn::AllColumns(_) => None,
        }
    }

    pub fn is_count(&self) -> bool {
        matches!(self, SelectColumn::Aggregate(a) if a.is_count())
    }
}

impl fmt::Display for SelectColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectColumn::Column(c) => return write!(f, "{}", c),
            SelectColumn::AllColumns(a) => {
                return match &a.table_name {
                    Some(t) => write!(f, "{}.*", t),
                    None => write!(f, "*"),
                }
            }
            SelectColumn::Function(c) => write!(f, "{}", c.function)?,
            SelectColumn::Aggregate(a) => match &a.argument {
                Some(arg) => write!(f, "{}({})", a.aggregate_name, arg)?,
                None => write!(f, "{}(*)", a.aggregate_name)?,
            },
            SelectColumn::Parameter(p) => write!(f, "{}", p.parameter)?,
            SelectColumn::Literal(l) => write!(f, "{}", l.value)?,
        }
        match self.column_alias() {
            Some(alias) => write!(f, " AS {}", alias),
            None => Ok(()),
        }
    }
}
