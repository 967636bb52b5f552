use std::fmt;

use crate::{
    model::{SqlColumn, SqlExpression, SqlFunction, SqlLiteralValue, SqlParameter, SqlTable},
    visitor::SqlVisitor,
    Error, Result,
};

/// Right-hand side of `SET column = ...`.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlAssignmentValue {
    Literal(SqlLiteralValue),
    Parameter(SqlParameter),
    Function(SqlFunction),
}

impl SqlAssignmentValue {
    /// Let the visitor replace the value. Only literal replacements are
    /// accepted since an assignment cannot hold anything else.
    pub fn accept<V: SqlVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        let replacement = match self {
            SqlAssignmentValue::Literal(l) => visitor.visit_value(l)?,
            SqlAssignmentValue::Parameter(p) => visitor.visit_parameter(p)?,
            SqlAssignmentValue::Function(f) => visitor.visit_function(f)?,
        };
        match replacement {
            None => Ok(()),
            Some(SqlExpression::Value(value)) => {
                *self = SqlAssignmentValue::Literal(value);
                Ok(())
            }
            Some(SqlExpression::Parameter(p)) => {
                *self = SqlAssignmentValue::Parameter(p);
                Ok(())
            }
            Some(SqlExpression::Function(f)) => {
                *self = SqlAssignmentValue::Function(f);
                Ok(())
            }
            Some(other) => Err(Error::Other(format!("{} cannot be assigned to a column", other))),
        }
    }
}

impl fmt::Display for SqlAssignmentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlAssignmentValue::Literal(l) => write!(f, "{}", l),
            SqlAssignmentValue::Parameter(p) => write!(f, "{}", p),
            SqlAssignmentValue::Function(func) => write!(f, "{}", func),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlAssignment {
    pub column: SqlColumn,
    pub value: SqlAssignmentValue,
}

impl SqlAssignment {
    pub fn new(column: &str, value: SqlAssignmentValue) -> Self {
        Self { column: SqlColumn::named(column), value }
    }
}

/// What a data-modifying statement hands back: a column of the affected
/// rows, or a plain number.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlReturning {
    Column(SqlColumn),
    Int(i32),
}

impl fmt::Display for SqlReturning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlReturning::Column(c) => write!(f, "RETURNING {}", c),
            SqlReturning::Int(i) => write!(f, "RETURNING {}", i),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlUpdateDefinition {
    pub table: SqlTable,
    pub assignments: Vec<SqlAssignment>,
    pub where_clause: Option<SqlExpression>,
    pub returning: Option<SqlReturning>,
}

impl SqlUpdateDefinition {
    pub fn new(table: SqlTable) -> Self {
        Self { table, assignments: Vec::new(), where_clause: None, returning: None }
    }

    pub fn with_assignment(mut self, assignment: SqlAssignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    pub fn with_where(mut self, where_clause: SqlExpression) -> Self {
        self.where_clause = Some(where_clause);
        self
    }

    /// Assignments in order, then WHERE.
    pub fn accept<V: SqlVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        for assignment in self.assignments.iter_mut() {
            assignment.value.accept(visitor)?;
        }
        if let Some(where_clause) = &mut self.where_clause {
            where_clause.accept(visitor)?;
        }
        Ok(())
    }
}

impl fmt::Display for SqlUpdateDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sets: Vec<String> = self
            .assignments
            .iter()
            .map(|a| format!("{} = {}", a.column, a.value))
            .collect();
        write!(f, "UPDATE {} SET {}", self.table, sets.join(", "))?;
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {}", where_clause)?;
        }
        if let Some(returning) = &self.returning {
            write!(f, " {}", returning)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SqlBinaryOperator;

    struct Params;

    impl SqlVisitor for Params {
        fn visit_parameter(&mut self, _p: &SqlParameter) -> Result<Option<SqlExpression>> {
            Ok(Some(SqlExpression::value("Jill")))
        }
    }

    struct ToColumn;

    impl SqlVisitor for ToColumn {
        fn visit_parameter(&mut self, _p: &SqlParameter) -> Result<Option<SqlExpression>> {
            Ok(Some(SqlExpression::column("x")))
        }
    }

    fn update() -> SqlUpdateDefinition {
        SqlUpdateDefinition::new(SqlTable::new(None, "Customers"))
            .with_assignment(SqlAssignment::new(
                "CustomerName",
                SqlAssignmentValue::Parameter(SqlParameter::named("@name")),
            ))
            .with_where(SqlExpression::binary(
                SqlExpression::column("ID"),
                SqlBinaryOperator::Equal,
                SqlExpression::Parameter(SqlParameter::named("@id")),
            ))
    }

    #[test]
    fn parameters_are_replaced_in_assignments_and_where() {
        let mut u = update();
        u.accept(&mut Params).unwrap();
        assert_eq!(u.to_string(), "UPDATE Customers SET CustomerName = 'Jill' WHERE (ID = 'Jill')");
    }

    #[test]
    fn assignments_only_take_values() {
        let mut u = update();
        assert!(matches!(u.accept(&mut ToColumn), Err(Error::Other(_))));
    }
}
