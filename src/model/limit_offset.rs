use std::fmt;

use crate::{model::SqlParameter, visitor::SqlVisitor, Result};

/// A `LIMIT` or `OFFSET` operand. `Value(0)` means "not specified".
#[derive(Debug, Clone, PartialEq)]
pub enum SqlLimitValue {
    Value(i64),
    Parameter(SqlParameter),
}

impl Default for SqlLimitValue {
    fn default() -> Self {
        SqlLimitValue::Value(0)
    }
}

impl SqlLimitValue {
    /// The number, or `None` while a parameter is still pending.
    pub fn value(&self) -> Option<i64> {
        match self {
            SqlLimitValue::Value(v) => Some(*v),
            SqlLimitValue::Parameter(_) => None,
        }
    }

    pub fn accept<V: SqlVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        if let Some(replacement) = visitor.visit_limit(self)? {
            *self = replacement;
        }
        Ok(())
    }

    pub fn inspect<V: SqlVisitor + ?Sized>(&self, visitor: &mut V) -> Result<()> {
        visitor.visit_limit(self).map(|_| ())
    }
}

impl fmt::Display for SqlLimitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlLimitValue::Value(v) => write!(f, "{}", v),
            SqlLimitValue::Parameter(p) => write!(f, "{}", p),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlLimitOffset {
    pub row_count: SqlLimitValue,
    pub row_offset: SqlLimitValue,
}

impl SqlLimitOffset {
    pub fn new(row_count: i64, row_offset: i64) -> Self {
        Self {
            row_count: SqlLimitValue::Value(row_count),
            row_offset: SqlLimitValue::Value(row_offset),
        }
    }

    pub fn accept<V: SqlVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        self.row_count.accept(visitor)?;
        self.row_offset.accept(visitor)
    }

    pub fn inspect<V: SqlVisitor + ?Sized>(&self, visitor: &mut V) -> Result<()> {
        self.row_count.inspect(visitor)?;
        self.row_offset.inspect(visitor)
    }
}
