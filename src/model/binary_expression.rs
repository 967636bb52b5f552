use std::{fmt, str::FromStr};

use crate::{model::SqlExpression, visitor::SqlVisitor, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlBinaryOperator {
    Equal,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    And,
    Or,
    Like,
}

impl SqlBinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Equal | Self::LessThan | Self::LessThanEqual | Self::GreaterThan | Self::GreaterThanEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

impl fmt::Display for SqlBinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Equal => "=",
            Self::LessThan => "<",
            Self::LessThanEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanEqual => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Like => "LIKE",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SqlBinaryOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "=" => Ok(Self::Equal),
            "<" => Ok(Self::LessThan),
            "<=" => Ok(Self::LessThanEqual),
            ">" => Ok(Self::GreaterThan),
            ">=" => Ok(Self::GreaterThanEqual),
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            "LIKE" => Ok(Self::Like),
            other => Err(Error::Other(format!("Invalid binary operator {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlBinaryExpression {
    pub left: SqlExpression,
    pub operator: SqlBinaryOperator,
    pub right: SqlExpression,
}

impl SqlBinaryExpression {
    pub fn new(left: SqlExpression, operator: SqlBinaryOperator, right: SqlExpression) -> Self {
        Self { left, operator, right }
    }

    /// Notify the visitor, then walk left and right, replacing leaves.
    pub fn accept<V: SqlVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        visitor.visit_binary(self)?;
        self.left.accept(visitor)?;
        self.right.accept(visitor)
    }

    /// Same walk as [`SqlBinaryExpression::accept`] without replacing anything.
    pub fn inspect<V: SqlVisitor + ?Sized>(&self, visitor: &mut V) -> Result<()> {
        visitor.visit_binary(self)?;
        self.left.inspect(visitor)?;
        self.right.inspect(visitor)
    }
}

impl fmt::Display for SqlBinaryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}
