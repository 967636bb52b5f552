use std::fmt;

use crate::{
    model::{SqlBinaryExpression, SqlBinaryOperator, SqlColumnRef, SqlFunction, SqlLiteralValue, SqlParameter},
    visitor::SqlVisitor,
    Result,
};

/// One node of a scalar expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlExpression {
    Column(SqlColumnRef),
    Parameter(SqlParameter),
    Function(SqlFunction),
    Value(SqlLiteralValue),
    BinExpr(Box<SqlBinaryExpression>),
}

impl SqlExpression {
    pub fn column(name: &str) -> Self {
        SqlExpression::Column(SqlColumnRef::named(name))
    }

    pub fn qualified(table: &str, name: &str) -> Self {
        SqlExpression::Column(SqlColumnRef::qualified(table, name))
    }

    pub fn value(value: impl Into<SqlLiteralValue>) -> Self {
        SqlExpression::Value(value.into())
    }

    pub fn binary(left: SqlExpression, operator: SqlBinaryOperator, right: SqlExpression) -> Self {
        SqlExpression::BinExpr(Box::new(SqlBinaryExpression::new(left, operator, right)))
    }

    pub fn as_binary(&self) -> Option<&SqlBinaryExpression> {
        match self {
            SqlExpression::BinExpr(b) => Some(b),
            _ => None,
        }
    }

    /// Walk the tree, letting the visitor replace leaves. A leaf is swapped
    /// only when the visitor returns `Some`.
    pub fn accept<V: SqlVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        let replacement = match self {
            SqlExpression::BinExpr(bin) => {
                bin.accept(visitor)?;
                None
            }
            ref leaf => leaf.visit_leaf(visitor)?,
        };

        if let Some(replacement) = replacement {
            tracing::trace!(target: "sqlblocks::visitor", from = %self, to = %replacement, "leaf replaced");
            *self = replacement;
        }
        Ok(())
    }

    /// Walk the tree without replacing anything; replacements returned by
    /// the visitor are ignored.
    pub fn inspect<V: SqlVisitor + ?Sized>(&self, visitor: &mut V) -> Result<()> {
        match self {
            SqlExpression::BinExpr(bin) => bin.inspect(visitor),
            leaf => leaf.visit_leaf(visitor).map(|_| ()),
        }
    }

    fn visit_leaf<V: SqlVisitor + ?Sized>(&self, visitor: &mut V) -> Result<Option<SqlExpression>> {
        match self {
            SqlExpression::Column(c) => visitor.visit_column(c),
            SqlExpression::Parameter(p) => visitor.visit_parameter(p),
            SqlExpression::Function(f) => visitor.visit_function(f),
            SqlExpression::Value(v) => visitor.visit_value(v),
            SqlExpression::BinExpr(_) => Ok(None),
        }
    }
}

impl fmt::Display for SqlExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlExpression::Column(c) => write!(f, "{}", c),
            SqlExpression::Parameter(p) => write!(f, "{}", p),
            SqlExpression::Function(func) => write!(f, "{}", func),
            SqlExpression::Value(v) => write!(f, "{}", v),
            SqlExpression::BinExpr(b) => write!(f, "{}", b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        binaries: usize,
        leaves: Vec<String>,
    }

    impl SqlVisitor for Counter {
        fn visit_binary(&mut self, _binary: &SqlBinaryExpression) -> Result<()> {
            self.binaries += 1;
            Ok(())
        }
        fn visit_column(&mut self, column: &SqlColumnRef) -> Result<Option<SqlExpression>> {
            self.leaves.push(column.to_string());
            Ok(None)
        }
        fn visit_value(&mut self, value: &SqlLiteralValue) -> Result<Option<SqlExpression>> {
            self.leaves.push(value.to_string());
            Ok(None)
        }
    }

    struct ColumnsToZero;

    impl SqlVisitor for ColumnsToZero {
        fn visit_column(&mut self, _column: &SqlColumnRef) -> Result<Option<SqlExpression>> {
            Ok(Some(SqlExpression::value(0)))
        }
    }

    fn sample() -> SqlExpression {
        SqlExpression::binary(
            SqlExpression::binary(SqlExpression::qualified("c", "ID"), SqlBinaryOperator::Equal, SqlExpression::value(1)),
            SqlBinaryOperator::Or,
            SqlExpression::binary(SqlExpression::column("Name"), SqlBinaryOperator::Like, SqlExpression::value("J%")),
        )
    }

    #[test]
    fn walk_is_depth_first_in_source_order() {
        let mut counter = Counter { binaries: 0, leaves: Vec::new() };
        sample().inspect(&mut counter).unwrap();
        assert_eq!(counter.binaries, 3);
        assert_eq!(counter.leaves, vec!["c.ID", "1", "Name", "'J%'"]);
    }

    #[test]
    fn accept_swaps_leaves_and_inspect_does_not() {
        let original = sample();

        let inspected = original.clone();
        inspected.inspect(&mut ColumnsToZero).unwrap();
        assert_eq!(inspected, original);

        let mut rewritten = original.clone();
        rewritten.accept(&mut ColumnsToZero).unwrap();
        assert_eq!(rewritten.to_string(), "((0 = 1) OR (0 LIKE 'J%'))");
    }

    #[test]
    fn leaf_root_can_be_replaced() {
        let mut e = SqlExpression::column("x");
        e.accept(&mut ColumnsToZero).unwrap();
        assert_eq!(e, SqlExpression::value(0));
    }
}
