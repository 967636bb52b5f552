use std::fmt;

use crate::model::{SqlBinaryExpression, SqlTable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SqlJoinKind {
    #[default]
    Inner,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlJoin {
    pub kind: SqlJoinKind,
    pub table: SqlTable,
    pub condition: SqlBinaryExpression,
}

impl SqlJoin {
    pub fn inner(table: SqlTable, condition: SqlBinaryExpression) -> Self {
        Self { kind: SqlJoinKind::Inner, table, condition }
    }
}

impl fmt::Display for SqlJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            SqlJoinKind::Inner => "INNER",
            SqlJoinKind::Left => "LEFT",
            SqlJoinKind::Right => "RIGHT",
        };
        write!(f, "{} JOIN {} ON {}", kind, self.table, self.condition)
    }
}
