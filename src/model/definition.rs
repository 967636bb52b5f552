use std::fmt;

use crate::{
    database::FunctionProvider,
    model::{
        SqlAlterTableDefinition, SqlCreateTableDefinition, SqlDeleteDefinition, SqlInsertDefinition,
        SqlSelectDefinition, SqlUpdateDefinition,
    },
    visitor::{FunctionsResolver, ParametersResolver, SqlVisitor},
    Result,
};

/// Any statement the model can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlDefinition {
    Select(SqlSelectDefinition),
    Insert(SqlInsertDefinition),
    Update(SqlUpdateDefinition),
    Delete(SqlDeleteDefinition),
    Create(SqlCreateTableDefinition),
    Alter(SqlAlterTableDefinition),
}

impl SqlDefinition {
    /// DDL statements hold no expressions and are left untouched.
    pub fn accept<V: SqlVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        match self {
            SqlDefinition::Select(s) => s.accept(visitor),
            SqlDefinition::Insert(i) => i.accept(visitor),
            SqlDefinition::Update(u) => u.accept(visitor),
            SqlDefinition::Delete(d) => d.accept(visitor),
            SqlDefinition::Create(_) | SqlDefinition::Alter(_) => Ok(()),
        }
    }

    pub fn resolve_parameters(&mut self, resolver: &mut ParametersResolver) -> Result<()> {
        self.accept(resolver)
    }

    pub fn resolve_functions(&mut self, provider: &dyn FunctionProvider) -> Result<()> {
        self.accept(&mut FunctionsResolver::from_provider(provider))
    }

    pub fn as_select(&self) -> Option<&SqlSelectDefinition> {
        match self {
            SqlDefinition::Select(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SqlDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlDefinition::Select(s) => write!(f, "{}", s),
            SqlDefinition::Insert(i) => write!(f, "{}", i),
            SqlDefinition::Update(u) => write!(f, "{}", u),
            SqlDefinition::Delete(d) => write!(f, "{}", d),
            SqlDefinition::Create(c) => write!(f, "{}", c),
            SqlDefinition::Alter(a) => write!(f, "{}", a),
        }
    }
}

impl From<SqlSelectDefinition> for SqlDefinition {
    fn from(s: SqlSelectDefinition) -> Self {
        SqlDefinition::Select(s)
    }
}
