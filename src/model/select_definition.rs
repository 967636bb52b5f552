use std::fmt;

use crate::{
    analyzer::SelectReferenceResolver,
    database::{ConnectionConfig, FunctionProvider, TableSchemaProvider},
    model::{SelectColumn, SqlExpression, SqlJoin, SqlLimitOffset, SqlLiteralValueColumn, SqlTable},
    visitor::{FunctionsResolver, ParametersResolver, SqlVisitor},
    Error, Result,
};

/// A SELECT statement.
///
/// Built empty, populated by the parser (or by hand), then resolved in place
/// by [`SqlSelectDefinition::resolve_references`]. The first semantic problem
/// found while resolving is kept in `invalid_reference_reason` and stops any
/// further resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlSelectDefinition {
    pub columns: Vec<SelectColumn>,
    pub table: Option<SqlTable>,
    pub joins: Vec<SqlJoin>,
    pub where_clause: Option<SqlExpression>,
    pub limit: Option<SqlLimitOffset>,
    invalid_reference_reason: Option<String>,
}

impl SqlSelectDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: SqlTable) -> Self {
        Self { table: Some(table), ..Self::default() }
    }

    pub fn with_column(mut self, column: SelectColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_join(mut self, join: SqlJoin) -> Self {
        self.joins.push(join);
        self
    }

    pub fn with_where(mut self, where_clause: SqlExpression) -> Self {
        self.where_clause = Some(where_clause);
        self
    }

    pub fn with_limit(mut self, limit: SqlLimitOffset) -> Self {
        self.limit = Some(limit);
        self
    }

    /// FROM table followed by the JOIN tables, in source order.
    pub fn tables(&self) -> Vec<&SqlTable> {
        self.table.iter().chain(self.joins.iter().map(|j| &j.table)).collect()
    }

    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut SqlTable> {
        self.table.iter_mut().chain(self.joins.iter_mut().map(|j| &mut j.table))
    }

    pub fn invalid_references(&self) -> bool {
        self.invalid_reference_reason.is_some()
    }

    pub fn invalid_reference_reason(&self) -> Option<&str> {
        self.invalid_reference_reason.as_deref()
    }

    /// Record a resolution failure. Only the first reason is kept; returns
    /// whether this call recorded it.
    pub fn set_invalid_reference_reason(&mut self, reason: impl Into<String>) -> bool {
        if self.invalid_reference_reason.is_some() {
            return false;
        }
        self.invalid_reference_reason = Some(reason.into());
        true
    }

    /// Bind every column of the statement, see [`SelectReferenceResolver`].
    pub fn resolve_references(
        &mut self,
        config: &ConnectionConfig,
        schema_provider: &dyn TableSchemaProvider,
        function_provider: Option<&dyn FunctionProvider>,
    ) {
        SelectReferenceResolver::new(config, schema_provider, function_provider).resolve(self);
    }

    pub fn resolve_parameters(&mut self, resolver: &mut ParametersResolver) -> Result<()> {
        self.accept(resolver)
    }

    pub fn resolve_functions(&mut self, provider: &dyn FunctionProvider) -> Result<()> {
        self.accept(&mut FunctionsResolver::from_provider(provider))
    }

    /// Walk projection, ON conditions, WHERE and LIMIT/OFFSET, in that order.
    pub fn accept<V: SqlVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        self.accept_columns(visitor)?;
        self.accept_binary_expressions(visitor)?;
        if let Some(limit) = &mut self.limit {
            limit.accept(visitor)?;
        }
        Ok(())
    }

    /// Parameter, function and literal projection items the visitor turns
    /// into a literal become literal columns; unaliased ones are named
    /// `Column1`, `Column2`, ...
    pub fn accept_columns<V: SqlVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        let mut unnamed_index = 1;
        for column in self.columns.iter_mut() {
            let replacement = match column {
                SelectColumn::Parameter(p) => visitor.visit_parameter(&p.parameter)?,
                SelectColumn::Function(f) => visitor.visit_function(&f.function)?,
                SelectColumn::Literal(l) => visitor.visit_value(&l.value)?,
                SelectColumn::Aggregate(a) => {
                    if let Some(argument) = &mut a.argument {
                        argument.accept(visitor)?;
                    }
                    None
                }
                SelectColumn::Column(_) | SelectColumn::AllColumns(_) => None,
            };

            let value = match replacement {
                None => continue,
                Some(SqlExpression::Value(value)) => value,
                Some(other) => {
                    return Err(Error::Other(format!(
                        "projection item {} can only be replaced by a literal, got {}",
                        column, other
                    )));
                }
            };

            let column_alias = match column.column_alias() {
                Some(alias) => alias.to_string(),
                None => {
                    let alias = format!("Column{}", unnamed_index);
                    unnamed_index += 1;
                    alias
                }
            };
            *column = SelectColumn::Literal(SqlLiteralValueColumn { value, column_alias: Some(column_alias) });
        }
        Ok(())
    }

    /// Walk the ON conditions in join order, then WHERE.
    pub fn accept_binary_expressions<V: SqlVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        for join in self.joins.iter_mut() {
            join.condition.accept(visitor)?;
        }
        if let Some(where_clause) = &mut self.where_clause {
            where_clause.accept(visitor)?;
        }
        Ok(())
    }

    /// Read-only walk over the same nodes as [`Self::accept`], in the same
    /// order. Replacements handed back by the visitor are dropped.
    pub fn inspect<V: SqlVisitor + ?Sized>(&self, visitor: &mut V) -> Result<()> {
        for column in &self.columns {
            match column {
                SelectColumn::Parameter(p) => {
                    visitor.visit_parameter(&p.parameter)?;
                }
                SelectColumn::Function(f) => {
                    visitor.visit_function(&f.function)?;
                }
                SelectColumn::Literal(l) => {
                    visitor.visit_value(&l.value)?;
                }
                SelectColumn::Aggregate(a) => {
                    if let Some(argument) = &a.argument {
                        argument.inspect(visitor)?;
                    }
                }
                SelectColumn::Column(_) | SelectColumn::AllColumns(_) => {}
            }
        }
        for join in &self.joins {
            join.condition.inspect(visitor)?;
        }
        if let Some(where_clause) = &self.where_clause {
            where_clause.inspect(visitor)?;
        }
        if let Some(limit) = &self.limit {
            limit.inspect(visitor)?;
        }
        Ok(())
    }
}

impl fmt::Display for SqlSelectDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<String> = self.columns.iter().map(|c| c.to_string()).collect();
        write!(f, "SELECT {}", columns.join(", "))?;
        if let Some(table) = &self.table {
            write!(f, " FROM {}", table)?;
        }
        for join in &self.joins {
            write!(f, " {}", join)?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {}", where_clause)?;
        }
        if let Some(limit) = &self.limit {
            write!(f, " LIMIT {} OFFSET {}", limit.row_count, limit.row_offset)?;
        }
        Ok(())
    }
}
