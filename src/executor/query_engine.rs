use std::iter;

use indexmap::IndexSet;

use crate::{
    database::{TableDataProvider, Value},
    executor::{
        level_of, JoinCursor, JoinLevel, OutputSchema, Predicate, QueryResult, ResultRows, Row, RowWindow,
        TableProjections,
    },
    model::{SqlColumnRef, SqlExpression, SqlJoinKind, SqlLimitValue, SqlSelectDefinition, SqlTable},
    visitor::ColumnRefsVisitor,
    Error, Result,
};

/// Runs a resolved SELECT against a table data provider.
///
/// Parameters and statement-scoped functions must have been replaced by
/// literals beforehand. The returned rows are produced lazily: nothing is
/// read from the provider until the first row is pulled, and dropping the
/// result releases every open source. `COUNT(*)` is the exception, its
/// count is taken when the query runs.
pub struct QueryEngine<'a> {
    provider: &'a dyn TableDataProvider,
    select: &'a SqlSelectDefinition,
}

impl<'a> QueryEngine<'a> {
    pub fn new(provider: &'a dyn TableDataProvider, select: &'a SqlSelectDefinition) -> Self {
        Self { provider, select }
    }

    pub fn query(&self) -> Result<QueryResult<'a>> {
        if let Some(reason) = self.select.invalid_reference_reason() {
            return Err(Error::InvalidReferences(reason.to_string()));
        }
        tracing::debug!(target: "sqlblocks::executor", statement = %self.select, "query");

        let (schema, count_all) = OutputSchema::from_select(self.select)?;
        let (offset, limit) = self.window()?;

        let rows: ResultRows<'a> = if self.select.table.is_none() {
            Box::new(iter::once(schema.project(&[])))
        } else {
            let levels = self.join_levels(&schema)?;
            let cursor = JoinCursor::new(self.provider, levels);
            let projector = schema.clone();
            Box::new(cursor.map(move |rows| rows.and_then(|rows| projector.project(&rows))))
        };
        let rows = RowWindow::new(rows, offset, limit);

        if count_all {
            let mut count: i64 = 0;
            for row in rows {
                row?;
                count += 1;
            }
            tracing::debug!(target: "sqlblocks::executor", count, "count(*)");
            let row = Row::new(schema.layout().clone(), vec![Value::Long(count)]);
            return Ok(QueryResult::new(schema, Box::new(iter::once(Ok(row)))));
        }

        Ok(QueryResult::new(schema, Box::new(rows)))
    }

    /// Offset and limit; 0 means "not applied".
    fn window(&self) -> Result<(usize, usize)> {
        let Some(limit) = &self.select.limit else {
            return Ok((0, 0));
        };
        let value = |v: &SqlLimitValue| match v {
            SqlLimitValue::Value(n) => Ok(usize::try_from(*n).unwrap_or(0)),
            SqlLimitValue::Parameter(p) => Err(Error::UnresolvedParameter(p.to_string())),
        };
        Ok((value(&limit.row_offset)?, value(&limit.row_count)?))
    }

    /// One level per FROM/JOIN table. A level filters on its ON condition,
    /// and on WHERE at the first level where every table WHERE reads has
    /// been reached.
    fn join_levels(&self, schema: &OutputSchema) -> Result<Vec<JoinLevel>> {
        let tables: Vec<SqlTable> = self.select.tables().into_iter().cloned().collect();
        let projections = TableProjections::build(self.select, schema)?;
        let where_level = match &self.select.where_clause {
            Some(where_clause) => Some(self.where_level(where_clause, &tables)?),
            None => None,
        };

        let mut levels = Vec::with_capacity(tables.len());
        for (depth, table) in tables.iter().enumerate() {
            let reached = &tables[..=depth];
            let mut conditions: Vec<&SqlExpression> = Vec::new();
            let mut predicate = None;

            if depth > 0 {
                let join = &self.select.joins[depth - 1];
                if join.kind != SqlJoinKind::Inner {
                    tracing::debug!(target: "sqlblocks::executor", table = %table, kind = ?join.kind, "outer join executed as inner join");
                }
                predicate = Some(Predicate::compile_binary(&join.condition, reached)?);
            }
            if where_level == Some(depth) {
                if let Some(where_clause) = &self.select.where_clause {
                    tracing::trace!(target: "sqlblocks::executor", table = %table, depth, "where applied");
                    let filter = Predicate::compile(where_clause, reached)?;
                    predicate = Some(match predicate {
                        Some(on) => on.and(filter),
                        None => filter,
                    });
                    conditions.push(where_clause);
                }
            }

            let mut columns: IndexSet<String> = projections.columns(depth).into_iter().collect();
            let mut refs = ColumnRefsVisitor::new();
            if depth > 0 {
                self.select.joins[depth - 1].condition.inspect(&mut refs)?;
            }
            for condition in conditions {
                condition.inspect(&mut refs)?;
            }
            for column_ref in &refs.results {
                if Self::ref_level(column_ref, reached)? == Some(depth) {
                    if let Some(column) = &column_ref.column {
                        columns.insert(column.column_name.clone());
                    }
                }
            }

            levels.push(JoinLevel::new(table.clone(), columns.into_iter().collect(), predicate));
        }
        Ok(levels)
    }

    /// The deepest level WHERE reads, which is the first level at which
    /// every table it reads has been reached.
    fn where_level(&self, where_clause: &SqlExpression, tables: &[SqlTable]) -> Result<usize> {
        let mut refs = ColumnRefsVisitor::new();
        where_clause.inspect(&mut refs)?;
        let mut deepest = 0;
        for column_ref in &refs.results {
            let level = Self::ref_level(column_ref, tables)?.ok_or_else(|| {
                Error::Other(format!(
                    "WHERE clause {} reads tables that are not part of the FROM/JOIN list",
                    where_clause
                ))
            })?;
            deepest = deepest.max(level);
        }
        Ok(deepest)
    }

    /// Join level a bound reference reads from, matching the alias first.
    fn ref_level(column_ref: &SqlColumnRef, tables: &[SqlTable]) -> Result<Option<usize>> {
        let table = column_ref.bound_table().ok_or_else(|| Error::UnboundColumn(column_ref.to_string()))?;
        Ok(level_of(tables, table))
    }
}
