use crate::{
    database::{RowSource, TableDataProvider},
    executor::{Predicate, Row},
    model::SqlTable,
    Error, Result,
};

/// One table of a join chain: what to ask the provider for and which rows to keep.
#[derive(Debug)]
pub struct JoinLevel {
    pub table: SqlTable,
    pub columns: Vec<String>,
    pub predicate: Option<Predicate>,
}

impl JoinLevel {
    pub fn new(table: SqlTable, columns: Vec<String>, predicate: Option<Predicate>) -> Self {
        Self { table, columns, predicate }
    }
}

/// Nested-loop traversal of a FROM/JOIN chain, one combination at a time.
///
/// The cursor keeps one open row source per level it has descended into and
/// the row chosen at every level above the deepest one. Pulling the next
/// item advances the deepest source; when it runs dry the source is dropped
/// and the level above moves on. A source for level `n + 1` is only opened
/// once a row of level `n` has passed that level's predicate, so nothing is
/// read that the caller does not pull.
///
/// Items are the rows chosen at every level, in chain order. The first error
/// ends the traversal.
pub struct JoinCursor<'a> {
    provider: &'a dyn TableDataProvider,
    levels: Vec<JoinLevel>,
    sources: Vec<RowSource<'a>>,
    reached: Vec<Row>,
    done: bool,
}

impl<'a> JoinCursor<'a> {
    pub fn new(provider: &'a dyn TableDataProvider, levels: Vec<JoinLevel>) -> Self {
        let done = levels.is_empty();
        Self { provider, levels, sources: Vec::new(), reached: Vec::new(), done }
    }

    pub fn levels(&self) -> &[JoinLevel] {
        &self.levels
    }

    fn open(&mut self, depth: usize) -> Result<()> {
        let level = &self.levels[depth];
        tracing::trace!(target: "sqlblocks::executor", table = %level.table, depth, columns = ?level.columns, "open source");
        let source = self
            .provider
            .get_table_data(&level.table, &level.columns)
            .ok_or_else(|| Error::TableNotFound(level.table.to_string()))?;
        self.sources.push(source);
        Ok(())
    }

    fn step(&mut self) -> Result<Option<Vec<Row>>> {
        if self.sources.is_empty() {
            self.open(0)?;
        }
        loop {
            let depth = self.sources.len() - 1;
            let Some(next) = self.sources[depth].next() else {
                self.sources.pop();
                if self.reached.pop().is_none() {
                    return Ok(None);
                }
                continue;
            };
            let row = next?;
            if let Some(predicate) = &self.levels[depth].predicate {
                if !predicate.matches(&self.reached, &row)? {
                    continue;
                }
            }
            if depth + 1 == self.levels.len() {
                let mut rows = Vec::with_capacity(self.levels.len());
                rows.extend(self.reached.iter().cloned());
                rows.push(row);
                return Ok(Some(rows));
            }
            self.reached.push(row);
            self.open(depth + 1)?;
        }
    }
}

impl Iterator for JoinCursor<'_> {
    type Item = Result<Vec<Row>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(rows)) => Some(Ok(rows)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                self.sources.clear();
                Some(Err(e))
            }
        }
    }
}
