use serde_json::Value as Json;

use crate::{
    executor::{OutputSchema, Row},
    Result,
};

/// Lazily produced output rows.
pub type ResultRows<'a> = Box<dyn Iterator<Item = Result<Row>> + 'a>;

/// Output of [`crate::executor::QueryEngine::query`]: the columns of the
/// result and the rows, produced as they are pulled.
pub struct QueryResult<'a> {
    pub schema: OutputSchema,
    pub rows: ResultRows<'a>,
}

impl<'a> QueryResult<'a> {
    pub fn new(schema: OutputSchema, rows: ResultRows<'a>) -> Self {
        Self { schema, rows }
    }

    /// Drain the rows, stopping at the first error.
    pub fn collect_rows(self) -> Result<Vec<Row>> {
        self.rows.collect()
    }

    /// The whole result as a JSON array of objects.
    pub fn to_json(self) -> Result<Json> {
        let rows = self.collect_rows()?;
        Ok(Json::Array(rows.iter().map(Row::to_json).collect()))
    }
}

/// Skip-then-take over a row stream. A bound of 0 is not applied; skipped
/// rows are still pulled from upstream. Errors are never skipped and end
/// the stream.
pub struct RowWindow<I> {
    inner: I,
    offset: usize,
    limit: Option<usize>,
    failed: bool,
}

impl<I> RowWindow<I> {
    pub fn new(inner: I, offset: usize, limit: usize) -> Self {
        Self { inner, offset, limit: (limit > 0).then_some(limit), failed: false }
    }
}

impl<I: Iterator<Item = Result<Row>>> Iterator for RowWindow<I> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.limit == Some(0) {
            return None;
        }
        loop {
            match self.inner.next()? {
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
                Ok(_) if self.offset > 0 => self.offset -= 1,
                Ok(row) => {
                    if let Some(limit) = &mut self.limit {
                        *limit -= 1;
                    }
                    return Some(Ok(row));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{database::Value, executor::RowLayout, Error};

    fn rows(n: i32) -> impl Iterator<Item = Result<Row>> {
        let layout: Arc<RowLayout> = Arc::new(["n".to_string()].into_iter().collect());
        (1..=n).map(move |i| Ok(Row::new(layout.clone(), vec![Value::Int(i)])))
    }

    fn values(window: RowWindow<impl Iterator<Item = Result<Row>>>) -> Vec<Value> {
        window.map(|r| r.unwrap().get("n").cloned().unwrap()).collect()
    }

    #[test]
    fn offset_then_limit() {
        assert_eq!(values(RowWindow::new(rows(5), 2, 1)), vec![Value::Int(3)]);
        assert_eq!(values(RowWindow::new(rows(5), 0, 2)), vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(values(RowWindow::new(rows(3), 1, 0)).len(), 2);
        assert!(values(RowWindow::new(rows(3), 5, 0)).is_empty());
    }

    #[test]
    fn errors_are_not_skipped_and_end_the_stream() {
        let failing = rows(2).chain(std::iter::once(Err(Error::Other("boom".into())))).chain(rows(2));
        let out: Vec<_> = RowWindow::new(failing, 3, 0).collect();
        assert_eq!(out.len(), 1);
        assert!(out[0].is_err());
    }

    #[test]
    fn result_converts_to_json() {
        let schema = OutputSchema::count();
        let layout = schema.layout().clone();
        let result = QueryResult::new(schema, Box::new(std::iter::once(Ok(Row::new(layout, vec![Value::Long(4)])))));
        assert_eq!(result.to_json().unwrap(), json!([{ "Count": 4 }]));
    }
}
