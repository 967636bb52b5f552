use std::{fs, path::Path, sync::Arc};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value as Json};

use crate::{
    database::{DataType, RowSource, SchemaColumn, TableSchema, Value},
    executor::{Row, RowLayout},
    Error, Result,
};

/// An in-memory table: an ordered schema plus rows stored positionally.
///
/// Tables can be declared column by column and filled with [`Value`]s, or
/// built straight from JSON arrays of objects, in which case the schema is
/// inferred (and extended when later batches bring new keys).
#[derive(Debug, Clone)]
pub struct MemoryTable {
    name: String,
    schema: TableSchema,
    layout: Arc<RowLayout>,
    rows: Vec<Vec<Value>>,
    created: DateTime<Utc>,
}

impl MemoryTable {
    pub fn new(name: &str, columns: Vec<SchemaColumn>) -> Self {
        let schema = TableSchema::new(columns);
        let layout = Arc::new(schema.names().cloned().collect());
        Self {
            name: name.to_string(),
            schema,
            layout,
            rows: Vec::new(),
            created: Utc::now(),
        }
    }

    /// Shorthand for `new` with nullable columns.
    pub fn with_columns(name: &str, columns: &[(&str, DataType)]) -> Self {
        let columns = columns.iter().map(|(n, ty)| SchemaColumn::new(n, *ty)).collect();
        Self::new(name, columns)
    }

    /// Build a table from a JSON array of objects, inferring its schema.
    pub fn from_json(name: &str, items: Json) -> Result<Self> {
        let mut table = Self::new(name, Vec::new());
        table.add_batch(items)?;
        Ok(table)
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn schema(&self) -> &TableSchema { &self.schema }

    pub fn created(&self) -> DateTime<Utc> { self.created }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Append one row. Values are converted to the column types.
    pub fn add_row(&mut self, values: Vec<Value>) -> Result<()> {
        let row = self.convert_row(values)?;
        self.rows.push(row);
        Ok(())
    }

    /// Append several rows; nothing is appended when any row fails to convert.
    pub fn add_rows<I>(&mut self, rows: I) -> Result<usize>
    where
        I: IntoIterator<Item = Vec<Value>>,
    {
        let converted = rows
            .into_iter()
            .map(|r| self.convert_row(r))
            .collect::<Result<Vec<_>>>()?;
        let count = converted.len();
        self.rows.extend(converted);
        Ok(count)
    }

    /// Append a JSON array of objects.
    ///
    /// Keys not yet in the schema become new (nullable) columns, and rows
    /// already stored read `Null` for them. Missing keys read as `Null`.
    /// Returns the number of rows added.
    pub fn add_batch(&mut self, items: Json) -> Result<usize> {
        let Json::Array(items) = items else {
            return Err(Error::Json(format!("table {} expects a JSON array of objects", self.name)));
        };

        let objects = items
            .iter()
            .map(|item| {
                item.as_object()
                    .ok_or_else(|| Error::Json(format!("table {} expects JSON objects, got {}", self.name, item)))
            })
            .collect::<Result<Vec<&Map<String, Json>>>>()?;

        self.extend_schema(&objects);

        let rows = objects
            .iter()
            .map(|obj| {
                self.schema
                    .columns
                    .values()
                    .map(|c| match obj.get(&c.name) {
                        Some(v) => Value::from_json(v, c.data_type),
                        None => Ok(Value::Null),
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let count = rows.len();
        self.rows.extend(rows);
        tracing::debug!(target: "sqlblocks::database", table = %self.name, count, "rows added");
        Ok(count)
    }

    /// Remove all rows, keeping the schema. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.rows.len();
        self.rows.clear();
        count
    }

    /// Load a JSON array into the table, replacing the current rows unless `keep`.
    pub fn load_from_json(&mut self, json: Json, keep: bool) -> Result<usize> {
        if !json.is_array() {
            return Err(Error::Json(format!(
                "the JSON loaded into table {} does not contain an array at its root",
                self.name
            )));
        }
        if !keep {
            self.clear();
        }
        self.add_batch(json)
    }

    /// Replace the rows of the table with the JSON array stored in `path`.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("could not read {}: {}", path.display(), e)))?;
        let json = serde_json::from_str::<Json>(&content)
            .map_err(|e| Error::Json(format!("{} does not contain valid JSON: {}", path.display(), e)))?;

        let count = self.load_from_json(json, false)?;
        tracing::debug!(target: "sqlblocks::database", table = %self.name, count, path = %path.display(), "table loaded from file");
        Ok(count)
    }

    /// Stream the rows of the table.
    ///
    /// When every name in `columns` is a column of the table the rows are
    /// narrowed to those columns, otherwise full rows are produced.
    pub fn scan(&self, columns: &[String]) -> RowSource<'_> {
        let positions: Option<Vec<usize>> = if columns.is_empty() {
            None
        } else {
            columns.iter().map(|c| self.schema.position(c)).collect()
        };

        match positions {
            Some(positions) => {
                let layout: Arc<RowLayout> = Arc::new(columns.iter().cloned().collect());
                Box::new(self.rows.iter().map(move |r| {
                    let values = positions.iter().map(|&i| r[i].clone()).collect();
                    Ok(Row::new(layout.clone(), values))
                }))
            }
            None => {
                let layout = self.layout.clone();
                Box::new(self.rows.iter().map(move |r| Ok(Row::new(layout.clone(), r.clone()))))
            }
        }
    }

    fn convert_row(&self, values: Vec<Value>) -> Result<Vec<Value>> {
        if values.len() != self.schema.len() {
            return Err(Error::Other(format!(
                "table {} has {} columns but {} values were supplied",
                self.name,
                self.schema.len(),
                values.len()
            )));
        }
        values
            .into_iter()
            .zip(self.schema.columns.values())
            .map(|(v, c)| v.cast(c.data_type))
            .collect()
    }

    fn extend_schema(&mut self, objects: &[&Map<String, Json>]) {
        let inferred = TableSchema::infer_from_objects(objects.iter().copied());
        let had_rows = !self.rows.is_empty();
        let mut added = 0;
        for mut column in inferred.columns.into_values() {
            column.nullable |= had_rows;
            if self.schema.push(column) {
                added += 1;
            }
        }

        if added > 0 {
            for row in self.rows.iter_mut() {
                row.resize(self.schema.len(), Value::Null);
            }
            self.layout = Arc::new(self.schema.names().cloned().collect());
        }
    }
}
