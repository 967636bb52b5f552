use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

use crate::database::{DataType, SchemaColumn};

/// Ordered column list of a table.
///
/// Order matters: it is the order wildcards expand to and the positional
/// layout of the rows a table source produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    /// Map of column name -> column metadata, in ordinal order
    pub columns: IndexMap<String, SchemaColumn>,
}

impl TableSchema {
    pub fn new(columns: Vec<SchemaColumn>) -> Self {
        Self {
            columns: columns.into_iter().map(|c| (c.name.clone(), c)).collect(),
        }
    }

    /// Return the column with `name`; falls back to a case-insensitive match
    /// when `case_insensitive` is set and no exact match exists.
    pub fn get(&self, name: &str, case_insensitive: bool) -> Option<&SchemaColumn> {
        self.columns.get(name).or_else(|| {
            if case_insensitive {
                self.columns.values().find(|c| c.name.eq_ignore_ascii_case(name))
            } else {
                None
            }
        })
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.columns.keys()
    }

    pub fn to_columns(&self) -> Vec<SchemaColumn> {
        self.columns.values().cloned().collect()
    }

    /// Append a column; an existing column with the same name is left untouched.
    /// Returns `true` when the column was added.
    pub fn push(&mut self, column: SchemaColumn) -> bool {
        if self.columns.contains_key(&column.name) {
            return false;
        }
        self.columns.insert(column.name.clone(), column);
        true
    }

    /// Infer a schema from a batch of JSON objects.
    ///
    /// Keys are ordered by first appearance. Numeric types widen across rows,
    /// a key that is null or missing in any row makes the column nullable, and
    /// a key that is only ever null becomes a nullable `String` column.
    pub fn infer_from_objects<'a, I>(objects: I) -> TableSchema
    where
        I: IntoIterator<Item = &'a Map<String, Json>>,
    {
        let mut inferred: IndexMap<String, (Option<DataType>, bool)> = IndexMap::new();
        let mut seen_rows = 0usize;

        for obj in objects {
            for (key, (_, nullable)) in inferred.iter_mut() {
                if !obj.contains_key(key) {
                    *nullable = true;
                }
            }

            for (key, value) in obj {
                let ty = DataType::of_json(value);
                let entry = inferred.entry(key.clone()).or_insert((None, seen_rows > 0));
                match ty {
                    None => entry.1 = true,
                    Some(ty) => entry.0 = Some(entry.0.map_or(ty, |old| DataType::promote(old, ty))),
                }
            }
            seen_rows += 1;
        }

        let columns = inferred
            .into_iter()
            .map(|(name, (ty, nullable))| SchemaColumn {
                name,
                data_type: ty.unwrap_or(DataType::String),
                nullable: nullable || ty.is_none(),
            })
            .collect();

        TableSchema::new(columns)
    }
}
