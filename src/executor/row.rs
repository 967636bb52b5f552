use std::sync::Arc;

use indexmap::IndexSet;
use serde_json::{Map, Value as Json};

use crate::database::Value;

/// Ordered column names shared by every row of one source or result.
pub type RowLayout = IndexSet<String>;

/// A positional record whose columns can also be looked up by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    layout: Arc<RowLayout>,
    values: Vec<Value>,
}

impl Row {
    /// `values` must line up with `layout`; missing trailing values read as `Null`.
    pub fn new(layout: Arc<RowLayout>, values: Vec<Value>) -> Self {
        Self { layout, values }
    }

    pub fn layout(&self) -> &Arc<RowLayout> { &self.layout }

    pub fn values(&self) -> &[Value] { &self.values }

    pub fn into_values(self) -> Vec<Value> { self.values }

    pub fn len(&self) -> usize { self.layout.len() }

    pub fn is_empty(&self) -> bool { self.layout.is_empty() }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        if index < self.layout.len() {
            Some(self.values.get(index).unwrap_or(&Value::Null))
        } else {
            None
        }
    }

    /// Exact name first, then the first case-insensitive match.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.layout
            .get_index_of(name)
            .or_else(|| self.layout.iter().position(|c| c.eq_ignore_ascii_case(name)))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.position(name).and_then(|i| self.get_index(i))
    }

    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.layout.iter()
    }

    pub fn to_json(&self) -> Json {
        let mut map = Map::new();
        for (i, name) in self.layout.iter().enumerate() {
            let v = self.values.get(i).map(Value::to_json).unwrap_or(Json::Null);
            map.insert(name.clone(), v);
        }
        Json::Object(map)
    }
}
