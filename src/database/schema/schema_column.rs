use serde::{Deserialize, Serialize};

use crate::database::DataType;

/// One column of a table schema as reported by a schema provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub name: String,
    pub data_type: DataType,
    #[serde(default = "SchemaColumn::default_nullable")]
    pub nullable: bool,
}

impl SchemaColumn {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self { name: name.to_string(), data_type, nullable: true }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    fn default_nullable() -> bool {
        true
    }
}
