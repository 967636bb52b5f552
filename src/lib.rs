pub mod error;
pub use error::{Error, Result};

pub mod database;
pub use database::{
    ConnectionConfig, DataType, MemoryDatabase, MemoryTable, TableDataProvider, TableSchemaProvider, Value,
};

pub mod model;
pub use model::{SqlDefinition, SqlExpression, SqlSelectDefinition};

pub mod visitor;

pub mod analyzer;

pub mod executor;
pub use executor::{QueryEngine, QueryResult, Row};
