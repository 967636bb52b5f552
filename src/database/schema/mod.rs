pub mod schema_column;
pub use schema_column::*;

pub mod table_schema;
pub use table_schema::*;
