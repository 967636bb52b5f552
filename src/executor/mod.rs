pub mod row;
pub use row::*;

pub mod truth;
pub use truth::*;

pub mod eval;
pub use eval::*;

pub mod predicate;
pub use predicate::*;

pub mod output_schema;
pub use output_schema::*;

pub mod table_projection;
pub use table_projection::*;

pub mod join_cursor;
pub use join_cursor::*;

pub mod query_result;
pub use query_result::*;

pub mod query_engine;
pub use query_engine::*;
