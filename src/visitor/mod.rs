pub mod sql_visitor;
pub use sql_visitor::*;

pub mod parameters_resolver;
pub use parameters_resolver::*;

pub mod functions_resolver;
pub use functions_resolver::*;

pub mod functions_encountered;
pub use functions_encountered::*;

pub mod column_refs_visitor;
pub use column_refs_visitor::*;

pub mod contains_tables_visitor;
pub use contains_tables_visitor::*;
