pub mod table;
pub use table::*;

pub mod column;
pub use column::*;

pub mod column_ref;
pub use column_ref::*;

pub mod parameter;
pub use parameter::*;

pub mod function;
pub use function::*;

pub mod literal_value;
pub use literal_value::*;

pub mod binary_expression;
pub use binary_expression::*;

pub mod expression;
pub use expression::*;

pub mod select_column;
pub use select_column::*;

pub mod join;
pub use join::*;

pub mod limit_offset;
pub use limit_offset::*;

pub mod select_definition;
pub use select_definition::*;

pub mod insert_definition;
pub use insert_definition::*;

pub mod update_definition;
pub use update_definition::*;

pub mod delete_definition;
pub use delete_definition::*;

pub mod create_table_definition;
pub use create_table_definition::*;

pub mod alter_table_definition;
pub use alter_table_definition::*;

pub mod definition;
pub use definition::*;
