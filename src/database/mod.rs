pub mod data_type;
pub use data_type::*;

pub mod value;
pub use value::*;

pub mod schema;
pub use schema::*;

pub mod connection_config;
pub use connection_config::*;

pub mod table_info;
pub use table_info::*;

pub mod providers;
pub use providers::*;

pub mod memory_table;
pub use memory_table::*;

pub mod memory_database;
pub use memory_database::*;

pub mod all_table_data_provider;
pub use all_table_data_provider::*;
