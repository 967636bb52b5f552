pub mod table_finder;
pub use table_finder::*;

pub mod select_reference_resolver;
pub use select_reference_resolver::*;
