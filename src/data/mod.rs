//! Core data structures: result tables and identifier mappings.

pub mod mapping;
pub mod table;

pub use mapping::{IdMap, IdMapper};
pub use table::{ResultTable, SortOrder};
