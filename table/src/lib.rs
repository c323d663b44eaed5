//! FILENAME: table/src/lib.rs
//! PURPOSE: Shared tabular types for the rollup engine and its callers.
//! CONTEXT: Re-exports public types for use by other crates.

pub mod cell;
pub mod schema;
pub mod table;

// Re-export commonly used types at the crate root
pub use cell::{CellError, CellValue};
pub use schema::{ColumnSpec, ColumnType};
pub use table::{Row, Table};
