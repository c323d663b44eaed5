//! FILENAME: rollup-engine/src/error.rs

use thiserror::Error;
use crate::definition::FieldIndex;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RollupError {
    #[error("at least one dimension column is required")]
    EmptyDimensions,

    #[error("at least one fact column is required")]
    EmptyFacts,

    #[error("column index {index} is out of range for a table with {column_count} columns")]
    ColumnOutOfRange { index: FieldIndex, column_count: usize },

    #[error("column {0} is not a configured dimension")]
    NotADimension(FieldIndex),

    #[error("path length {length} is outside 1..={max_depth}")]
    InvalidPath { length: usize, max_depth: usize },

    #[error("no aggregation node for path {0}")]
    PathNotFound(String),

    #[error("aggregation model has not been computed")]
    NotComputed,
}

pub type Result<T> = std::result::Result<T, RollupError>;
