//! FILENAME: table/src/schema.rs
//! PURPOSE: Column descriptions for source and output tables.

use serde::{Deserialize, Serialize};

/// The declared type of a column. Informational only: grouping and
/// aggregation never coerce values based on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColumnType {
    Text,
    Number,
    Boolean,
    #[default]
    Any,
}

/// Describes one column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name (unique within a table by convention, not enforced).
    pub name: String,

    /// Declared value type.
    pub column_type: ColumnType,

    /// Human-readable header text.
    pub label: String,
}

impl ColumnSpec {
    /// Creates a column whose label is its name.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        let name = name.into();
        ColumnSpec {
            label: name.clone(),
            name,
            column_type,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}
