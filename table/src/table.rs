//! FILENAME: table/src/table.rs
//! PURPOSE: A flat row/column container with a typed schema.
//! CONTEXT: Used both as the aggregation input and as the flattened output.
//! Rows are always normalized to the column count, so positional access
//! never needs to consider ragged rows.

use serde::{Deserialize, Serialize};
use crate::cell::CellValue;
use crate::schema::ColumnSpec;

/// A single row: one cell per column, addressed by position.
pub type Row = Vec<CellValue>;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// An ordered list of column specs and an ordered list of rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with the given schema.
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Creates a table and appends every row through `push_row`.
    pub fn with_rows(columns: Vec<ColumnSpec>, rows: Vec<Row>) -> Self {
        let mut table = Table::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Appends a row, padding with empty cells or dropping extra trailing
    /// cells so its length matches the column count.
    pub fn push_row(&mut self, mut values: Row) {
        values.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(values);
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, index: usize) -> Option<&ColumnSpec> {
        self.columns.get(index)
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Returns the cell at (row, col), or an empty cell when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("region", ColumnType::Text),
            ColumnSpec::new("revenue", ColumnType::Number),
        ]
    }

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut table = Table::new(columns());
        table.push_row(vec![CellValue::text("US")]);

        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[0][1], CellValue::Empty);
    }

    #[test]
    fn test_push_row_truncates_long_rows() {
        let mut table = Table::new(columns());
        table.push_row(vec![
            CellValue::text("US"),
            CellValue::Number(10.0),
            CellValue::text("extra"),
        ]);

        assert_eq!(table.rows[0], vec![CellValue::text("US"), CellValue::Number(10.0)]);
    }

    #[test]
    fn test_cell_out_of_range_is_empty() {
        let table = Table::with_rows(columns(), vec![vec![CellValue::text("US"), 10.0.into()]]);

        assert_eq!(table.cell(0, 1), &CellValue::Number(10.0));
        assert_eq!(table.cell(5, 0), &CellValue::Empty);
        assert_eq!(table.cell(0, 9), &CellValue::Empty);
    }

    #[test]
    fn test_serializes_to_json() {
        let table = Table::with_rows(columns(), vec![vec!["EU".into(), 5.0.into()]]);
        let json = serde_json::to_string(&table).unwrap();
        let back: Table = serde_json::from_str(&json).unwrap();

        assert_eq!(back, table);
    }
}
