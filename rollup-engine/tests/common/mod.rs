//! FILENAME: tests/common/mod.rs
//! Fixtures for rollup-engine integration tests.

#![allow(dead_code)]

use table::{CellValue, ColumnSpec, ColumnType, Table};

/// Sales data with a three-level hierarchy (region, product, quarter) and
/// two measures (sales, quantity).
pub struct SalesFixture;

impl SalesFixture {
    pub const REGION: usize = 0;
    pub const PRODUCT: usize = 1;
    pub const QUARTER: usize = 2;
    pub const SALES: usize = 3;
    pub const QUANTITY: usize = 4;

    pub fn headers() -> Vec<&'static str> {
        vec!["Region", "Product", "Quarter", "Sales", "Quantity"]
    }

    pub fn data() -> Vec<(&'static str, &'static str, &'static str, f64, f64)> {
        vec![
            ("North", "Apples", "Q1", 100.0, 10.0),
            ("North", "Apples", "Q2", 150.0, 15.0),
            ("North", "Oranges", "Q1", 200.0, 20.0),
            ("South", "Apples", "Q1", 120.0, 12.0),
            ("South", "Oranges", "Q2", 180.0, 18.0),
            ("South", "Oranges", "Q2", 60.0, 6.0),
            ("East", "Pears", "Q3", 90.0, 9.0),
            ("North", "Oranges", "Q3", 40.0, 4.0),
        ]
    }

    pub fn columns() -> Vec<ColumnSpec> {
        let types = [
            ColumnType::Text,
            ColumnType::Text,
            ColumnType::Text,
            ColumnType::Number,
            ColumnType::Number,
        ];
        Self::headers()
            .into_iter()
            .zip(types)
            .map(|(name, column_type)| ColumnSpec::new(name.to_lowercase(), column_type).with_label(name))
            .collect()
    }

    pub fn table() -> Table {
        let rows = Self::data()
            .into_iter()
            .map(|(region, product, quarter, sales, quantity)| {
                vec![
                    CellValue::text(region),
                    CellValue::text(product),
                    CellValue::text(quarter),
                    CellValue::Number(sales),
                    CellValue::Number(quantity),
                ]
            })
            .collect();
        Table::with_rows(Self::columns(), rows)
    }

    /// Distinct (region, product, quarter) combinations in `data()`.
    pub fn leaf_path_count() -> usize {
        7
    }
}

/// Shorthand for a text cell.
pub fn text(s: &str) -> CellValue {
    CellValue::text(s)
}

/// Returns the first `n` cells of each row rendered as display strings.
pub fn labels(table: &Table, n: usize) -> Vec<Vec<String>> {
    table
        .rows
        .iter()
        .map(|row| row.iter().take(n).map(CellValue::display_value).collect())
        .collect()
}
