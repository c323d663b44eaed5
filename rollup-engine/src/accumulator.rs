//! FILENAME: rollup-engine/src/accumulator.rs
//! Aggregate accumulator - incremental statistics for one fact column.

use serde::{Deserialize, Serialize};
use table::CellValue;
use crate::definition::AggregationType;

/// The result of an aggregation. `Absent` is distinct from zero: it marks
/// a min/max over a subtree that holds no finite value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AggregateValue {
    Number(f64),
    Absent,
}

impl From<AggregateValue> for CellValue {
    fn from(value: AggregateValue) -> Self {
        match value {
            AggregateValue::Number(n) => CellValue::Number(n),
            AggregateValue::Absent => CellValue::Empty,
        }
    }
}

/// Accumulator for computing aggregates incrementally.
/// Stores the state needed for every aggregation type at once, so a node
/// can answer any of them without another pass over the rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateAccumulator {
    pub sum: f64,
    /// Rows whose value was a finite number.
    pub valid: u64,
    /// All rows seen, finite or not.
    pub rows: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AggregateAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one source cell. Missing, non-numeric and non-finite values
    /// only count toward `rows`.
    pub fn add(&mut self, value: &CellValue) {
        self.rows += 1;
        if let Some(n) = value.as_finite() {
            self.add_number(n);
        }
    }

    fn add_number(&mut self, value: f64) {
        self.valid += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Computes the final aggregate value.
    pub fn compute(&self, aggregation: AggregationType) -> AggregateValue {
        match aggregation {
            AggregationType::Sum => AggregateValue::Number(self.sum),
            AggregationType::ValidCount => AggregateValue::Number(self.valid as f64),
            AggregationType::Min => self.min.map_or(AggregateValue::Absent, AggregateValue::Number),
            AggregationType::Max => self.max.map_or(AggregateValue::Absent, AggregateValue::Number),
        }
    }
}
