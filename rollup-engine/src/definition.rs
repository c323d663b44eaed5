//! FILENAME: rollup-engine/src/definition.rs
//! Rollup Definition - The serializable configuration.
//!
//! This module contains the types needed to DESCRIBE a rollup:
//! which source columns form the dimension hierarchy, which are measured,
//! and which statistic the flattened output shows.
//! These structures are immutable snapshots of user intent; they are fixed
//! for the lifetime of a transformer.

use serde::{Deserialize, Serialize};
use crate::error::{Result, RollupError};

/// Index into the source table columns (0-based).
pub type FieldIndex = usize;

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions for fact columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationType {
    /// Total of the finite values.
    Sum,
    /// Smallest finite value, absent when there is none.
    Min,
    /// Largest finite value, absent when there is none.
    Max,
    /// Number of rows holding a finite value.
    #[serde(rename = "valid")]
    ValidCount,
}

impl Default for AggregationType {
    fn default() -> Self {
        AggregationType::Sum
    }
}

// ============================================================================
// ROLLUP DEFINITION
// ============================================================================

/// The complete rollup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupDefinition {
    /// Dimension columns, outermost first.
    pub dimensions: Vec<FieldIndex>,

    /// Fact columns, in output order.
    pub facts: Vec<FieldIndex>,

    /// Statistic shown in the output fact cells.
    #[serde(default)]
    pub aggregation: AggregationType,
}

impl RollupDefinition {
    pub fn new(dimensions: Vec<FieldIndex>, facts: Vec<FieldIndex>) -> Self {
        RollupDefinition {
            dimensions,
            facts,
            aggregation: AggregationType::default(),
        }
    }

    pub fn with_aggregation(mut self, aggregation: AggregationType) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Number of hierarchy levels.
    pub fn depth(&self) -> usize {
        self.dimensions.len()
    }

    /// Checks the parts of the configuration that do not depend on a table.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions.is_empty() {
            return Err(RollupError::EmptyDimensions);
        }
        if self.facts.is_empty() {
            return Err(RollupError::EmptyFacts);
        }
        Ok(())
    }

    /// Checks that every configured column exists in a table of
    /// `column_count` columns.
    pub fn validate_against(&self, column_count: usize) -> Result<()> {
        self.validate()?;
        check_column_range(&self.dimensions, &self.facts, column_count)
    }
}

/// Reports the first dimension or fact index outside `0..column_count`.
pub(crate) fn check_column_range(
    dimensions: &[FieldIndex],
    facts: &[FieldIndex],
    column_count: usize,
) -> Result<()> {
    match dimensions
        .iter()
        .chain(facts)
        .copied()
        .find(|&index| index >= column_count)
    {
        Some(index) => Err(RollupError::ColumnOutOfRange { index, column_count }),
        None => Ok(()),
    }
}

/// Hierarchy level of a dimension column.
pub(crate) fn level_of(dimensions: &[FieldIndex], column: FieldIndex) -> Option<usize> {
    dimensions.iter().position(|&d| d == column)
}
