//! FILENAME: rollup-engine/src/lib.rs
//! Hierarchical rollup engine.
//!
//! Groups the rows of a flat table by a hierarchy of dimension columns,
//! aggregates fact columns at every level, and flattens the partially
//! expanded tree back into a table. It depends on `table` for the shared
//! row/column types only.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the rollup IS)
//! - `key`: Hashable dimension values and paths
//! - `accumulator`: Per-fact statistics
//! - `model`: The group-by tree (HOW we compute)
//! - `expansion`: Which branches are open
//! - `transformer`: Flattening into the output table (WHAT we display)

pub mod accumulator;
pub mod definition;
pub mod error;
pub mod expansion;
pub mod key;
pub mod model;
pub mod transformer;

pub use accumulator::{AggregateAccumulator, AggregateValue};
pub use definition::*;
pub use error::{Result, RollupError};
pub use expansion::ExpansionState;
pub use key::{DimensionPath, DimensionValue, OrderedFloat};
pub use model::{AggregationModel, AggregationNode, DrillDownResult, ModelStats, NodeId, ROOT_NODE};
pub use transformer::{rollup, AggregationTransformer, RowInfo};
