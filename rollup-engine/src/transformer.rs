//! FILENAME: rollup-engine/src/transformer.rs
//! Aggregation Transformer - flattens the partially expanded tree.
//!
//! Algorithm:
//! 1. Validate the configured columns against the source schema
//! 2. Recompute the aggregation model over every source row
//! 3. Honor a deferred "expand all" against the fresh tree
//! 4. Order output columns: dimensions first, then facts
//! 5. Walk the tree depth-first from the root-level values, emitting one
//!    summary row per collapsed node and recursing into expanded ones
//!
//! Output rows use a fixed display convention for dimension cells. For a
//! node at depth L, slots above L-1 show the path's outermost value (not
//! each ancestor's own value), slot L-1 shows the node's own value, and
//! deeper slots are empty.

use serde::{Deserialize, Serialize};
use table::{CellValue, ColumnSpec, Row, Table};

use crate::definition::{AggregationType, FieldIndex, RollupDefinition};
use crate::error::{Result, RollupError};
use crate::expansion::ExpansionState;
use crate::key::DimensionPath;
use crate::model::{AggregationModel, AggregationNode};

/// Per-row metadata for rendering collaborators, aligned with the output
/// table rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowInfo {
    /// The path of the node that produced the row.
    pub path: DimensionPath,

    /// Whether the node has children that could be revealed.
    pub has_children: bool,

    /// Whether the node's path is in the expansion set. Only leaf-level
    /// rows can be both emitted and expanded.
    pub is_expanded: bool,
}

/// Runs compute passes and owns the expansion state between them.
#[derive(Debug, Clone)]
pub struct AggregationTransformer {
    definition: RollupDefinition,

    /// Outermost dimension column; flattening starts from its values.
    root_column: FieldIndex,

    model: AggregationModel,
    expansion: ExpansionState,

    /// Last successfully produced table.
    output: Option<Table>,
    row_info: Vec<RowInfo>,
}

impl AggregationTransformer {
    /// Creates a transformer. Fails if the definition has no dimension or
    /// no fact columns.
    pub fn new(definition: RollupDefinition) -> Result<Self> {
        definition.validate()?;
        Ok(AggregationTransformer {
            // validate() guarantees at least one dimension
            root_column: definition.dimensions[0],
            model: AggregationModel::from_definition(&definition),
            expansion: ExpansionState::new(definition.depth()),
            definition,
            output: None,
            row_info: Vec::new(),
        })
    }

    pub fn definition(&self) -> &RollupDefinition {
        &self.definition
    }

    pub fn aggregation(&self) -> AggregationType {
        self.definition.aggregation
    }

    pub fn model(&self) -> &AggregationModel {
        &self.model
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// The table produced by the last successful `transform`.
    pub fn output(&self) -> Option<&Table> {
        self.output.as_ref()
    }

    /// Metadata for each row of `output()`, in the same order.
    pub fn row_info(&self) -> &[RowInfo] {
        &self.row_info
    }

    // ------------------------------------------------------------------------
    // Expansion surface
    // ------------------------------------------------------------------------

    pub fn expand(&mut self, path: &DimensionPath, expand_ancestors: bool) -> Result<()> {
        self.expansion.expand(path, expand_ancestors)
    }

    pub fn collapse(&mut self, path: &DimensionPath, collapse_descendants: bool) -> Result<()> {
        self.expansion.collapse(path, collapse_descendants)
    }

    pub fn toggle(&mut self, path: &DimensionPath) -> Result<bool> {
        self.expansion.toggle(path)
    }

    pub fn expand_all(&mut self) {
        self.expansion.expand_all(&self.model);
    }

    pub fn collapse_all(&mut self) {
        self.expansion.collapse_all();
    }

    pub fn is_expanded(&self, path: &DimensionPath) -> bool {
        self.expansion.is_expanded(path)
    }

    // ------------------------------------------------------------------------
    // Transform
    // ------------------------------------------------------------------------

    /// Recomputes the model over `source` and flattens it. On failure the
    /// previous output is kept and nothing partial is exposed.
    pub fn transform(&mut self, source: &Table) -> Result<&Table> {
        self.definition.validate_against(source.column_count())?;
        self.model.compute(source)?;
        self.expansion.apply_pending(&self.model);

        let columns = self.output_columns(source)?;
        let (rows, row_info) = self.flatten()?;

        log::debug!(
            "transformed {} source rows into {} output rows ({} expanded paths)",
            source.row_count(),
            rows.len(),
            self.expansion.len()
        );

        self.row_info = row_info;
        Ok(&*self.output.insert(Table { columns, rows }))
    }

    /// Dimension columns in configured order, then fact columns.
    fn output_columns(&self, source: &Table) -> Result<Vec<ColumnSpec>> {
        self.definition
            .dimensions
            .iter()
            .chain(self.definition.facts.iter())
            .map(|&index| {
                source.column(index).cloned().ok_or(RollupError::ColumnOutOfRange {
                    index,
                    column_count: source.column_count(),
                })
            })
            .collect()
    }

    /// Depth-first walk over the tree, seeded with the root dimension's
    /// values. Uses an explicit stack; children are pushed in reverse so
    /// they pop in stored order.
    fn flatten(&self) -> Result<(Vec<Row>, Vec<RowInfo>)> {
        let depth = self.definition.depth();
        let mut stack: Vec<DimensionPath> = self
            .model
            .values_for_dimension(self.root_column)?
            .iter()
            .rev()
            .map(|value| DimensionPath::root().child(value.clone()))
            .collect();

        let mut rows = Vec::new();
        let mut row_info = Vec::new();

        while let Some(path) = stack.pop() {
            let node = self.model.facts(&path)?;
            let is_expanded = self.expansion.is_expanded(&path);

            if !is_expanded || path.len() == depth {
                rows.push(self.summary_row(&path, node));
                row_info.push(RowInfo {
                    has_children: node.has_children(),
                    is_expanded,
                    path,
                });
                continue;
            }

            for &child in node.children().iter().rev() {
                let value = self
                    .model
                    .node(child)
                    .and_then(AggregationNode::value)
                    .ok_or_else(|| RollupError::PathNotFound(path.to_string()))?;
                stack.push(path.child(value.clone()));
            }
        }

        Ok((rows, row_info))
    }

    fn summary_row(&self, path: &DimensionPath, node: &AggregationNode) -> Row {
        let depth = self.definition.depth();
        let level = path.len();
        let mut row = Vec::with_capacity(depth + self.definition.facts.len());

        for slot in 0..depth {
            let value = if slot + 1 < level {
                path.first()
            } else if slot + 1 == level {
                path.last()
            } else {
                None
            };
            row.push(value.map_or(CellValue::Empty, CellValue::from));
        }

        for fact_position in 0..self.definition.facts.len() {
            row.push(node.aggregate(self.definition.aggregation, fact_position).into());
        }
        row
    }
}

/// One-shot rollup of `source` with every node collapsed.
pub fn rollup(definition: RollupDefinition, source: &Table) -> Result<Table> {
    let mut transformer = AggregationTransformer::new(definition)?;
    Ok(transformer.transform(source)?.clone())
}
