//! FILENAME: rollup-engine/src/model.rs
//! Aggregation Model - the multi-level group-by tree.
//!
//! The tree is stored as an arena: nodes live in one vector and refer to
//! each other by index. It is built in a single pass over the source rows;
//! each row walks down from the root one dimension at a time, creating the
//! node for its value at that level on first sight and feeding its fact
//! cells to every node on the way. No recursion is involved, so hierarchy
//! depth is bounded only by memory.
//!
//! Children keep the order in which their values were first encountered.
//! Repeated runs over the same input therefore yield the same tree.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use table::Table;

use crate::accumulator::{AggregateAccumulator, AggregateValue};
use crate::definition::{check_column_range, level_of, AggregationType, FieldIndex, RollupDefinition};
use crate::error::{Result, RollupError};
use crate::key::{DimensionPath, DimensionValue};

/// Index of a node within the model's arena.
pub type NodeId = usize;

/// The grand-total node always sits at the start of the arena.
pub const ROOT_NODE: NodeId = 0;

// ============================================================================
// AGGREGATION NODE
// ============================================================================

/// One group of the hierarchy, identified by its dimension path.
#[derive(Debug, Clone)]
pub struct AggregationNode {
    path: DimensionPath,
    parent: Option<NodeId>,
    children: Vec<NodeId>,

    /// One accumulator per fact column, in configured order.
    accumulators: Vec<AggregateAccumulator>,

    /// Source row indices. Only populated on leaf-level nodes.
    source_rows: Vec<usize>,
}

impl AggregationNode {
    fn new(path: DimensionPath, parent: Option<NodeId>, fact_count: usize) -> Self {
        AggregationNode {
            path,
            parent,
            children: Vec::new(),
            accumulators: vec![AggregateAccumulator::new(); fact_count],
            source_rows: Vec::new(),
        }
    }

    pub fn path(&self) -> &DimensionPath {
        &self.path
    }

    /// The node's own dimension value. `None` for the grand-total root.
    pub fn value(&self) -> Option<&DimensionValue> {
        self.path.last()
    }

    /// Depth in the tree: 0 for the root, 1 for the outermost dimension.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of source rows in this subtree.
    pub fn row_count(&self) -> usize {
        self.accumulators.first().map_or(0, |acc| acc.rows as usize)
    }

    pub fn accumulator(&self, fact_position: usize) -> Option<&AggregateAccumulator> {
        self.accumulators.get(fact_position)
    }

    /// Aggregate of the fact at `fact_position` (position within the
    /// configured fact list, not the source column index).
    pub fn aggregate(&self, aggregation: AggregationType, fact_position: usize) -> AggregateValue {
        self.accumulators
            .get(fact_position)
            .map_or(AggregateValue::Absent, |acc| acc.compute(aggregation))
    }

    fn accumulate(&mut self, table: &Table, row: usize, facts: &[FieldIndex]) {
        for (acc, &column) in self.accumulators.iter_mut().zip(facts) {
            acc.add(table.cell(row, column));
        }
    }
}

// ============================================================================
// DRILL DOWN
// ============================================================================

/// The source rows behind one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillDownResult {
    pub path: DimensionPath,
    /// Source row indices in ascending order, at most `max_records` of them.
    pub source_rows: Vec<usize>,
    pub total_count: usize,
    pub max_records: usize,
    pub is_truncated: bool,
}

// ============================================================================
// MODEL
// ============================================================================

/// Statistics about the last compute pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStats {
    pub source_rows: usize,
    pub node_count: usize,
    pub leaf_count: usize,
}

/// Builds and owns the aggregation tree for a fixed set of dimension and
/// fact columns.
#[derive(Debug, Clone)]
pub struct AggregationModel {
    dimensions: Vec<FieldIndex>,
    facts: Vec<FieldIndex>,

    /// Arena of nodes; `ROOT_NODE` is the grand total.
    nodes: Vec<AggregationNode>,

    /// Canonical path -> node lookup.
    path_index: FxHashMap<DimensionPath, NodeId>,

    /// Distinct values per dimension level, in first-encountered order.
    level_values: Vec<Vec<DimensionValue>>,

    computed: bool,
    stats: ModelStats,
}

impl AggregationModel {
    pub fn new(dimensions: Vec<FieldIndex>, facts: Vec<FieldIndex>) -> Self {
        AggregationModel {
            dimensions,
            facts,
            nodes: Vec::new(),
            path_index: FxHashMap::default(),
            level_values: Vec::new(),
            computed: false,
            stats: ModelStats::default(),
        }
    }

    pub fn from_definition(definition: &RollupDefinition) -> Self {
        Self::new(definition.dimensions.clone(), definition.facts.clone())
    }

    pub fn dimension_columns(&self) -> &[FieldIndex] {
        &self.dimensions
    }

    pub fn fact_columns(&self) -> &[FieldIndex] {
        &self.facts
    }

    pub fn depth(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_computed(&self) -> bool {
        self.computed
    }

    pub fn stats(&self) -> ModelStats {
        self.stats
    }

    /// Rebuilds the tree from `table`, replacing the previous one.
    /// On failure the previous tree is left untouched.
    pub fn compute(&mut self, table: &Table) -> Result<()> {
        check_column_range(&self.dimensions, &self.facts, table.column_count())?;

        let fact_count = self.facts.len();
        let mut nodes = vec![AggregationNode::new(DimensionPath::root(), None, fact_count)];
        let mut path_index = FxHashMap::default();
        path_index.insert(DimensionPath::root(), ROOT_NODE);

        // (parent, value) -> child, so a row never has to build its path
        // just to find an existing node.
        let mut edges: FxHashMap<(NodeId, DimensionValue), NodeId> = FxHashMap::default();
        let mut level_seen: Vec<FxHashSet<DimensionValue>> =
            vec![FxHashSet::default(); self.dimensions.len()];
        let mut level_values: Vec<Vec<DimensionValue>> = vec![Vec::new(); self.dimensions.len()];

        for row in 0..table.row_count() {
            nodes[ROOT_NODE].accumulate(table, row, &self.facts);
            let mut current = ROOT_NODE;

            for (level, &column) in self.dimensions.iter().enumerate() {
                let key = (current, DimensionValue::from(table.cell(row, column)));
                let next = match edges.get(&key).copied() {
                    Some(id) => id,
                    None => {
                        let id = nodes.len();
                        let path = nodes[current].path.child(key.1.clone());
                        nodes.push(AggregationNode::new(path.clone(), Some(current), fact_count));
                        nodes[current].children.push(id);
                        path_index.insert(path, id);

                        if level_seen[level].insert(key.1.clone()) {
                            level_values[level].push(key.1.clone());
                        }
                        edges.insert(key, id);
                        id
                    }
                };

                nodes[next].accumulate(table, row, &self.facts);
                current = next;
            }

            nodes[current].source_rows.push(row);
        }

        let leaf_count = nodes
            .iter()
            .filter(|n| n.depth() == self.dimensions.len())
            .count();
        self.stats = ModelStats {
            source_rows: table.row_count(),
            node_count: nodes.len(),
            leaf_count,
        };
        self.nodes = nodes;
        self.path_index = path_index;
        self.level_values = level_values;
        self.computed = true;

        log::debug!(
            "computed aggregation tree: {} rows, {} nodes, {} leaves",
            self.stats.source_rows,
            self.stats.node_count,
            self.stats.leaf_count
        );
        Ok(())
    }

    /// Distinct values of a dimension column, in first-encountered order.
    pub fn values_for_dimension(&self, column: FieldIndex) -> Result<&[DimensionValue]> {
        if !self.computed {
            return Err(RollupError::NotComputed);
        }
        let level = level_of(&self.dimensions, column).ok_or(RollupError::NotADimension(column))?;
        Ok(&self.level_values[level])
    }

    /// Looks up the node for a path.
    pub fn facts(&self, path: &DimensionPath) -> Result<&AggregationNode> {
        if !self.computed {
            return Err(RollupError::NotComputed);
        }
        self.path_index
            .get(path)
            .map(|&id| &self.nodes[id])
            .ok_or_else(|| RollupError::PathNotFound(path.to_string()))
    }

    pub fn node(&self, id: NodeId) -> Option<&AggregationNode> {
        self.nodes.get(id)
    }

    /// All nodes in creation order, the root first.
    pub fn nodes(&self) -> impl Iterator<Item = &AggregationNode> {
        self.nodes.iter()
    }

    /// The node aggregating every source row.
    pub fn grand_total(&self) -> Option<&AggregationNode> {
        self.nodes.get(ROOT_NODE)
    }

    /// Collects the source rows under `path`.
    pub fn drill_down(&self, path: &DimensionPath, max_records: usize) -> Result<DrillDownResult> {
        let start = self
            .path_index
            .get(path)
            .copied()
            .ok_or_else(|| RollupError::PathNotFound(path.to_string()))?;

        let mut rows = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            rows.extend_from_slice(&node.source_rows);
            stack.extend_from_slice(&node.children);
        }
        rows.sort_unstable();

        let total_count = rows.len();
        rows.truncate(max_records);
        Ok(DrillDownResult {
            path: path.clone(),
            source_rows: rows,
            total_count,
            max_records,
            is_truncated: total_count > max_records,
        })
    }
}
