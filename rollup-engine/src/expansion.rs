//! FILENAME: rollup-engine/src/expansion.rs
//! Expansion State - which tree nodes are open for drill-down.
//!
//! Membership is keyed on the dimension path itself, so it survives a
//! recompute: a path expanded before new source data arrives is still
//! expanded afterwards if the new tree contains it. Paths that no longer
//! exist simply stay in the set without effect.

use rustc_hash::FxHashSet;
use crate::error::{Result, RollupError};
use crate::key::DimensionPath;
use crate::model::{AggregationModel, ROOT_NODE};

#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    expanded: FxHashSet<DimensionPath>,

    /// Longest storable path (the dimension count).
    max_depth: usize,

    /// Set by `expand_all` before the model has been computed.
    expand_all_pending: bool,
}

impl ExpansionState {
    pub fn new(max_depth: usize) -> Self {
        ExpansionState {
            expanded: FxHashSet::default(),
            max_depth,
            expand_all_pending: false,
        }
    }

    fn check_path(&self, path: &DimensionPath) -> Result<()> {
        if path.is_empty() || path.len() > self.max_depth {
            return Err(RollupError::InvalidPath {
                length: path.len(),
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }

    /// Marks `path` expanded. With `expand_ancestors`, every strict prefix
    /// is expanded too. A present ancestor does not end the walk: after a
    /// collapse that kept descendants, the chain above it may have gaps.
    pub fn expand(&mut self, path: &DimensionPath, expand_ancestors: bool) -> Result<()> {
        self.check_path(path)?;
        self.expand_all_pending = false;
        self.expanded.insert(path.clone());
        log::trace!("expand {}", path);

        if expand_ancestors {
            let mut ancestor = path.clone();
            ancestor.pop();
            while !ancestor.is_empty() {
                self.expanded.insert(ancestor.clone());
                ancestor.pop();
            }
        }
        Ok(())
    }

    /// Removes `path`. With `collapse_descendants`, every path that starts
    /// with `path` is removed as well.
    pub fn collapse(&mut self, path: &DimensionPath, collapse_descendants: bool) -> Result<()> {
        self.check_path(path)?;
        self.expand_all_pending = false;
        if collapse_descendants {
            self.expanded.retain(|p| !p.starts_with(path));
        } else {
            self.expanded.remove(path);
        }
        log::trace!("collapse {} (descendants: {})", path, collapse_descendants);
        Ok(())
    }

    /// Expands `path` with its ancestors if it is collapsed, otherwise
    /// collapses it with its descendants. Returns the new state.
    pub fn toggle(&mut self, path: &DimensionPath) -> Result<bool> {
        if self.is_expanded(path) {
            self.collapse(path, true)?;
            Ok(false)
        } else {
            self.expand(path, true)?;
            Ok(true)
        }
    }

    /// Expands every node of `model`, or defers until the next compute
    /// if the model has not been computed yet.
    pub fn expand_all(&mut self, model: &AggregationModel) {
        if model.is_computed() {
            self.expand_tree(model);
        } else {
            log::debug!("expand all deferred until the next compute");
            self.expand_all_pending = true;
        }
    }

    /// Applies a deferred `expand_all` against a freshly computed model.
    /// Returns true if there was one.
    pub fn apply_pending(&mut self, model: &AggregationModel) -> bool {
        if !self.expand_all_pending || !model.is_computed() {
            return false;
        }
        self.expand_tree(model);
        true
    }

    /// Depth-first walk adding every node path below the root.
    fn expand_tree(&mut self, model: &AggregationModel) {
        self.expand_all_pending = false;
        let mut stack = vec![ROOT_NODE];
        while let Some(id) = stack.pop() {
            let Some(node) = model.node(id) else {
                continue;
            };
            if id != ROOT_NODE {
                self.expanded.insert(node.path().clone());
            }
            stack.extend(node.children().iter().rev());
        }
        log::debug!("expanded all: {} paths", self.expanded.len());
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.expand_all_pending = false;
    }

    pub fn is_expanded(&self, path: &DimensionPath) -> bool {
        self.expanded.contains(path)
    }

    pub fn is_expand_all_pending(&self) -> bool {
        self.expand_all_pending
    }

    pub fn expanded_paths(&self) -> impl Iterator<Item = &DimensionPath> {
        self.expanded.iter()
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}
