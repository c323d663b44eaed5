//! FILENAME: rollup-engine/src/key.rs
//! Dimension keys - hashable values and paths.
//!
//! Grouping compares raw extracted values, never type-coerced ones:
//! `Number(1)` and `Text("1")` land in different groups. Floats are wrapped
//! so they can be hashed; all NaNs compare equal to each other.

use std::fmt;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use table::CellValue;

/// Wrapper around f64 that implements Eq and Hash for use as HashMap keys.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            // All NaN values hash to the same thing
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            // 0.0 and -0.0 are equal, so they must hash alike
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

/// A normalized, hashable representation of a dimension cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionValue {
    Empty,
    Number(OrderedFloat),
    Text(String),
    Boolean(bool),
    Error(table::CellError),
}

impl From<&CellValue> for DimensionValue {
    fn from(value: &CellValue) -> Self {
        match value {
            CellValue::Empty => DimensionValue::Empty,
            CellValue::Number(n) => DimensionValue::Number(OrderedFloat(*n)),
            CellValue::Text(s) => DimensionValue::Text(s.clone()),
            CellValue::Boolean(b) => DimensionValue::Boolean(*b),
            CellValue::Error(e) => DimensionValue::Error(e.clone()),
        }
    }
}

impl From<&DimensionValue> for CellValue {
    fn from(value: &DimensionValue) -> Self {
        match value {
            DimensionValue::Empty => CellValue::Empty,
            DimensionValue::Number(n) => CellValue::Number(n.0),
            DimensionValue::Text(s) => CellValue::Text(s.clone()),
            DimensionValue::Boolean(b) => CellValue::Boolean(*b),
            DimensionValue::Error(e) => CellValue::Error(e.clone()),
        }
    }
}

impl From<&str> for DimensionValue {
    fn from(value: &str) -> Self {
        DimensionValue::Text(value.to_string())
    }
}

impl From<f64> for DimensionValue {
    fn from(value: f64) -> Self {
        DimensionValue::Number(OrderedFloat(value))
    }
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&CellValue::from(self).display_value())
    }
}

// ============================================================================
// DIMENSION PATH
// ============================================================================

/// The chain of group-by values from the root down to a node.
/// Equality and hashing are element-wise, which makes the path itself the
/// canonical key for node lookup and expansion membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimensionPath(SmallVec<[DimensionValue; 4]>);

impl DimensionPath {
    /// The empty path, which identifies the grand-total root.
    pub fn root() -> Self {
        DimensionPath(SmallVec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[DimensionValue] {
        &self.0
    }

    pub fn first(&self) -> Option<&DimensionValue> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&DimensionValue> {
        self.0.last()
    }

    /// Returns a new path with `value` appended.
    pub fn child(&self, value: DimensionValue) -> Self {
        let mut values = self.0.clone();
        values.push(value);
        DimensionPath(values)
    }

    /// Returns the path with its last element removed, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(DimensionPath(self.0[..self.0.len() - 1].iter().cloned().collect()))
    }

    /// True when `prefix` equals this path truncated to `prefix.len()`.
    /// A path starts with itself.
    pub fn starts_with(&self, prefix: &DimensionPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn pop(&mut self) -> Option<DimensionValue> {
        self.0.pop()
    }
}

impl<V: Into<DimensionValue>> FromIterator<V> for DimensionPath {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        DimensionPath(iter.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<DimensionValue>, const N: usize> From<[V; N]> for DimensionPath {
    fn from(values: [V; N]) -> Self {
        values.into_iter().collect()
    }
}

impl fmt::Display for DimensionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" / ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_raw_equality_without_coercion() {
        let number = DimensionValue::from(&CellValue::Number(1.0));
        let text = DimensionValue::from(&CellValue::text("1"));
        assert_ne!(number, text);
    }

    #[test]
    fn test_nan_groups_together() {
        let a = DimensionValue::from(f64::NAN);
        let b = DimensionValue::from(f64::NAN);
        let mut set = FxHashSet::default();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_signed_zero_hashes_alike() {
        let mut set = FxHashSet::default();
        set.insert(DimensionValue::from(0.0));
        assert!(set.contains(&DimensionValue::from(-0.0)));
    }

    #[test]
    fn test_path_value_equality() {
        let a = DimensionPath::from(["US", "A"]);
        let b = DimensionPath::root()
            .child("US".into())
            .child("A".into());
        assert_eq!(a, b);

        let mut set = FxHashSet::default();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_prefix_and_parent() {
        let path = DimensionPath::from(["US", "A", "x"]);
        assert!(path.starts_with(&DimensionPath::from(["US"])));
        assert!(path.starts_with(&path));
        assert!(!path.starts_with(&DimensionPath::from(["EU"])));
        assert!(!DimensionPath::from(["US"]).starts_with(&path));

        assert_eq!(path.parent(), Some(DimensionPath::from(["US", "A"])));
        assert_eq!(DimensionPath::root().parent(), None);
    }

    #[test]
    fn test_display() {
        let path: DimensionPath = vec![DimensionValue::from("US"), DimensionValue::from(2.0)]
            .into_iter()
            .collect();
        assert_eq!(path.to_string(), "[US / 2]");
    }
}
