//! Leaf-level change record.

use serde::Serialize;
use shapediff_types::Value;

/// An immutable pair of old and new values at a single key.
///
/// Used for scalar differences and for any replacement the engine does not
/// descend into: category mismatches, collection shape changes, and objects
/// that cannot be compared structurally.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeafChange {
    old: Value,
    new: Value,
}

impl LeafChange {
    /// Record a change from `old` to `new`. Never fails.
    pub fn new(old: impl Into<Value>, new: impl Into<Value>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }

    /// The value before the change.
    pub fn old(&self) -> &Value {
        &self.old
    }

    /// The value after the change.
    pub fn new_value(&self) -> &Value {
        &self.new
    }

    /// Take ownership of `(old, new)`.
    pub fn into_parts(self) -> (Value, Value) {
        (self.old, self.new)
    }

    /// Returns `true` if the old and new values belong to different
    /// categories.
    pub fn is_type_change(&self) -> bool {
        self.old.category() != self.new.category()
    }
}
