//! Object snapshots.
//!
//! A [`Snapshot`] freezes the comparable state of one object. Two snapshots
//! can be diffed only when they come from the same concrete type and their
//! captured states enumerate the same keys; otherwise the diff reports
//! [`Incomparable`].

use shapediff_types::{Collection, ObjectRef};

use crate::changeset::Changeset;
use crate::error::Incomparable;

/// Captured comparable state of a single object.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    type_name: String,
    state: Collection,
}

impl Snapshot {
    /// Capture the state of `obj`. Objects that refuse capture are
    /// incomparable.
    pub fn capture(obj: &ObjectRef) -> Result<Self, Incomparable> {
        let state = obj
            .capture()
            .map_err(|e| Incomparable::new(e.to_string()))?;
        Ok(Self {
            type_name: obj.type_name().to_owned(),
            state,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn state(&self) -> &Collection {
        &self.state
    }

    /// Diff this snapshot (old) against `other` (new).
    pub fn diff(&self, other: &Snapshot) -> Result<Changeset, Incomparable> {
        if self.type_name != other.type_name {
            return Err(Incomparable::new(format!(
                "type {} cannot be compared with {}",
                self.type_name, other.type_name
            )));
        }
        if !self.state.same_keys(&other.state) {
            return Err(Incomparable::new(format!(
                "{} instances expose different properties",
                self.type_name
            )));
        }
        Ok(Changeset::compute(&self.state, &other.state))
    }
}

/// Snapshot both objects and diff them.
pub fn diff_objects(old: &ObjectRef, new: &ObjectRef) -> Result<Changeset, Incomparable> {
    let old = Snapshot::capture(old)?;
    let new = Snapshot::capture(new)?;
    old.diff(&new)
}
