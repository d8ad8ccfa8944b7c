//! Error types for the diff crate.

use shapediff_types::Key;

/// Errors that can occur when building or querying a changeset.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiffError {
    /// The two input collections do not enumerate the same keys in the same
    /// order.
    #[error("key sets differ: old {old_keys:?}, new {new_keys:?}")]
    InvalidInput {
        old_keys: Vec<Key>,
        new_keys: Vec<Key>,
    },

    /// No change was recorded under the key (unchanged or unknown).
    #[error("no change recorded for key {0:?}")]
    NotFound(Key),

    /// A changeset was asked to change after construction.
    #[error("changeset is immutable: cannot modify key {0:?}")]
    Immutable(Key),

    /// Two objects could not be compared structurally.
    #[error(transparent)]
    Incomparable(#[from] Incomparable),
}

/// Failure of the snapshot collaborator: the two objects cannot be
/// meaningfully compared.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("objects are not comparable: {reason}")]
pub struct Incomparable {
    pub reason: String,
}

impl Incomparable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
