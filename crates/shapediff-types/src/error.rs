use thiserror::Error;

/// Errors produced by value model operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// An object refused to expose its state for comparison.
    #[error("cannot capture state of {type_name}: {reason}")]
    Uncapturable { type_name: String, reason: String },
}
