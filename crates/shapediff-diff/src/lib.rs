//! Structural diff engine for shapediff.
//!
//! Compares an old and a new keyed collection of identical shape and builds
//! an immutable tree of what changed. Scalars that differ become
//! [`LeafChange`] entries; same-shaped nested collections and comparable
//! objects become nested [`Changeset`]s.
//!
//! # Key Types
//!
//! - [`Changeset`] / [`Entry`] -- Ordered map of changed key to leaf or nested changeset
//! - [`LeafChange`] -- Immutable old/new value pair
//! - [`Snapshot`] -- Captured object state, diffable against another snapshot
//! - [`ChangePath`] -- Key path to a leaf, used by flattened views

pub mod changeset;
pub mod error;
pub mod leaf;
pub mod render;
pub mod snapshot;

pub use changeset::{Changeset, Entry, Iter};
pub use error::{DiffError, DiffResult, Incomparable};
pub use leaf::LeafChange;
pub use render::ChangePath;
pub use snapshot::Snapshot;
