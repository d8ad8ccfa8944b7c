//! Value model for shapediff.
//!
//! This crate provides the data shapes that the diff engine compares. Every
//! other shapediff crate depends on `shapediff-types`.
//!
//! # Key Types
//!
//! - [`Key`] — Collection key, either a string or an integer
//! - [`Value`] — Closed sum of everything a collection can hold
//! - [`Category`] — Coarse kind of a value, used for type-mismatch checks
//! - [`Collection`] — Ordered keyed collection (insertion order is canonical)
//! - [`Inspect`] / [`ObjectRef`] — Object capability whose state can be captured
//! - [`Record`] — Built-in object: a type name plus named properties
//! - [`Opaque`] — Handle-like value compared only by identity

pub mod collection;
pub mod error;
pub mod json;
pub mod key;
pub mod object;
pub mod value;

pub use collection::Collection;
pub use error::TypeError;
pub use key::Key;
pub use object::{Inspect, ObjectRef, Record};
pub use value::{Category, Opaque, Value};
