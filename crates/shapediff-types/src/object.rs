//! Objects whose state can be captured for comparison.

use std::fmt;
use std::sync::Arc;

use crate::collection::Collection;
use crate::error::TypeError;
use crate::key::Key;
use crate::value::Value;

/// Capability of an object to expose its comparable state.
///
/// `capture` returns the object's state as a keyed collection. Objects that
/// hold state which cannot be meaningfully compared should return
/// [`TypeError::Uncapturable`]; the diff engine then treats the object as an
/// opaque value.
pub trait Inspect: fmt::Debug + Send + Sync {
    /// Name of the concrete type. Objects with different names are never
    /// compared structurally.
    fn type_name(&self) -> &str;

    /// Capture the current comparable state.
    fn capture(&self) -> Result<Collection, TypeError>;
}

/// Shared handle to an inspectable object. Equality is identity.
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn Inspect>);

impl ObjectRef {
    pub fn new<T: Inspect + 'static>(obj: T) -> Self {
        Self(Arc::new(obj))
    }

    pub fn from_arc(obj: Arc<dyn Inspect>) -> Self {
        Self(obj)
    }

    pub fn type_name(&self) -> &str {
        self.0.type_name()
    }

    pub fn capture(&self) -> Result<Collection, TypeError> {
        self.0.capture()
    }

    /// Returns `true` if both handles point at the same instance.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// A plain object: a type name and its named properties.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    type_name: String,
    properties: Collection,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Collection::new(),
        }
    }

    /// Builder-style property assignment.
    pub fn with(mut self, name: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.properties.insert(name, value);
        self
    }

    pub fn properties(&self) -> &Collection {
        &self.properties
    }
}

impl Inspect for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn capture(&self) -> Result<Collection, TypeError> {
        Ok(self.properties.clone())
    }
}
