//! Categorised values.
//!
//! [`Value`] is deliberately closed: the diff engine classifies each value
//! exactly once via [`Value::category`] and branches on the pair of tags.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::object::{Inspect, ObjectRef, Record};

/// Coarse runtime kind of a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Null,
    Bool,
    Int,
    Float,
    String,
    Collection,
    Object,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Collection => write!(f, "collection"),
            Self::Object => write!(f, "object"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A handle-like value with no inspectable structure (file handles,
/// connections, foreign pointers). Two opaque values are equal only when
/// both their kind and handle match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Opaque {
    pub kind: String,
    pub handle: u64,
}

impl Opaque {
    pub fn new(kind: impl Into<String>, handle: u64) -> Self {
        Self {
            kind: kind.into(),
            handle,
        }
    }
}

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}#{}>", self.kind, self.handle)
    }
}

/// Anything a [`Collection`] can hold.
///
/// Equality is strict: values of different categories are never equal
/// (`Int(1) != Float(1.0)`), floats use IEEE comparison, and objects compare
/// by identity of the shared instance. `Int` and `UInt` are one category and
/// compare by numeric value.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`.
    UInt(u64),
    Float(f64),
    String(String),
    Collection(Collection),
    Object(ObjectRef),
    Other(Opaque),
}

impl Value {
    /// Wrap any inspectable object.
    pub fn object<T: Inspect + 'static>(obj: T) -> Self {
        Self::Object(ObjectRef::new(obj))
    }

    /// The coarse kind of this value.
    pub fn category(&self) -> Category {
        match self {
            Self::Null => Category::Null,
            Self::Bool(_) => Category::Bool,
            Self::Int(_) | Self::UInt(_) => Category::Int,
            Self::Float(_) => Category::Float,
            Self::String(_) => Category::String,
            Self::Collection(_) => Category::Collection,
            Self::Object(_) => Category::Object,
            Self::Other(_) => Category::Other,
        }
    }

    /// Exact value-and-type equality with no coercion.
    pub fn strictly_equals(&self, other: &Value) -> bool {
        self == other
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Collection(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Collection(_) | Self::Object(_) => write!(f, "{}", self.to_json()),
            Self::Other(o) => write!(f, "{o}"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::UInt(a), Self::UInt(b)) => a == b,
            (Self::Int(i), Self::UInt(u)) | (Self::UInt(u), Self::Int(i)) => {
                u64::try_from(*i).is_ok_and(|i| i == *u)
            }
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Collection(a), Self::Collection(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Other(a), Self::Other(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        i64::try_from(u).map_or(Self::UInt(u), Self::Int)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Collection> for Value {
    fn from(c: Collection) -> Self {
        Self::Collection(c)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Self::object(r)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Self::Object(o)
    }
}

impl From<Opaque> for Value {
    fn from(o: Opaque) -> Self {
        Self::Other(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
