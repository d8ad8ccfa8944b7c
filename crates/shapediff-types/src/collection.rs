//! Ordered keyed collection.
//!
//! A [`Collection`] keeps its entries in insertion order. That order is the
//! collection's canonical key order: it is what [`Collection::same_keys`]
//! compares and what the diff engine walks.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::key::Key;
use crate::value::Value;

#[derive(Clone, Debug, Default)]
pub struct Collection {
    entries: IndexMap<Key, Value>,
}

impl Collection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Build a list-shaped collection keyed `0..n`.
    pub fn from_list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (Key::from(i), v.into()))
            .collect()
    }

    /// Insert a value. Replacing an existing key keeps its position and
    /// returns the previous value.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        self.entries.get(&key.into())
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.entries.keys()
    }

    /// Values in canonical order.
    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entries.values()
    }

    /// Entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> + '_ {
        self.entries.iter()
    }

    /// Returns `true` if both collections enumerate exactly the same keys in
    /// the same order. Same cardinality or same key set alone is not enough.
    pub fn same_keys(&self, other: &Collection) -> bool {
        self.len() == other.len() && self.keys().eq(other.keys())
    }

    /// Returns `true` if the keys are exactly `0..n` in order.
    pub fn is_list(&self) -> bool {
        self.entries
            .keys()
            .enumerate()
            .all(|(i, k)| k.as_int() == Some(i as i64))
    }
}

/// Entry-wise equality in canonical order.
impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Collection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut collection = Collection::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            collection.insert(k, v);
        }
        collection
    }
}

impl IntoIterator for Collection {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
