//! Recursive changeset between two keyed collections.
//!
//! [`Changeset::new`] walks the new collection's keys in canonical order and
//! classifies each old/new pair once by [`Category`](shapediff_types::Category):
//!
//! | old / new               | result                                         |
//! |-------------------------|------------------------------------------------|
//! | different categories    | leaf change, no descent                        |
//! | object / object         | snapshot diff; nested if non-empty, leaf if incomparable |
//! | collection / collection | leaf if key sequences differ, else nested if non-empty |
//! | anything else           | leaf change unless strictly equal              |
//!
//! # Invariants
//!
//! - Only changed keys are present, in the order they were found.
//! - A nested changeset is never empty.
//! - Nothing changes after construction.

use std::ops::Index;

use indexmap::IndexMap;
use tracing::debug;

use shapediff_types::{Collection, Key, Value};

use crate::error::{DiffError, DiffResult};
use crate::leaf::LeafChange;
use crate::snapshot::diff_objects;

/// A single recorded change: either a leaf or a nested changeset.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    Leaf(LeafChange),
    Nested(Changeset),
}

impl Entry {
    fn leaf(old: &Value, new: &Value) -> Self {
        Self::Leaf(LeafChange::new(old.clone(), new.clone()))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&LeafChange> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Nested(_) => None,
        }
    }

    pub fn as_nested(&self) -> Option<&Changeset> {
        match self {
            Self::Nested(cs) => Some(cs),
            Self::Leaf(_) => None,
        }
    }
}

/// Ordered, immutable map of changed key to [`Entry`].
#[derive(Clone, Debug, Default)]
pub struct Changeset {
    entries: IndexMap<Key, Entry>,
}

impl Changeset {
    /// Compare `old` against `new`.
    ///
    /// Both collections must enumerate exactly the same keys in the same
    /// order; otherwise this fails with [`DiffError::InvalidInput`] and no
    /// changeset is produced.
    pub fn new(old: &Collection, new: &Collection) -> DiffResult<Self> {
        if !old.same_keys(new) {
            return Err(DiffError::InvalidInput {
                old_keys: old.keys().cloned().collect(),
                new_keys: new.keys().cloned().collect(),
            });
        }
        let changeset = Self::compute(old, new);
        debug!(keys = new.len(), changed = changeset.len(), "changeset computed");
        Ok(changeset)
    }

    /// Compute the changeset for two collections already known to share a
    /// key sequence.
    pub(crate) fn compute(old: &Collection, new: &Collection) -> Self {
        debug_assert!(old.same_keys(new));
        let entries = old
            .iter()
            .zip(new.iter())
            .filter_map(|((_, old_val), (key, new_val))| {
                compare(key, old_val, new_val).map(|entry| (key.clone(), entry))
            })
            .collect();
        Self { entries }
    }

    /// Returns `true` if a change was recorded under `key`.
    pub fn has_changed(&self, key: impl Into<Key>) -> bool {
        self.get(key).is_some()
    }

    /// The change recorded under `key`, or `None`.
    pub fn get(&self, key: impl Into<Key>) -> Option<&Entry> {
        self.entries.get(&key.into())
    }

    /// The change recorded under `key`.
    ///
    /// Fails with [`DiffError::NotFound`] when the key is unchanged or was
    /// never part of the inputs; the two cases are not distinguished.
    pub fn get_change(&self, key: impl Into<Key>) -> DiffResult<&Entry> {
        let key = key.into();
        self.entries.get(&key).ok_or(DiffError::NotFound(key))
    }

    /// Always fails with [`DiffError::Immutable`].
    pub fn try_insert(&self, key: impl Into<Key>, _entry: Entry) -> DiffResult<()> {
        Err(DiffError::Immutable(key.into()))
    }

    /// Always fails with [`DiffError::Immutable`].
    pub fn try_remove(&self, key: impl Into<Key>) -> DiffResult<Entry> {
        Err(DiffError::Immutable(key.into()))
    }

    /// Number of changed keys at this level. Zero means fully unchanged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total leaf changes in the whole tree.
    pub fn leaf_count(&self) -> usize {
        self.entries
            .values()
            .map(|entry| match entry {
                Entry::Leaf(_) => 1,
                Entry::Nested(cs) => cs.leaf_count(),
            })
            .sum()
    }

    /// Changed keys in the order they were found.
    pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.entries.keys()
    }

    /// Iterate `(key, entry)` pairs in the order they were found. Each call
    /// starts a fresh pass.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

/// Decide what, if anything, to record for one key.
fn compare(key: &Key, old: &Value, new: &Value) -> Option<Entry> {
    if old.category() != new.category() {
        return Some(Entry::leaf(old, new));
    }

    match (old, new) {
        (Value::Object(a), Value::Object(b)) => match diff_objects(a, b) {
            Ok(nested) if nested.is_empty() => None,
            Ok(nested) => Some(Entry::Nested(nested)),
            // The same instance is never a change, comparable or not.
            Err(_) if a.ptr_eq(b) => None,
            Err(err) => {
                debug!(key = %key, reason = %err.reason, "objects not comparable; recording opaque change");
                Some(Entry::leaf(old, new))
            }
        },
        (Value::Collection(a), Value::Collection(b)) => {
            if !a.same_keys(b) {
                return Some(Entry::leaf(old, new));
            }
            let nested = Changeset::compute(a, b);
            (!nested.is_empty()).then_some(Entry::Nested(nested))
        }
        _ => (!old.strictly_equals(new)).then(|| Entry::leaf(old, new)),
    }
}

/// Entry-wise equality in iteration order.
impl PartialEq for Changeset {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Into<Key>> Index<K> for Changeset {
    type Output = Entry;

    /// Panics if no change was recorded under the key. Use
    /// [`Changeset::get_change`] for a fallible lookup.
    fn index(&self, key: K) -> &Entry {
        match self.get_change(key) {
            Ok(entry) => entry,
            Err(err) => panic!("{err}"),
        }
    }
}

/// Iterator over a changeset's `(key, entry)` pairs.
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    inner: indexmap::map::Iter<'a, Key, Entry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Key, &'a Entry);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Changeset {
    type Item = (&'a Key, &'a Entry);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use shapediff_types::{Collection, Inspect, ObjectRef, Opaque, Record, TypeError};

    fn coll(v: serde_json::Value) -> Collection {
        match Value::from(v) {
            Value::Collection(c) => c,
            other => panic!("expected collection, got {other:?}"),
        }
    }

    fn diff(old: serde_json::Value, new: serde_json::Value) -> Changeset {
        Changeset::new(&coll(old), &coll(new)).unwrap()
    }

    #[derive(Debug)]
    struct Socket(u16);

    impl Inspect for Socket {
        fn type_name(&self) -> &str {
            "Socket"
        }

        fn capture(&self) -> Result<Collection, TypeError> {
            Err(TypeError::Uncapturable {
                type_name: "Socket".into(),
                reason: format!("live connection on port {}", self.0),
            })
        }
    }

    #[test]
    fn differing_key_sets_are_rejected() {
        let err = Changeset::new(&coll(json!({"a": 1})), &coll(json!({"b": 1}))).unwrap_err();
        assert!(matches!(err, DiffError::InvalidInput { .. }));
    }

    #[test]
    fn differing_key_order_is_rejected() {
        let old = Collection::new().with("a", 1).with("b", 2);
        let new = Collection::new().with("b", 2).with("a", 1);
        match Changeset::new(&old, &new).unwrap_err() {
            DiffError::InvalidInput { old_keys, new_keys } => {
                assert_eq!(old_keys, vec![Key::from("a"), Key::from("b")]);
                assert_eq!(new_keys, vec![Key::from("b"), Key::from("a")]);
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn reordered_json_keys_are_rejected() {
        let old: serde_json::Value = serde_json::from_str(r#"{"b": 1, "a": 2}"#).unwrap();
        let new: serde_json::Value = serde_json::from_str(r#"{"a": 2, "b": 1}"#).unwrap();
        let err = Changeset::new(&coll(old), &coll(new)).unwrap_err();
        assert!(matches!(err, DiffError::InvalidInput { .. }));
    }

    #[test]
    fn changes_follow_document_key_order() {
        let old: serde_json::Value = serde_json::from_str(r#"{"z": 1, "a": 1}"#).unwrap();
        let new: serde_json::Value = serde_json::from_str(r#"{"z": 2, "a": 2}"#).unwrap();
        let cs = Changeset::new(&coll(old), &coll(new)).unwrap();
        assert_eq!(cs.keys().collect::<Vec<_>>(), vec![&Key::from("z"), &Key::from("a")]);
    }

    #[test]
    fn neighbouring_large_integers_are_a_change() {
        let cs = diff(json!({"n": u64::MAX}), json!({"n": u64::MAX - 1}));
        assert_eq!(cs["n"], Entry::Leaf(LeafChange::new(u64::MAX, u64::MAX - 1)));
        assert!(diff(json!({"n": u64::MAX}), json!({"n": u64::MAX})).is_empty());
    }

    #[test]
    fn wide_collections_are_diffed() {
        let old: Collection = (0..20_000i64).map(|i| (format!("k{i}"), i)).collect();
        let new: Collection = (0..20_000i64)
            .map(|i| (format!("k{i}"), if i % 1000 == 0 { -i - 1 } else { i }))
            .collect();
        let cs = Changeset::new(&old, &new).unwrap();
        assert_eq!(cs.len(), 20);
        let changed = old.keys().filter(|k| cs.has_changed(*k)).count();
        assert_eq!(changed, 20);
    }

    #[test]
    fn identical_inputs_have_no_changes() {
        let x = json!({"a": 1, "b": [1, 2, {"c": null}], "d": {"e": "f"}, "g": 2.5});
        let cs = diff(x.clone(), x);
        assert_eq!(cs.len(), 0);
        assert!(cs.is_empty());
        for key in ["a", "b", "d", "g"] {
            assert!(!cs.has_changed(key));
        }
    }

    #[test]
    fn type_mismatch_is_atomic() {
        let cs = diff(json!({"a": 1}), json!({"a": "1"}));
        assert_eq!(cs.len(), 1);
        assert_eq!(cs["a"], Entry::Leaf(LeafChange::new(1, "1")));
    }

    #[test]
    fn int_and_float_are_different_categories() {
        let cs = diff(json!({"a": 1}), json!({"a": 1.0}));
        assert_eq!(cs["a"], Entry::Leaf(LeafChange::new(1, 1.0)));
    }

    #[test]
    fn equal_strings_are_unchanged() {
        assert!(diff(json!({"a": "x"}), json!({"a": "x"})).is_empty());
    }

    #[test]
    fn scalar_change_is_leaf() {
        let cs = diff(json!({"a": true, "b": 2}), json!({"a": false, "b": 2}));
        assert_eq!(cs.len(), 1);
        assert_eq!(cs.get_change("a").unwrap(), &Entry::Leaf(LeafChange::new(true, false)));
        assert!(!cs.has_changed("b"));
    }

    #[test]
    fn nested_collection_collapses_to_changed_keys() {
        let cs = diff(json!({"a": {"x": 1, "y": 2}}), json!({"a": {"x": 1, "y": 3}}));
        assert_eq!(cs.len(), 1);
        let nested = cs.get_change("a").unwrap().as_nested().unwrap();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested.get_change("y").unwrap(), &Entry::Leaf(LeafChange::new(2, 3)));
        assert!(!nested.has_changed("x"));
    }

    #[test]
    fn collection_shape_change_is_atomic() {
        let cs = diff(json!({"a": {"x": 1}}), json!({"a": {"x": 1, "y": 2}}));
        let leaf = cs["a"].as_leaf().unwrap();
        assert_eq!(leaf.old(), &Value::from(json!({"x": 1})));
        assert_eq!(leaf.new_value(), &Value::from(json!({"x": 1, "y": 2})));
    }

    #[test]
    fn arrays_compare_by_index_key() {
        let cs = diff(json!({"l": [1, 2, 3]}), json!({"l": [1, 5, 3]}));
        let nested = cs["l"].as_nested().unwrap();
        assert_eq!(nested.keys().collect::<Vec<_>>(), vec![&Key::Int(1)]);
        assert!(cs["l"].as_nested().unwrap()[1usize].is_leaf());
    }

    #[test]
    fn grown_array_is_replaced_whole() {
        let cs = diff(json!({"l": [1]}), json!({"l": [1, 2]}));
        assert!(cs["l"].is_leaf());
    }

    #[test]
    fn unchanged_nested_collection_is_absent() {
        let cs = diff(json!({"a": {"x": [1]}, "b": 1}), json!({"a": {"x": [1]}, "b": 2}));
        assert!(!cs.has_changed("a"));
        assert!(cs.has_changed("b"));
    }

    #[test]
    fn unknown_key_lookup_is_not_found() {
        let cs = diff(json!({"a": 1}), json!({"a": 2}));
        assert_eq!(
            cs.get_change("nonexistent").unwrap_err(),
            DiffError::NotFound(Key::from("nonexistent"))
        );
        assert!(cs.get("nonexistent").is_none());
    }

    #[test]
    fn unchanged_key_lookup_is_not_found() {
        let cs = diff(json!({"a": 1, "b": 1}), json!({"a": 2, "b": 1}));
        assert!(matches!(cs.get_change("b"), Err(DiffError::NotFound(_))));
    }

    #[test]
    #[should_panic(expected = "no change recorded")]
    fn index_on_missing_key_panics() {
        let cs = diff(json!({"a": 1}), json!({"a": 1}));
        let _ = &cs["a"];
    }

    #[test]
    fn mutation_is_rejected() {
        let cs = diff(json!({"a": 1}), json!({"a": 2}));
        let entry = Entry::Leaf(LeafChange::new(0, 1));
        assert_eq!(
            cs.try_insert("a", entry.clone()).unwrap_err(),
            DiffError::Immutable(Key::from("a"))
        );
        assert_eq!(
            cs.try_insert("zzz", entry).unwrap_err(),
            DiffError::Immutable(Key::from("zzz"))
        );
        assert!(matches!(cs.try_remove("a"), Err(DiffError::Immutable(_))));
        assert_eq!(cs.len(), 1);
    }

    #[test]
    fn mutation_is_rejected_through_shared_reference() {
        let cs = diff(json!({"a": 1}), json!({"a": 2}));
        let shared = &cs;
        let again = &cs;
        assert!(matches!(shared.try_remove("a"), Err(DiffError::Immutable(_))));
        assert_eq!(again.len(), 1);
    }

    #[test]
    fn iteration_follows_new_key_order_and_restarts() {
        let old = Collection::new().with("z", 1).with("m", 1).with("a", 1);
        let new = Collection::new().with("z", 2).with("m", 1).with("a", 2);
        let cs = Changeset::new(&old, &new).unwrap();
        let first: Vec<&Key> = cs.iter().map(|(k, _)| k).collect();
        let second: Vec<&Key> = (&cs).into_iter().map(|(k, _)| k).collect();
        assert_eq!(first, vec![&Key::from("z"), &Key::from("a")]);
        assert_eq!(first, second);
        assert_eq!(cs.iter().len(), 2);
    }

    #[test]
    fn comparable_objects_nest() {
        let old = Collection::new().with("u", Record::new("User").with("name", "ada").with("age", 36));
        let new = Collection::new().with("u", Record::new("User").with("name", "ada").with("age", 37));
        let cs = Changeset::new(&old, &new).unwrap();
        let nested = cs["u"].as_nested().unwrap();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested["age"], Entry::Leaf(LeafChange::new(36, 37)));
    }

    #[test]
    fn equal_object_state_is_unchanged() {
        let old = Collection::new().with("u", Record::new("User").with("name", "ada"));
        let new = Collection::new().with("u", Record::new("User").with("name", "ada"));
        assert!(Changeset::new(&old, &new).unwrap().is_empty());
    }

    #[test]
    fn incomparable_objects_fall_back_to_leaf() {
        let a = Value::from(Record::new("User").with("name", "ada"));
        let b = Value::from(Record::new("Robot").with("name", "ada"));
        let old = Collection::new().with("k", a.clone());
        let new = Collection::new().with("k", b.clone());
        let cs = Changeset::new(&old, &new).unwrap();
        assert_eq!(cs["k"], Entry::Leaf(LeafChange::new(a, b)));
    }

    #[test]
    fn uncapturable_objects_fall_back_to_leaf() {
        let old = Collection::new().with("s", ObjectRef::new(Socket(80)));
        let new = Collection::new().with("s", ObjectRef::new(Socket(80)));
        let cs = Changeset::new(&old, &new).unwrap();
        assert!(cs["s"].is_leaf());
    }

    #[test]
    fn same_uncapturable_instance_is_unchanged() {
        let sock = Value::from(ObjectRef::new(Socket(443)));
        let c = Collection::new().with("s", sock);
        assert!(Changeset::new(&c, &c.clone()).unwrap().is_empty());
    }

    #[test]
    fn objects_nested_inside_objects() {
        let inner_old = Record::new("Address").with("city", "Paris");
        let inner_new = Record::new("Address").with("city", "Lyon");
        let old = Collection::new().with("p", Record::new("Person").with("addr", inner_old));
        let new = Collection::new().with("p", Record::new("Person").with("addr", inner_new));
        let cs = Changeset::new(&old, &new).unwrap();
        let addr = cs["p"].as_nested().unwrap()["addr"].as_nested().unwrap();
        assert_eq!(addr["city"], Entry::Leaf(LeafChange::new("Paris", "Lyon")));
        assert_eq!(cs.leaf_count(), 1);
    }

    #[test]
    fn opaque_values_compare_by_handle() {
        let old = Collection::new().with("f", Opaque::new("file", 3)).with("g", Opaque::new("file", 4));
        let new = Collection::new().with("f", Opaque::new("file", 3)).with("g", Opaque::new("file", 5));
        let cs = Changeset::new(&old, &new).unwrap();
        assert!(!cs.has_changed("f"));
        assert!(cs.has_changed("g"));
    }

    #[test]
    fn leaf_count_spans_levels() {
        let cs = diff(
            json!({"a": 1, "b": {"c": 1, "d": {"e": 1, "f": 1}}}),
            json!({"a": 2, "b": {"c": 2, "d": {"e": 2, "f": 2}}}),
        );
        assert_eq!(cs.len(), 2);
        assert_eq!(cs.leaf_count(), 4);
    }

    #[test]
    fn integer_and_string_keys_coexist() {
        let old = Collection::new().with(0i64, "a").with("0", "b");
        let new = Collection::new().with(0i64, "a").with("0", "c");
        let cs = Changeset::new(&old, &new).unwrap();
        assert!(!cs.has_changed(0i64));
        assert!(cs.has_changed("0"));
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            (-1.0e6f64..1.0e6).prop_map(Value::Float),
            "[a-z]{0,6}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop::collection::vec(("[a-c]{1,2}", inner), 0..4)
                .prop_map(|pairs| Value::Collection(pairs.into_iter().collect()))
        })
    }

    fn arb_collection() -> impl Strategy<Value = Collection> {
        prop::collection::vec(("[a-d]{1,2}", arb_value()), 0..5)
            .prop_map(|pairs| pairs.into_iter().collect())
    }

    proptest! {
        #[test]
        fn self_diff_is_empty(x in arb_collection()) {
            let cs = Changeset::new(&x, &x).unwrap();
            prop_assert!(cs.is_empty());
            for key in x.keys() {
                prop_assert!(!cs.has_changed(key));
            }
        }

        #[test]
        fn construction_requires_same_keys(old in arb_collection(), new in arb_collection()) {
            let result = Changeset::new(&old, &new);
            if old.same_keys(&new) {
                prop_assert!(result.is_ok());
            } else {
                let is_invalid_input = matches!(result, Err(DiffError::InvalidInput { .. }));
                prop_assert!(is_invalid_input);
            }
        }

        #[test]
        fn changed_keys_are_an_ordered_subset(old in arb_collection(), values in prop::collection::vec(arb_value(), 5)) {
            let new: Collection = old.keys().cloned().zip(values).collect();
            let cs = Changeset::new(&old, &new).unwrap();
            let mut remaining = new.keys();
            for key in cs.keys() {
                prop_assert!(remaining.any(|k| k == key));
            }
        }
    }
}
