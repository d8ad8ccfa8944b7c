//! Flattened and JSON views of a changeset.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{json, Map};

use shapediff_types::Key;

use crate::changeset::{Changeset, Entry};
use crate::leaf::LeafChange;

/// Key path from the root changeset down to a leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChangePath(Vec<Key>);

impl ChangePath {
    pub fn segments(&self) -> &[Key] {
        &self.0
    }

    /// Join the segments with `separator`.
    pub fn join(&self, separator: &str) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn child(&self, key: &Key) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.clone());
        Self(segments)
    }
}

impl fmt::Display for ChangePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join("."))
    }
}

impl From<Vec<Key>> for ChangePath {
    fn from(segments: Vec<Key>) -> Self {
        Self(segments)
    }
}

impl Changeset {
    /// Every leaf change with its full key path, depth-first in iteration
    /// order.
    pub fn paths(&self) -> Vec<(ChangePath, &LeafChange)> {
        let mut out = Vec::with_capacity(self.len());
        collect_paths(self, &ChangePath::default(), &mut out);
        out
    }

    /// Render as nested JSON. Leaves become `{"old": .., "new": ..}`.
    pub fn to_json(&self) -> serde_json::Value {
        let map: Map<String, serde_json::Value> = self
            .iter()
            .map(|(key, entry)| {
                let rendered = match entry {
                    Entry::Leaf(leaf) => json!({
                        "old": leaf.old().to_json(),
                        "new": leaf.new_value().to_json(),
                    }),
                    Entry::Nested(nested) => nested.to_json(),
                };
                (key.to_string(), rendered)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

fn collect_paths<'a>(
    changeset: &'a Changeset,
    prefix: &ChangePath,
    out: &mut Vec<(ChangePath, &'a LeafChange)>,
) {
    for (key, entry) in changeset {
        let path = prefix.child(key);
        match entry {
            Entry::Leaf(leaf) => out.push((path, leaf)),
            Entry::Nested(nested) => collect_paths(nested, &path, out),
        }
    }
}

impl Serialize for Changeset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
