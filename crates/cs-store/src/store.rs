//! The `StateStore` tree.

use std::collections::BTreeMap;

use cs_core::{Value, ValueMap};
use tracing::debug;

use crate::namespace::{make_namespace, qualify, split_key};
use crate::{StoreError, StoreResult};

/// Children of a branch, ordered by segment so reads are reproducible.
pub type Tree = BTreeMap<String, Node>;

/// One node of the namespace tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(untagged))]
pub enum Node {
    Leaf(Value),
    Branch(Tree),
}

impl Node {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Node::Leaf(v) => Some(v),
            Node::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&Tree> {
        match self {
            Node::Branch(t) => Some(t),
            Node::Leaf(_) => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Node::Leaf(_) => "leaf",
            Node::Branch(_) => "namespace",
        }
    }
}

/// What to do when a write needs a leaf where a namespace is (or vice versa).
///
/// Example: `"A:x" = 1` is stored, then `"A:x:y" = 2` is written.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Replace the conflicting node: a leaf on the path becomes a namespace,
    /// a namespace at the key becomes a leaf.
    #[default]
    Overwrite,
    /// Fail with [`StoreError::PathConflict`] and leave the store unchanged
    /// for that key.
    Reject,
}

/// In-memory namespaced key/value store.
///
/// Holds only the latest value per key: no versioning, no history.  Reads of
/// keys or namespaces that were never written return `None` or an empty map
/// rather than an error.
#[derive(Clone, Debug, Default)]
pub struct StateStore {
    root:   Tree,
    policy: CollisionPolicy,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: CollisionPolicy) -> Self {
        Self { root: Tree::new(), policy }
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Associated form of [`make_namespace`].
    pub fn make_namespace<I, S>(segments: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        make_namespace(segments)
    }

    // ── Writes ────────────────────────────────────────────────────────────

    /// Write one fully-qualified key.  Overwrites unconditionally; sibling
    /// keys are never touched.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> StoreResult<()> {
        let segments = split_key(key)?;
        let Some((last, parents)) = segments.split_last() else {
            return Err(StoreError::InvalidKey(key.to_owned()));
        };
        let policy = self.policy;

        let mut tree = &mut self.root;
        for (depth, seg) in parents.iter().enumerate() {
            let node = tree
                .entry((*seg).to_owned())
                .or_insert_with(|| Node::Branch(Tree::new()));
            if let Node::Leaf(old) = node {
                let at = make_namespace(&segments[..=depth]);
                match policy {
                    CollisionPolicy::Reject => {
                        return Err(StoreError::PathConflict { key: key.to_owned(), at, existing: "leaf" });
                    }
                    CollisionPolicy::Overwrite => {
                        debug!(key, at = %at, old = %old, "leaf replaced by namespace");
                        *node = Node::Branch(Tree::new());
                    }
                }
            }
            let Node::Branch(next) = node else {
                return Err(StoreError::PathConflict {
                    key:      key.to_owned(),
                    at:       make_namespace(&segments[..=depth]),
                    existing: "leaf",
                });
            };
            tree = next;
        }

        if let Some(existing @ Node::Branch(_)) = tree.get(*last) {
            match policy {
                CollisionPolicy::Reject => {
                    return Err(StoreError::PathConflict {
                        key:      key.to_owned(),
                        at:       key.to_owned(),
                        existing: existing.kind(),
                    });
                }
                CollisionPolicy::Overwrite => {
                    debug!(key, "namespace replaced by leaf");
                }
            }
        }
        tree.insert((*last).to_owned(), Node::Leaf(value.into()));
        Ok(())
    }

    /// Write several key/value pairs, each optionally prefixed by `namespace`.
    ///
    /// Pairs are applied in iteration order.  If one fails (invalid key, or a
    /// collision under [`CollisionPolicy::Reject`]) the pairs before it stay
    /// written.
    pub fn set<I, K, V>(&mut self, namespace: Option<&str>, values: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (key, value) in values {
            self.insert(&qualify(namespace, key.as_ref()), value)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.root.clear();
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// The node at a fully-qualified key, leaf or namespace.
    pub fn node(&self, key: &str) -> Option<&Node> {
        let segments = split_key(key).ok()?;
        let (first, rest) = segments.split_first()?;
        let mut node = self.root.get(*first)?;
        for seg in rest {
            node = node.as_branch()?.get(*seg)?;
        }
        Some(node)
    }

    /// The raw value of a key, or `None` if it was never written (or names a
    /// namespace rather than a value).
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.node(key).and_then(Node::as_value)
    }

    /// [`get`][Self::get] with the key prefixed by `namespace`.
    pub fn get_in(&self, namespace: Option<&str>, key: &str) -> Option<&Value> {
        self.get(&qualify(namespace, key))
    }

    /// Read several keys at once, each independently absent-safe.
    ///
    /// The result is keyed by the keys as given (without the namespace).
    pub fn get_many<I, S>(&self, keys: I, namespace: Option<&str>) -> BTreeMap<String, Option<Value>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter()
            .map(|k| {
                let k = k.as_ref();
                (k.to_owned(), self.get_in(namespace, k).cloned())
            })
            .collect()
    }

    /// Borrow the sub-tree rooted at `namespace` (the whole store for `None`).
    ///
    /// `None` if the namespace was never written or names a leaf.
    pub fn subtree(&self, namespace: Option<&str>) -> Option<&Tree> {
        match namespace {
            None => Some(&self.root),
            Some(ns) => self.node(ns)?.as_branch(),
        }
    }

    /// Snapshot of the sub-tree rooted at `namespace`, recursively.
    ///
    /// Empty when the namespace does not exist, so readers never need to
    /// check before an entity's first write.
    pub fn get_all(&self, namespace: Option<&str>) -> Tree {
        self.subtree(namespace).cloned().unwrap_or_default()
    }

    /// Leaf values under `namespace`, keyed by their path relative to it.
    ///
    /// `{"a": 1, "b": {"c": 2}}` flattens to `{"a": 1, "b:c": 2}`.
    pub fn flatten(&self, namespace: Option<&str>) -> ValueMap {
        let mut out = ValueMap::new();
        if let Some(tree) = self.subtree(namespace) {
            flatten_into(tree, "", &mut out);
        }
        out
    }

    /// Number of leaf values in the store.
    pub fn len(&self) -> usize {
        count_leaves(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

fn flatten_into(tree: &Tree, prefix: &str, out: &mut ValueMap) {
    for (seg, node) in tree {
        let path = if prefix.is_empty() { seg.clone() } else { make_namespace([prefix, seg]) };
        match node {
            Node::Leaf(v) => {
                out.insert(path, v.clone());
            }
            Node::Branch(sub) => flatten_into(sub, &path, out),
        }
    }
}

fn count_leaves(tree: &Tree) -> usize {
    tree.values()
        .map(|node| match node {
            Node::Leaf(_) => 1,
            Node::Branch(sub) => count_leaves(sub),
        })
        .sum()
}
