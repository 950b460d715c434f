//! An insertion-ordered configuration tree.
//!
//! Keys are strings, values are [`Value`]s, and a value may itself be a
//! nested `Tree`. Single-level operations take a key; the `*_path` variants
//! walk nested trees by [`IntoPath`].

use std::fmt;

use crate::error::SpecError;
use crate::path::{IntoPath, Path};
use crate::value::Value;

/// Ordered mapping from key to [`Value`].
///
/// Iteration follows insertion order. Overwriting an existing key keeps its
/// position. Equality ignores order.
#[derive(Clone, Default)]
pub struct Tree {
    entries: Vec<(String, Value)>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Set `key` to `value`, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let i = self.position(key)?;
        Some(self.entries.remove(i).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Look up a nested value. Returns `None` if the path is invalid, missing,
    /// or crosses a non-tree value.
    pub fn get_path(&self, path: impl IntoPath) -> Option<&Value> {
        let path = path.into_path().ok()?;
        self.lookup(&path)
    }

    pub fn contains_path(&self, path: impl IntoPath) -> bool {
        self.get_path(path).is_some()
    }

    /// Set a nested value, creating intermediate trees as needed.
    ///
    /// Fails with [`SpecError::PathConflict`] if an intermediate segment holds
    /// something other than a tree; the tree is left unchanged in that case.
    pub fn set_path(
        &mut self,
        path: impl IntoPath,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, SpecError> {
        let path = path.into_path()?;

        let mut current = &*self;
        for (depth, segment) in path.parents().iter().enumerate() {
            match current.get(segment) {
                Some(Value::Tree(sub)) => current = sub,
                Some(other) => {
                    return Err(SpecError::PathConflict {
                        key: path.segments()[..=depth].join("."),
                        reason: format!("holds a {}, not a tree", other.kind()),
                    });
                }
                None => break,
            }
        }

        let mut current = self;
        for segment in path.parents() {
            let slot = match current.position(segment) {
                Some(i) => i,
                None => {
                    current.entries.push((segment.clone(), Value::Tree(Tree::new())));
                    current.entries.len() - 1
                }
            };
            current = match &mut current.entries[slot].1 {
                Value::Tree(sub) => sub,
                _ => unreachable!("intermediate segments were checked above"),
            };
        }
        Ok(current.insert(path.leaf(), value))
    }

    /// Remove a nested value. Intermediate trees are left in place, even if
    /// they become empty.
    pub fn remove_path(&mut self, path: impl IntoPath) -> Option<Value> {
        let path = path.into_path().ok()?;
        let mut current = self;
        for segment in path.parents() {
            current = current.get_mut(segment)?.as_tree_mut()?;
        }
        current.remove(path.leaf())
    }

    pub(crate) fn lookup(&self, path: &Path) -> Option<&Value> {
        let mut current = self;
        for segment in path.parents() {
            current = current.get(segment)?.as_tree()?;
        }
        current.get(path.leaf())
    }

    /// Flatten into dotted key/value pairs, depth-first in insertion order.
    ///
    /// Nested trees are expanded; an empty nested tree is listed as itself so
    /// that it stays visible.
    pub fn flatten(&self) -> Vec<(String, &Value)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Value)>) {
        for (key, value) in self.iter() {
            let dotted = if prefix.is_empty() {
                key.to_string()
            } else {
                format!("{prefix}.{key}")
            };
            match value {
                Value::Tree(sub) if !sub.is_empty() => sub.flatten_into(&dotted, out),
                _ => out.push((dotted, value)),
            }
        }
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Tree {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Tree::new();
        for (key, value) in iter {
            tree.insert(key, value);
        }
        tree
    }
}

impl IntoIterator for Tree {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tree {
        let mut tree = Tree::new();
        tree.insert("host", "localhost");
        tree.insert("port", 8080);
        tree.set_path("database.pool_size", 5).unwrap();
        tree
    }

    #[test]
    fn insert_keeps_order_and_position() {
        let mut tree = sample();
        let old = tree.insert("host", "0.0.0.0");
        assert_eq!(old, Some(Value::from("localhost")));
        let keys: Vec<&str> = tree.keys().collect();
        assert_eq!(keys, ["host", "port", "database"]);
    }

    #[test]
    fn get_path_nested() {
        let tree = sample();
        assert_eq!(tree.get_path("database.pool_size"), Some(&Value::Integer(5)));
        assert_eq!(tree.get_path(["database", "pool_size"]), Some(&Value::Integer(5)));
        assert_eq!(tree.get_path("database.url"), None);
        assert_eq!(tree.get_path("port.inner"), None);
        assert_eq!(tree.get_path(""), None);
    }

    #[test]
    fn null_is_present() {
        let mut tree = Tree::new();
        tree.insert("maybe", Value::Null);
        assert!(tree.contains_path("maybe"));
        assert_eq!(tree.get("maybe"), Some(&Value::Null));
        assert!(!tree.contains_key("other"));
    }

    #[test]
    fn set_path_creates_intermediate_trees() {
        let mut tree = Tree::new();
        assert_eq!(tree.set_path("a.b.c", 1).unwrap(), None);
        assert!(tree.get_path("a.b").unwrap().as_tree().is_some());
        assert_eq!(tree.set_path("a.b.c", 2).unwrap(), Some(Value::Integer(1)));
    }

    #[test]
    fn set_path_through_scalar_conflicts() {
        let mut tree = sample();
        let err = tree.set_path("port.number", 1).unwrap_err();
        assert!(matches!(err, SpecError::PathConflict { ref key, .. } if key == "port"));
        assert_eq!(tree, sample());
    }

    #[test]
    fn remove_path_leaves_parent() {
        let mut tree = sample();
        assert_eq!(tree.remove_path("database.pool_size"), Some(Value::Integer(5)));
        assert!(tree.get("database").unwrap().as_tree().unwrap().is_empty());
        assert_eq!(tree.remove_path("database.pool_size"), None);
        assert_eq!(tree.remove_path("nope.nothing"), None);
    }

    #[test]
    fn equality_ignores_order() {
        let a: Tree = [("x", 1), ("y", 2)].into_iter().collect();
        let b: Tree = [("y", 2), ("x", 1)].into_iter().collect();
        assert_eq!(a, b);
        let c: Tree = [("x", 1)].into_iter().collect();
        assert_ne!(a, c);
    }

    #[test]
    fn flatten_lists_leaves() {
        let mut tree = sample();
        tree.insert("empty", Tree::new());
        let flat: Vec<String> = tree
            .flatten()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        assert_eq!(
            flat,
            [
                "host=\"localhost\"",
                "port=8080",
                "database.pool_size=5",
                "empty={}"
            ]
        );
    }

    #[test]
    fn into_iter_yields_owned_entries() {
        let entries: Vec<(String, Value)> = sample().into_iter().collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].0, "host");
    }
}
