//! Schema declaration: [`ConfigSpec`] and the tree of rules it stores.
//!
//! A spec is a tree whose leaves are [`EntrySpec`]s and whose inner nodes are
//! sub-schemas, created on demand by the `define*` methods. Checking and
//! correcting live in the `validate` and `correct` modules.

use std::fmt;

use crate::builder::SpecBuilder;
use crate::entry::{DefaultValue, EntrySpec, Validator};
use crate::error::SpecError;
use crate::path::{IntoPath, Path};
use crate::tree::Tree;
use crate::value::{Value, ValueKind};

#[derive(Debug, Clone)]
pub(crate) enum SpecNode {
    Entry(EntrySpec),
    Section(SpecTree),
}

/// One level of the schema, in declaration order.
#[derive(Debug, Clone, Default)]
pub(crate) struct SpecTree {
    nodes: Vec<(String, SpecNode)>,
}

impl SpecTree {
    pub(crate) fn get(&self, key: &str) -> Option<&SpecNode> {
        self.nodes.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    pub(crate) fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &SpecNode)> {
        self.nodes.iter().map(|(k, n)| (k.as_str(), n))
    }

    fn slot(&mut self, key: &str) -> Option<&mut SpecNode> {
        self.nodes.iter_mut().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    fn lookup(&self, path: &Path) -> Option<&SpecNode> {
        let mut current = self;
        for segment in path.parents() {
            match current.get(segment)? {
                SpecNode::Section(sub) => current = sub,
                SpecNode::Entry(_) => return None,
            }
        }
        current.get(path.leaf())
    }

    /// Check that `path` can hold a leaf rule without turning an existing
    /// leaf into a section or the other way round.
    fn check_insert(&self, path: &Path) -> Result<(), SpecError> {
        let mut current = self;
        for (depth, segment) in path.parents().iter().enumerate() {
            match current.get(segment) {
                Some(SpecNode::Section(sub)) => current = sub,
                Some(SpecNode::Entry(_)) => {
                    return Err(SpecError::PathConflict {
                        key: path.segments()[..=depth].join("."),
                        reason: "already defined as an entry; undefine it first".into(),
                    });
                }
                None => return Ok(()),
            }
        }
        match current.get(path.leaf()) {
            Some(SpecNode::Section(_)) => Err(SpecError::PathConflict {
                key: path.to_string(),
                reason: "already defined as a section; undefine it first".into(),
            }),
            _ => Ok(()),
        }
    }

    fn insert(&mut self, path: &Path, entry: EntrySpec) -> Result<(), SpecError> {
        self.check_insert(path)?;
        let mut current = self;
        for segment in path.parents() {
            if current.get(segment).is_none() {
                current
                    .nodes
                    .push((segment.clone(), SpecNode::Section(SpecTree::default())));
            }
            current = match current.slot(segment) {
                Some(SpecNode::Section(sub)) => sub,
                _ => unreachable!("checked by check_insert"),
            };
        }
        match current.slot(path.leaf()) {
            Some(node) => *node = SpecNode::Entry(entry),
            None => current
                .nodes
                .push((path.leaf().to_string(), SpecNode::Entry(entry))),
        }
        Ok(())
    }

    fn remove(&mut self, path: &Path) -> bool {
        let mut current = self;
        for segment in path.parents() {
            current = match current.slot(segment) {
                Some(SpecNode::Section(sub)) => sub,
                _ => return false,
            };
        }
        let before = current.nodes.len();
        current.nodes.retain(|(k, _)| k != path.leaf());
        current.nodes.len() != before
    }

    fn collect_leaves(&self, prefix: &mut Vec<String>, out: &mut Vec<Path>) {
        for (key, node) in self.iter() {
            prefix.push(key.to_string());
            match node {
                SpecNode::Entry(_) => out.push(Path::from_prefix(prefix)),
                SpecNode::Section(sub) => sub.collect_leaves(prefix, out),
            }
            prefix.pop();
        }
    }
}

/// A declared schema for configuration trees.
///
/// ```ignore
/// let mut spec = ConfigSpec::new();
/// spec.define("server.host", "localhost")?;
/// spec.define_in_range("server.port", 8080, 1, 65535)?;
/// spec.define_in_list("log.level", "info", ["error", "warn", "info", "debug"])?;
///
/// let changes = spec.correct(&mut tree);
/// assert!(spec.is_correct(&tree));
/// ```
///
/// Every `define*` method either fully applies or leaves the spec untouched.
/// Redefining a leaf path replaces its rule. A path that holds a leaf rule
/// cannot gain children, and a path that holds a section cannot become a
/// leaf, until it is [`undefine`](Self::undefine)d.
#[derive(Clone, Default)]
pub struct ConfigSpec {
    pub(crate) root: SpecTree,
}

impl ConfigSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a chained declaration. See [`SpecBuilder`].
    pub fn builder() -> SpecBuilder {
        SpecBuilder::new()
    }

    /// Define an entry whose value must have the same runtime type as
    /// `default` and must not be null.
    pub fn define(
        &mut self,
        path: impl IntoPath,
        default: impl Into<Value>,
    ) -> Result<(), SpecError> {
        let default = default.into();
        let validator = Validator::same_type_as(&default);
        self.define_entry(path, EntrySpec::new(default, validator))
    }

    /// Define an entry checked by a custom predicate.
    ///
    /// The predicate receives `None` for a missing key. It is expected to
    /// return `false` then: defining an entry makes the key mandatory.
    pub fn define_with<F>(
        &mut self,
        path: impl IntoPath,
        default: impl Into<DefaultValue>,
        validator: F,
    ) -> Result<(), SpecError>
    where
        F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        self.define_entry(path, EntrySpec::new(default, Validator::new(validator)))
    }

    /// Define an entry whose value must be of `kind` (or a subkind of it).
    pub fn define_of_kind(
        &mut self,
        path: impl IntoPath,
        default: impl Into<DefaultValue>,
        kind: ValueKind,
    ) -> Result<(), SpecError> {
        self.define_entry(path, EntrySpec::new(default, Validator::of_kind(kind)))
    }

    /// Define an entry whose value must equal one of `acceptable`.
    pub fn define_in_list<I, V>(
        &mut self,
        path: impl IntoPath,
        default: impl Into<DefaultValue>,
        acceptable: I,
    ) -> Result<(), SpecError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let acceptable = acceptable.into_iter().map(Into::into).collect();
        self.define_entry(path, EntrySpec::new(default, Validator::one_of(acceptable)))
    }

    /// Define an entry whose value must lie in `min..=max`.
    ///
    /// Fails with [`SpecError::InvalidRange`] if `min > max` or if the bounds
    /// cannot be compared.
    pub fn define_in_range(
        &mut self,
        path: impl IntoPath,
        default: impl Into<DefaultValue>,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Result<(), SpecError> {
        let path = path.into_path()?;
        let (min, max) = (min.into(), max.into());
        let (min_text, max_text) = (min.to_string(), max.to_string());
        let validator = Validator::in_range(min, max).ok_or_else(|| SpecError::InvalidRange {
            key: path.to_string(),
            min: min_text,
            max: max_text,
        })?;
        self.define_entry(path, EntrySpec::new(default, validator))
    }

    /// Define an entry whose value must be a list with every element passing
    /// `element`.
    pub fn define_list<F>(
        &mut self,
        path: impl IntoPath,
        default: impl Into<DefaultValue>,
        element: F,
    ) -> Result<(), SpecError>
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.define_entry(path, EntrySpec::new(default, Validator::each(element)))
    }

    /// Define an entry from a prepared [`EntrySpec`]. Every other `define*`
    /// method ends up here.
    pub fn define_entry(&mut self, path: impl IntoPath, entry: EntrySpec) -> Result<(), SpecError> {
        let path = path.into_path()?;
        if entry.default_value().is_null_literal() {
            return Err(SpecError::NullDefault {
                key: path.to_string(),
            });
        }
        self.root.insert(&path, entry)
    }

    /// Remove the entry or whole section at `path`. Returns whether anything
    /// was removed. Parent sections stay, even when left empty.
    pub fn undefine(&mut self, path: impl IntoPath) -> bool {
        match path.into_path() {
            Ok(path) => self.root.remove(&path),
            Err(_) => false,
        }
    }

    /// Whether an entry or a section exists at `path`.
    pub fn is_defined(&self, path: impl IntoPath) -> bool {
        path.into_path()
            .is_ok_and(|path| self.root.lookup(&path).is_some())
    }

    /// Every declared entry path, depth-first in declaration order.
    pub fn defined_paths(&self) -> Vec<Path> {
        let mut out = Vec::new();
        self.root.collect_leaves(&mut Vec::new(), &mut out);
        out
    }

    /// A tree holding the default of every entry.
    pub fn default_tree(&self) -> Tree {
        let mut tree = Tree::new();
        self.correct(&mut tree);
        tree
    }

    pub(crate) fn entry(&self, path: impl IntoPath) -> Result<&EntrySpec, SpecError> {
        let path = path.into_path()?;
        match self.root.lookup(&path) {
            Some(SpecNode::Entry(entry)) => Ok(entry),
            _ => Err(SpecError::NotDefined(path.to_string())),
        }
    }
}

impl fmt::Debug for ConfigSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let paths: Vec<String> = self.defined_paths().iter().map(Path::to_string).collect();
        f.debug_struct("ConfigSpec").field("entries", &paths).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_creates_intermediate_sections() {
        let mut spec = ConfigSpec::new();
        spec.define("a.b.c", 1).unwrap();
        assert!(spec.is_defined("a"));
        assert!(spec.is_defined("a.b"));
        assert!(spec.is_defined(["a", "b", "c"]));
        assert!(!spec.is_defined("a.b.d"));
    }

    #[test]
    fn string_and_sequence_paths_are_equivalent() {
        let mut spec = ConfigSpec::new();
        spec.define(["server", "port"], 8080).unwrap();
        assert!(spec.is_defined("server.port"));
        assert!(spec.undefine("server.port"));
        assert!(!spec.is_defined(vec!["server", "port"]));
    }

    #[test]
    fn redefine_replaces_rule() {
        let mut spec = ConfigSpec::new();
        spec.define("port", 8080).unwrap();
        spec.define("port", "eighty").unwrap();
        assert_eq!(spec.defined_paths().len(), 1);
        assert_eq!(spec.correct_value("port", Value::Null).unwrap(), Value::from("eighty"));
    }

    #[test]
    fn redefine_keeps_declaration_position() {
        let mut spec = ConfigSpec::new();
        spec.define("a", 1).unwrap();
        spec.define("b", 2).unwrap();
        spec.define("a", 3).unwrap();
        let paths: Vec<String> = spec.defined_paths().iter().map(Path::to_string).collect();
        assert_eq!(paths, ["a", "b"]);
    }

    #[test]
    fn null_literal_default_rejected() {
        let mut spec = ConfigSpec::new();
        let err = spec.define("a", Value::Null).unwrap_err();
        assert!(matches!(err, SpecError::NullDefault { ref key } if key == "a"));
        assert!(!spec.is_defined("a"));
    }

    #[test]
    fn lazy_null_default_accepted() {
        let mut spec = ConfigSpec::new();
        spec.define_with("a", DefaultValue::lazy(|| Value::Null), |v| v.is_some())
            .unwrap();
        assert!(spec.is_defined("a"));
    }

    #[test]
    fn invalid_range_rejected_without_mutation() {
        let mut spec = ConfigSpec::new();
        assert!(spec.define_in_range("p", 5, 1, 10).is_ok());
        let err = spec.define_in_range("q", 5, 10, 1).unwrap_err();
        assert!(matches!(err, SpecError::InvalidRange { ref key, .. } if key == "q"));
        assert!(!spec.is_defined("q"));
        assert!(matches!(
            spec.define_in_range("r", 5, 1, "ten"),
            Err(SpecError::InvalidRange { .. })
        ));
    }

    #[test]
    fn invalid_path_rejected() {
        let mut spec = ConfigSpec::new();
        assert!(matches!(
            spec.define("a..b", 1),
            Err(SpecError::InvalidPath { .. })
        ));
        assert!(!spec.is_defined(""));
        assert!(!spec.undefine(""));
    }

    #[test]
    fn entry_cannot_gain_children() {
        let mut spec = ConfigSpec::new();
        spec.define("a", 1).unwrap();
        let err = spec.define("a.b", 2).unwrap_err();
        assert!(matches!(err, SpecError::PathConflict { ref key, .. } if key == "a"));
        assert!(!spec.is_defined("a.b"));
    }

    #[test]
    fn section_cannot_become_entry() {
        let mut spec = ConfigSpec::new();
        spec.define("a.b", 1).unwrap();
        assert!(matches!(
            spec.define("a", 2),
            Err(SpecError::PathConflict { .. })
        ));
        assert!(spec.undefine("a"));
        spec.define("a", 2).unwrap();
        assert!(spec.is_defined("a"));
        assert!(!spec.is_defined("a.b"));
    }

    #[test]
    fn undefine_missing_is_harmless() {
        let mut spec = ConfigSpec::new();
        assert!(!spec.undefine("nothing.here"));
        spec.define("a", 1).unwrap();
        assert!(!spec.undefine("a.b"));
        assert!(spec.is_defined("a"));
    }

    #[test]
    fn undefine_leaf_keeps_parent_section() {
        let mut spec = ConfigSpec::new();
        spec.define("db.url", "pg://").unwrap();
        assert!(spec.undefine("db.url"));
        assert!(spec.is_defined("db"));
        assert!(spec.defined_paths().is_empty());
    }

    #[test]
    fn defined_paths_in_declaration_order() {
        let mut spec = ConfigSpec::new();
        spec.define("z", 1).unwrap();
        spec.define("db.url", "pg://").unwrap();
        spec.define("a", 1).unwrap();
        spec.define("db.pool", 5).unwrap();
        let paths: Vec<String> = spec.defined_paths().iter().map(Path::to_string).collect();
        assert_eq!(paths, ["z", "db.url", "db.pool", "a"]);
    }

    #[test]
    fn default_tree_holds_every_default() {
        let mut spec = ConfigSpec::new();
        spec.define("host", "localhost").unwrap();
        spec.define_in_range("db.pool", 5, 1, 100).unwrap();
        let tree = spec.default_tree();
        assert_eq!(tree.get("host"), Some(&Value::from("localhost")));
        assert_eq!(tree.get_path("db.pool"), Some(&Value::from(5)));
    }

    #[test]
    fn debug_lists_entries() {
        let mut spec = ConfigSpec::new();
        spec.define("db.url", "pg://").unwrap();
        assert!(format!("{spec:?}").contains("db.url"));
    }

    #[test]
    fn spec_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConfigSpec>();
    }
}
