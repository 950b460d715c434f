//! In-place correction of a tree against a [`ConfigSpec`].
//!
//! Each level of the tree is corrected in two passes:
//!
//! 1. **Declared keys**, in declaration order. A section whose slot does not
//!    hold a tree gets a fresh empty tree (`Added` if the key was missing,
//!    `Replaced` otherwise) and is then corrected recursively. An entry whose
//!    value fails its validator, or is missing, gets its default.
//! 2. **Undeclared keys** are removed (`Removed`).
//!
//! Pass 1, recursion included, finishes before pass 2 starts, so every
//! reported old value is the state of that key before the pass touched it.
//! Values that already pass are left alone and not reported.
//!
//! A missing section is its own `Added` edit: correcting an empty tree
//! against a single entry `a.b` reports `Added a` then `Added a.b`.

use tracing::{debug, trace};

use crate::correction::{CorrectionAction, Corrections};
use crate::error::SpecError;
use crate::path::{IntoPath, Path};
use crate::spec::{ConfigSpec, SpecNode, SpecTree};
use crate::tree::Tree;
use crate::value::Value;

impl ConfigSpec {
    /// Correct `tree` in place. Returns the number of edits.
    pub fn correct(&self, tree: &mut Tree) -> usize {
        self.correct_with(tree, |_, _, _, _| {})
    }

    /// Correct `tree` in place, calling `listener` once per edit with the
    /// action, the full path from the root, the old value and the new value.
    ///
    /// The listener runs synchronously, in the order edits are made. The
    /// returned count equals the number of listener calls.
    pub fn correct_with<F>(&self, tree: &mut Tree, mut listener: F) -> usize
    where
        F: FnMut(CorrectionAction, &Path, Option<&Value>, Option<&Value>),
    {
        let mut prefix = Vec::new();
        let count = correct_level(tree, &self.root, &mut prefix, &mut listener);
        debug!(changes = count, "corrected configuration tree");
        count
    }

    /// Correct `tree` in place and return every edit that was made.
    pub fn correct_recorded(&self, tree: &mut Tree) -> Corrections {
        let mut log = Corrections::new();
        self.correct_with(tree, |action, path, old, new| log.record(action, path, old, new));
        log
    }

    /// Correct a single value against the entry at `path`: `value` itself if
    /// it passes, a fresh default otherwise.
    ///
    /// Fails with [`SpecError::NotDefined`] if no entry exists at `path`.
    pub fn correct_value(&self, path: impl IntoPath, value: Value) -> Result<Value, SpecError> {
        let entry = self.entry(path)?;
        if entry.test(Some(&value)) {
            Ok(value)
        } else {
            Ok(entry.produce())
        }
    }
}

fn correct_level<F>(
    data: &mut Tree,
    schema: &SpecTree,
    prefix: &mut Vec<String>,
    listener: &mut F,
) -> usize
where
    F: FnMut(CorrectionAction, &Path, Option<&Value>, Option<&Value>),
{
    let mut count = 0;

    for (key, node) in schema.iter() {
        match node {
            SpecNode::Section(sub_schema) => {
                if !matches!(data.get(key), Some(Value::Tree(_))) {
                    let old = data.insert(key, Tree::new());
                    let action = added_or_replaced(old.as_ref());
                    notify(prefix, key, action, old.as_ref(), data.get(key), listener);
                    count += 1;
                }
                if let Some(Value::Tree(sub)) = data.get_mut(key) {
                    prefix.push(key.to_string());
                    count += correct_level(sub, sub_schema, prefix, listener);
                    prefix.pop();
                }
            }
            SpecNode::Entry(entry) => {
                let current = data.get(key);
                // The validator sees absence too, but a missing key is always
                // filled in.
                if !entry.test(current) || current.is_none() {
                    let old = data.insert(key, entry.produce());
                    let action = added_or_replaced(old.as_ref());
                    notify(prefix, key, action, old.as_ref(), data.get(key), listener);
                    count += 1;
                }
            }
        }
    }

    let undeclared: Vec<String> = data
        .keys()
        .filter(|key| !schema.contains_key(key))
        .map(str::to_string)
        .collect();
    for key in undeclared {
        if let Some(old) = data.remove(&key) {
            notify(prefix, &key, CorrectionAction::Removed, Some(&old), None, listener);
            count += 1;
        }
    }

    count
}

fn added_or_replaced(old: Option<&Value>) -> CorrectionAction {
    match old {
        None => CorrectionAction::Added,
        Some(_) => CorrectionAction::Replaced,
    }
}

fn notify<F>(
    prefix: &mut Vec<String>,
    key: &str,
    action: CorrectionAction,
    old: Option<&Value>,
    new: Option<&Value>,
    listener: &mut F,
) where
    F: FnMut(CorrectionAction, &Path, Option<&Value>, Option<&Value>),
{
    prefix.push(key.to_string());
    let path = Path::from_prefix(prefix);
    trace!(%action, %path, "correction");
    listener(action, &path, old, new);
    prefix.pop();
}
