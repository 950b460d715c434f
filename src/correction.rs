//! What a correction pass reports about each edit it makes.

use std::fmt;

use crate::path::Path;
use crate::value::Value;

/// The kind of edit made to a tree during correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrectionAction {
    /// The key was missing. `old` is `None`.
    Added,
    /// The key held an incorrect value, possibly null.
    Replaced,
    /// The key is not declared in the spec. `new` is `None`.
    Removed,
}

impl fmt::Display for CorrectionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CorrectionAction::Added => "added",
            CorrectionAction::Replaced => "replaced",
            CorrectionAction::Removed => "removed",
        };
        f.write_str(name)
    }
}

/// An owned record of one edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub action: CorrectionAction,
    /// Full path from the root of the corrected tree.
    pub path: Path,
    pub old: Option<Value>,
    pub new: Option<Value>,
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.old, &self.new) {
            (Some(old), Some(new)) => write!(f, "{} {}: {old} -> {new}", self.action, self.path),
            (None, Some(new)) => write!(f, "{} {} = {new}", self.action, self.path),
            (Some(old), None) => write!(f, "{} {} (was {old})", self.action, self.path),
            (None, None) => write!(f, "{} {}", self.action, self.path),
        }
    }
}

/// Collects every edit of one or more correction passes, in order.
///
/// ```ignore
/// let mut log = Corrections::new();
/// spec.correct_with(&mut tree, |action, path, old, new| log.record(action, path, old, new));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corrections {
    entries: Vec<Correction>,
}

impl Corrections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        action: CorrectionAction,
        path: &Path,
        old: Option<&Value>,
        new: Option<&Value>,
    ) {
        self.entries.push(Correction {
            action,
            path: path.clone(),
            old: old.cloned(),
            new: new.cloned(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Correction> {
        self.entries.iter()
    }

    /// Number of recorded edits of the given kind.
    pub fn count(&self, action: CorrectionAction) -> usize {
        self.entries.iter().filter(|c| c.action == action).count()
    }

    pub fn into_vec(self) -> Vec<Correction> {
        self.entries
    }
}

impl IntoIterator for Corrections {
    type Item = Correction;
    type IntoIter = std::vec::IntoIter<Correction>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Corrections {
    type Item = &'a Correction;
    type IntoIter = std::slice::Iter<'a, Correction>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
