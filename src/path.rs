//! Paths into a configuration tree.
//!
//! A [`Path`] is an ordered, non-empty list of non-empty key segments. Every
//! operation that takes a path accepts anything implementing [`IntoPath`]: a
//! dotted string (`"database.pool_size"`) or a pre-split sequence
//! (`["database", "pool_size"]`). Both forms resolve to the same `Path`.
//!
//! Segments are matched exactly and case-sensitively. A dotted string cannot
//! express a segment that itself contains a dot; use the sequence form for
//! those.

use std::fmt;

use crate::error::SpecError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Split a dotted string into a path.
    pub fn parse(dotted: &str) -> Result<Self, SpecError> {
        Self::from_segments(dotted.split('.'))
    }

    /// Build a path from already-split segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, SpecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(SpecError::InvalidPath {
                path: String::new(),
                reason: "a path needs at least one segment".into(),
            });
        }
        if segments.iter().any(|s| s.is_empty()) {
            return Err(SpecError::InvalidPath {
                path: segments.join("."),
                reason: "empty segment".into(),
            });
        }
        Ok(Self { segments })
    }

    /// Snapshot of a prefix stack that is known to hold valid segments.
    pub(crate) fn from_prefix(prefix: &[String]) -> Self {
        debug_assert!(!prefix.is_empty());
        Self {
            segments: prefix.to_vec(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments. Always at least one.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The final segment, i.e. the key inside the innermost tree.
    pub fn leaf(&self) -> &str {
        // Non-empty by construction.
        &self.segments[self.segments.len() - 1]
    }

    /// Segments leading to the innermost tree (empty for a top-level key).
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl AsRef<[String]> for Path {
    fn as_ref(&self) -> &[String] {
        &self.segments
    }
}

/// Anything that can name a location in a tree.
pub trait IntoPath {
    fn into_path(self) -> Result<Path, SpecError>;
}

impl IntoPath for Path {
    fn into_path(self) -> Result<Path, SpecError> {
        Ok(self)
    }
}

impl IntoPath for &Path {
    fn into_path(self) -> Result<Path, SpecError> {
        Ok(self.clone())
    }
}

impl IntoPath for &str {
    fn into_path(self) -> Result<Path, SpecError> {
        Path::parse(self)
    }
}

impl IntoPath for String {
    fn into_path(self) -> Result<Path, SpecError> {
        Path::parse(&self)
    }
}

impl IntoPath for &String {
    fn into_path(self) -> Result<Path, SpecError> {
        Path::parse(self)
    }
}

impl IntoPath for &[&str] {
    fn into_path(self) -> Result<Path, SpecError> {
        Path::from_segments(self.iter().copied())
    }
}

impl IntoPath for &[String] {
    fn into_path(self) -> Result<Path, SpecError> {
        Path::from_segments(self.iter().cloned())
    }
}

impl IntoPath for Vec<&str> {
    fn into_path(self) -> Result<Path, SpecError> {
        Path::from_segments(self)
    }
}

impl IntoPath for Vec<String> {
    fn into_path(self) -> Result<Path, SpecError> {
        Path::from_segments(self)
    }
}

impl<const N: usize> IntoPath for [&str; N] {
    fn into_path(self) -> Result<Path, SpecError> {
        Path::from_segments(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_and_split_forms_are_equal() {
        let dotted = "database.pool_size".into_path().unwrap();
        let split = ["database", "pool_size"].into_path().unwrap();
        assert_eq!(dotted, split);
        assert_eq!(dotted.depth(), 2);
    }

    #[test]
    fn single_segment() {
        let path = "port".into_path().unwrap();
        assert_eq!(path.leaf(), "port");
        assert!(path.parents().is_empty());
    }

    #[test]
    fn parents_and_leaf() {
        let path = Path::parse("a.b.c").unwrap();
        assert_eq!(path.parents(), ["a".to_string(), "b".to_string()]);
        assert_eq!(path.leaf(), "c");
    }

    #[test]
    fn display_joins_with_dots() {
        let path = vec!["server", "tls", "cert"].into_path().unwrap();
        assert_eq!(path.to_string(), "server.tls.cert");
    }

    #[test]
    fn split_form_keeps_dots_inside_segments() {
        let path = ["hosts", "example.com"].into_path().unwrap();
        assert_eq!(path.depth(), 2);
        assert_eq!(path.leaf(), "example.com");
    }

    #[test]
    fn empty_string_is_rejected() {
        assert!(matches!(
            "".into_path(),
            Err(SpecError::InvalidPath { .. })
        ));
    }

    #[test]
    fn empty_segment_is_rejected() {
        assert!(matches!(
            "a..b".into_path(),
            Err(SpecError::InvalidPath { .. })
        ));
        assert!(matches!(
            "a.".into_path(),
            Err(SpecError::InvalidPath { .. })
        ));
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let segments: Vec<String> = Vec::new();
        assert!(segments.into_path().is_err());
    }

    #[test]
    fn case_sensitive() {
        assert_ne!(Path::parse("Port").unwrap(), Path::parse("port").unwrap());
    }
}
