//! Read-only conformance checks against a [`ConfigSpec`].
//!
//! A tree is correct if and only if, at every level the spec covers:
//!
//! 1. every declared entry is present and passes its validator,
//! 2. every declared section is present as a tree and is itself correct,
//! 3. no key is present that the spec does not declare.
//!
//! Checking stops at the first violation.

use crate::error::SpecError;
use crate::path::IntoPath;
use crate::spec::{ConfigSpec, SpecNode, SpecTree};
use crate::tree::Tree;
use crate::value::Value;

impl ConfigSpec {
    /// Whether `tree` conforms to this spec.
    pub fn is_correct(&self, tree: &Tree) -> bool {
        level_is_correct(tree, &self.root)
    }

    /// Apply the validator of the entry at `path` to a single value.
    ///
    /// Pass `None` to ask whether an absent key would be acceptable. Fails
    /// with [`SpecError::NotDefined`] if no entry exists at `path`; sections
    /// do not count.
    pub fn is_correct_value<'v>(
        &self,
        path: impl IntoPath,
        value: impl Into<Option<&'v Value>>,
    ) -> Result<bool, SpecError> {
        Ok(self.entry(path)?.test(value.into()))
    }
}

fn level_is_correct(data: &Tree, schema: &SpecTree) -> bool {
    for (key, node) in schema.iter() {
        // Absence fails here whatever the validator would say about it.
        let Some(value) = data.get(key) else {
            return false;
        };
        let ok = match node {
            SpecNode::Section(sub_schema) => match value {
                Value::Tree(sub) => level_is_correct(sub, sub_schema),
                _ => false,
            },
            SpecNode::Entry(entry) => entry.test(Some(value)),
        };
        if !ok {
            return false;
        }
    }

    data.keys().all(|key| schema.contains_key(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{server_spec, tree};

    #[test]
    fn toml_datetime_passes_a_string_entry() {
        let mut spec = ConfigSpec::new();
        spec.define("ts", "2000-01-01T00:00:00Z").unwrap();
        assert!(spec.is_correct(&tree("ts = 1979-05-27T07:32:00Z")));
    }

    #[test]
    fn defaults_are_correct() {
        let spec = server_spec();
        assert!(spec.is_correct(&spec.default_tree()));
    }

    #[test]
    fn empty_spec_accepts_only_empty_tree() {
        let spec = ConfigSpec::new();
        assert!(spec.is_correct(&Tree::new()));
        assert!(!spec.is_correct(&tree("a = 1")));
    }

    #[test]
    fn missing_entry_is_incorrect() {
        let spec = server_spec();
        let mut data = spec.default_tree();
        data.remove("host");
        assert!(!spec.is_correct(&data));
    }

    #[test]
    fn missing_entry_is_incorrect_even_if_validator_accepts_absence() {
        let mut spec = ConfigSpec::new();
        spec.define_with("optional", 1, |_| true).unwrap();
        assert!(!spec.is_correct(&Tree::new()));
        assert!(spec.is_correct(&tree("optional = \"anything\"")));
    }

    #[test]
    fn present_null_goes_to_validator() {
        let mut spec = ConfigSpec::new();
        spec.define_with("maybe", 1, |v| matches!(v, Some(Value::Null | Value::Integer(_))))
            .unwrap();
        let mut data = Tree::new();
        data.insert("maybe", Value::Null);
        assert!(spec.is_correct(&data));
    }

    #[test]
    fn wrong_type_is_incorrect() {
        let spec = server_spec();
        let mut data = spec.default_tree();
        data.insert("port", "eighty");
        assert!(!spec.is_correct(&data));
    }

    #[test]
    fn section_must_be_a_tree() {
        let spec = server_spec();
        let mut data = spec.default_tree();
        data.insert("database", "postgres://");
        assert!(!spec.is_correct(&data));
    }

    #[test]
    fn undeclared_top_level_key_is_incorrect() {
        let spec = server_spec();
        let mut data = spec.default_tree();
        data.insert("typo_key", 1);
        assert!(!spec.is_correct(&data));
    }

    #[test]
    fn undeclared_nested_key_is_incorrect() {
        let spec = server_spec();
        let mut data = spec.default_tree();
        data.set_path("database.typo", 1).unwrap();
        assert!(!spec.is_correct(&data));
    }

    #[test]
    fn nested_incorrect_value() {
        let spec = server_spec();
        let mut data = spec.default_tree();
        data.set_path("database.pool_size", 0).unwrap();
        assert!(!spec.is_correct(&data));
    }

    #[test]
    fn toml_document_checked() {
        let spec = server_spec();
        let data = tree(
            r#"
            host = "example.com"
            port = 443
            debug = true
            tags = ["web", "prod"]

            [database]
            url = "postgres://db"
            pool_size = 20

            [log]
            level = "warn"
            "#,
        );
        assert!(spec.is_correct(&data));
    }

    #[test]
    fn single_value_range_boundaries() {
        let mut spec = ConfigSpec::new();
        spec.define_in_range("p", 5, 1, 10).unwrap();
        assert!(spec.is_correct_value("p", &Value::from(1)).unwrap());
        assert!(spec.is_correct_value("p", &Value::from(10)).unwrap());
        assert!(!spec.is_correct_value("p", &Value::from(0)).unwrap());
        assert!(!spec.is_correct_value("p", &Value::from(11)).unwrap());
        assert!(!spec.is_correct_value("p", None::<&Value>).unwrap());
    }

    #[test]
    fn single_value_on_undefined_path_errors() {
        let spec = server_spec();
        assert!(matches!(
            spec.is_correct_value("nope", &Value::from(1)),
            Err(SpecError::NotDefined(_))
        ));
        // A section is not an entry.
        assert!(matches!(
            spec.is_correct_value("database", &Value::from(Tree::new())),
            Err(SpecError::NotDefined(_))
        ));
    }
}
