#[cfg(test)]
pub mod test {
    use crate::entry::DefaultValue;
    use crate::spec::ConfigSpec;
    use crate::tree::Tree;
    use crate::value::Value;

    /// A web server's config spec.
    ///
    /// ```toml
    /// host = "localhost"
    /// port = 8080            # 1..=65535
    /// debug = false
    /// tags = ["web"]         # strings only
    ///
    /// [database]
    /// url = "postgres://localhost/app"   # lazy, must start with postgres://
    /// pool_size = 5          # 1..=100
    ///
    /// [log]
    /// level = "info"         # error | warn | info | debug
    /// ```
    pub fn server_spec() -> ConfigSpec {
        ConfigSpec::builder()
            .define("host", "localhost")
            .define_in_range("port", 8080, 1, 65535)
            .define("debug", false)
            .define_list("tags", vec!["web"], |e| e.as_str().is_some())
            .define_with(
                "database.url",
                DefaultValue::lazy(|| Value::from("postgres://localhost/app")),
                |v| {
                    v.and_then(Value::as_str)
                        .is_some_and(|s| s.starts_with("postgres://"))
                },
            )
            .define_in_range("database.pool_size", 5, 1, 100)
            .define_in_list("log.level", "info", ["error", "warn", "info", "debug"])
            .build()
            .unwrap()
    }

    /// Parse a TOML document into a [`Tree`].
    pub fn tree(toml_str: &str) -> Tree {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn server_spec_declares_all_entries() {
        let spec = server_spec();
        assert_eq!(spec.defined_paths().len(), 7);
        assert!(spec.is_defined("database.url"));
        assert!(spec.is_defined("log.level"));
    }

    #[test]
    fn tree_helper_parses_sections() {
        let t = tree("[a]\nb = 1");
        assert_eq!(t.get_path("a.b"), Some(&Value::Integer(1)));
    }
}
