use crate::entry::{DefaultValue, EntrySpec};
use crate::error::SpecError;
use crate::path::IntoPath;
use crate::spec::ConfigSpec;
use crate::value::{Value, ValueKind};

/// Chained declaration of a [`ConfigSpec`].
///
/// Each method mirrors the `define*` method of the same name on
/// [`ConfigSpec`]. The first declaration error is kept and returned by
/// [`build()`](Self::build); declarations after it are skipped.
///
/// ```ignore
/// let spec = ConfigSpec::builder()
///     .define("host", "localhost")
///     .define_in_range("port", 8080, 1, 65535)
///     .define_in_list("log.level", "info", ["error", "warn", "info", "debug"])
///     .build()?;
/// ```
#[derive(Debug)]
pub struct SpecBuilder {
    spec: ConfigSpec,
    error: Option<SpecError>,
}

impl SpecBuilder {
    pub(crate) fn new() -> Self {
        Self::extend(ConfigSpec::new())
    }

    /// Continue declaring on top of an existing spec.
    pub fn extend(spec: ConfigSpec) -> Self {
        Self { spec, error: None }
    }

    fn apply(mut self, declare: impl FnOnce(&mut ConfigSpec) -> Result<(), SpecError>) -> Self {
        if self.error.is_none()
            && let Err(e) = declare(&mut self.spec)
        {
            self.error = Some(e);
        }
        self
    }

    pub fn define(self, path: impl IntoPath, default: impl Into<Value>) -> Self {
        self.apply(|spec| spec.define(path, default))
    }

    pub fn define_with<F>(
        self,
        path: impl IntoPath,
        default: impl Into<DefaultValue>,
        validator: F,
    ) -> Self
    where
        F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        self.apply(|spec| spec.define_with(path, default, validator))
    }

    pub fn define_of_kind(
        self,
        path: impl IntoPath,
        default: impl Into<DefaultValue>,
        kind: ValueKind,
    ) -> Self {
        self.apply(|spec| spec.define_of_kind(path, default, kind))
    }

    pub fn define_in_list<I, V>(
        self,
        path: impl IntoPath,
        default: impl Into<DefaultValue>,
        acceptable: I,
    ) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.apply(|spec| spec.define_in_list(path, default, acceptable))
    }

    pub fn define_in_range(
        self,
        path: impl IntoPath,
        default: impl Into<DefaultValue>,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Self {
        self.apply(|spec| spec.define_in_range(path, default, min, max))
    }

    pub fn define_list<F>(
        self,
        path: impl IntoPath,
        default: impl Into<DefaultValue>,
        element: F,
    ) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.apply(|spec| spec.define_list(path, default, element))
    }

    pub fn define_entry(self, path: impl IntoPath, entry: EntrySpec) -> Self {
        self.apply(|spec| spec.define_entry(path, entry))
    }

    pub fn undefine(self, path: impl IntoPath) -> Self {
        self.apply(|spec| {
            spec.undefine(path);
            Ok(())
        })
    }

    pub fn build(self) -> Result<ConfigSpec, SpecError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.spec),
        }
    }
}
