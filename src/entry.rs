//! The rule for one leaf path: a [`DefaultValue`] and a [`Validator`].
//!
//! Validators see `Option<&Value>`: `None` when the key is absent,
//! `Some(&Value::Null)` when it is present but null. Every validator built
//! here fails closed on both; closures passed to
//! [`Validator::new`] decide for themselves.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::tree::Tree;
use crate::value::{Value, ValueKind};

type Predicate = dyn Fn(Option<&Value>) -> bool + Send + Sync;
type Producer = dyn Fn() -> Value + Send + Sync;

/// A test deciding whether a value is acceptable.
#[derive(Clone)]
pub struct Validator(Arc<Predicate>);

impl Validator {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    pub fn test(&self, value: Option<&Value>) -> bool {
        (self.0)(value)
    }

    /// Accepts non-null values of exactly the same runtime type as `example`.
    pub fn same_type_as(example: &Value) -> Self {
        let example = example.clone();
        Self::new(move |value| {
            value.is_some_and(|v| !v.is_null() && v.same_type_as(&example))
        })
    }

    /// Accepts values of `kind` or one of its subkinds.
    pub fn of_kind(kind: ValueKind) -> Self {
        Self::new(move |value| value.is_some_and(|v| kind.accepts(v)))
    }

    /// Accepts values equal to one of `acceptable`.
    pub fn one_of(acceptable: Vec<Value>) -> Self {
        Self::new(move |value| match value {
            None | Some(Value::Null) => false,
            Some(v) => acceptable.contains(v),
        })
    }

    /// Accepts values with `min <= value <= max`.
    ///
    /// Returns `None` if `min` is greater than `max` or the two cannot be
    /// ordered against each other. Values that cannot be ordered against the
    /// bounds are rejected.
    pub fn in_range(min: Value, max: Value) -> Option<Self> {
        match min.compare(&max) {
            Some(Ordering::Less | Ordering::Equal) => {}
            _ => return None,
        }
        Some(Self::new(move |value| {
            let Some(v) = value else {
                return false;
            };
            matches!(
                v.compare(&min),
                Some(Ordering::Greater | Ordering::Equal)
            ) && matches!(v.compare(&max), Some(Ordering::Less | Ordering::Equal))
        }))
    }

    /// Accepts lists whose every element passes `element`. Anything that is
    /// not a list is rejected; an empty list is accepted.
    pub fn each<F>(element: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(move |value| match value {
            Some(Value::List(items)) => items.iter().all(&element),
            _ => false,
        })
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// Where the replacement for an incorrect value comes from.
#[derive(Clone)]
pub enum DefaultValue {
    /// Captured once; every correction gets a clone.
    Fixed(Value),
    /// Called on every correction, and only then.
    Lazy(Arc<Producer>),
}

impl DefaultValue {
    pub fn fixed(value: impl Into<Value>) -> Self {
        DefaultValue::Fixed(value.into())
    }

    pub fn lazy<F>(producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        DefaultValue::Lazy(Arc::new(producer))
    }

    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Fixed(value) => value.clone(),
            DefaultValue::Lazy(producer) => producer(),
        }
    }

    pub(crate) fn is_null_literal(&self) -> bool {
        matches!(self, DefaultValue::Fixed(Value::Null))
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            DefaultValue::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        DefaultValue::Fixed(value)
    }
}

macro_rules! fixed_default_from {
    ($($t:ty),*) => {
        $(impl From<$t> for DefaultValue {
            fn from(v: $t) -> Self {
                DefaultValue::Fixed(Value::from(v))
            }
        })*
    };
}

fixed_default_from!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, String, Tree);

impl<T: Into<Value>> From<Vec<T>> for DefaultValue {
    fn from(v: Vec<T>) -> Self {
        DefaultValue::Fixed(Value::from(v))
    }
}

/// The rule for a single leaf path.
#[derive(Debug, Clone)]
pub struct EntrySpec {
    default: DefaultValue,
    validator: Validator,
}

impl EntrySpec {
    pub fn new(default: impl Into<DefaultValue>, validator: Validator) -> Self {
        Self {
            default: default.into(),
            validator,
        }
    }

    pub fn default_value(&self) -> &DefaultValue {
        &self.default
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn test(&self, value: Option<&Value>) -> bool {
        self.validator.test(value)
    }

    pub fn produce(&self) -> Value {
        self.default.produce()
    }
}
