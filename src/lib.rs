//! Declare what a configuration tree should look like, then check it or
//! correct it in place.
//!
//! A [`ConfigSpec`] maps dotted paths to rules. Each rule pairs a default
//! value with a validator. Given an actual configuration [`Tree`], the spec
//! can tell whether the tree conforms, or rewrite it so that it does while
//! reporting every edit.
//!
//! ```ignore
//! let spec = ConfigSpec::builder()
//!     .define("host", "localhost")
//!     .define_in_range("port", 8080, 1, 65535)
//!     .define_in_list("log.level", "info", ["error", "warn", "info", "debug"])
//!     .build()?;
//!
//! let mut tree: Tree = toml::from_str(&std::fs::read_to_string("app.toml")?)?;
//! let changes = spec.correct_with(&mut tree, |action, path, old, new| {
//!     eprintln!("{action} {path}: {old:?} -> {new:?}");
//! });
//! assert!(spec.is_correct(&tree));
//! ```
//!
//! # Declaring entries
//!
//! Every `define*` method takes a path, a default and, directly or
//! implicitly, a validator:
//!
//! | Method | Correct when the value… |
//! |--------|-------------------------|
//! | [`define`](ConfigSpec::define) | has the same type as the default |
//! | [`define_with`](ConfigSpec::define_with) | passes a custom predicate |
//! | [`define_of_kind`](ConfigSpec::define_of_kind) | is of a [`ValueKind`] |
//! | [`define_in_list`](ConfigSpec::define_in_list) | equals one of a set of values |
//! | [`define_in_range`](ConfigSpec::define_in_range) | lies in `min..=max` |
//! | [`define_list`](ConfigSpec::define_list) | is a list whose elements all pass a predicate |
//!
//! Paths are dotted strings (`"database.pool_size"`) or pre-split sequences
//! (`["database", "pool_size"]`); both behave the same. Intermediate sections
//! are created on demand. Defaults are either fixed values or
//! [`DefaultValue::lazy`] producers, which only run when a correction needs
//! them. A fixed null default is rejected at declaration time.
//!
//! # Absent versus null
//!
//! A key holding [`Value::Null`] is present. Validators receive
//! `Option<&Value>`: `None` for a missing key, `Some(&Value::Null)` for a
//! present null. The built-in validators reject both. Declaring an entry
//! makes its key mandatory: a missing key is never correct and is always
//! filled in by correction.
//!
//! # Closed world
//!
//! At every level the spec covers, keys the spec does not declare make the
//! tree incorrect. Correction removes them, including inside nested sections
//! that are otherwise fine.
//!
//! # Correcting
//!
//! [`correct`](ConfigSpec::correct) walks the spec and the tree together.
//! Per level it first fixes declared keys in declaration order (recursing into
//! sections as it meets them), then removes undeclared keys. Each edit is
//! reported once to the listener as a [`CorrectionAction`] with the full path
//! from the root and the old and new values. The returned count equals the
//! number of listener calls, and correcting an already-corrected tree makes
//! no further edits.
//!
//! # Error handling
//!
//! Only declarations and single-path lookups fail, with [`SpecError`]. A
//! value that does not conform is never an error: checking answers `false`
//! and correcting repairs it.
//!
//! # Logging
//!
//! Corrections emit `tracing` events: one `debug` summary per call and one
//! `trace` event per edit. Install a subscriber to see them.

pub mod error;

mod builder;
mod convert;
mod correct;
mod correction;
mod entry;
mod path;
mod spec;
mod tree;
mod validate;
mod value;

#[cfg(test)]
mod fixtures;

pub use builder::SpecBuilder;
pub use correction::{Correction, CorrectionAction, Corrections};
pub use entry::{DefaultValue, EntrySpec, Validator};
pub use error::SpecError;
pub use path::{IntoPath, Path};
pub use spec::ConfigSpec;
pub use tree::Tree;
pub use value::{Opaque, Value, ValueKind};
