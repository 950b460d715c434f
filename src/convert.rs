//! Serde support and conversions to and from `toml` / `serde_json` values.
//!
//! [`Value`] and [`Tree`] serialize and deserialize through any serde format,
//! so a tree can be read straight from a TOML or JSON document. Opaque values
//! cannot be serialized; TOML additionally has no null.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::SpecError;
use crate::tree::Tree;
use crate::value::Value;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Tree(tree) => tree.serialize(serializer),
            Value::Opaque(o) => Err(ser::Error::custom(format!(
                "opaque value of type {} cannot be serialized",
                o.type_name()
            ))),
        }
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a configuration value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        // Beyond i64 range only a float can hold it.
        Ok(i64::try_from(v).map_or(Value::Float(v as f64), Value::Integer))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Value, A::Error> {
        let tree = TreeVisitor.visit_map(map)?;
        // toml hands datetimes to `deserialize_any` as a one-key marker map.
        match tree.get(TOML_DATETIME_KEY) {
            Some(Value::String(s)) if tree.len() == 1 => Ok(Value::String(s.clone())),
            _ => Ok(Value::Tree(tree)),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct TreeVisitor;

impl<'de> Visitor<'de> for TreeVisitor {
    type Value = Tree;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a table of configuration values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Tree, A::Error> {
        let mut tree = Tree::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            tree.insert(key, value);
        }
        Ok(tree)
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TreeVisitor)
    }
}

// -- toml ---------------------------------------------------------------------

impl From<toml::Value> for Value {
    fn from(v: toml::Value) -> Self {
        match v {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Integer(i),
            toml::Value::Float(f) => Value::Float(f),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            toml::Value::Table(table) => Value::Tree(Tree::from(table)),
        }
    }
}

impl From<toml::Table> for Tree {
    fn from(table: toml::Table) -> Self {
        table.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
    }
}

impl TryFrom<Value> for toml::Value {
    type Error = SpecError;

    fn try_from(v: Value) -> Result<Self, SpecError> {
        Ok(match v {
            Value::Null => {
                return Err(SpecError::Unrepresentable {
                    what: "null".into(),
                    target: "TOML",
                });
            }
            Value::Opaque(o) => {
                return Err(SpecError::Unrepresentable {
                    what: format!("opaque value of type {}", o.type_name()),
                    target: "TOML",
                });
            }
            Value::Bool(b) => toml::Value::Boolean(b),
            Value::Integer(i) => toml::Value::Integer(i),
            Value::Float(f) => toml::Value::Float(f),
            Value::String(s) => toml::Value::String(s),
            Value::List(items) => toml::Value::Array(
                items
                    .into_iter()
                    .map(<toml::Value as TryFrom<Value>>::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Tree(tree) => {
                toml::Value::Table(<toml::Table as TryFrom<Tree>>::try_from(tree)?)
            }
        })
    }
}

impl TryFrom<Tree> for toml::Table {
    type Error = SpecError;

    fn try_from(tree: Tree) -> Result<Self, SpecError> {
        tree.into_iter()
            .map(|(k, v)| Ok((k, <toml::Value as TryFrom<Value>>::try_from(v)?)))
            .collect()
    }
}

// -- serde_json ---------------------------------------------------------------

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Tree(Tree::from(map)),
        }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Tree {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = SpecError;

    fn try_from(v: Value) -> Result<Self, SpecError> {
        Ok(match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Integer(i) => serde_json::Value::from(i),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .ok_or_else(|| SpecError::Unrepresentable {
                    what: format!("float {f}"),
                    target: "JSON",
                })?,
            Value::String(s) => serde_json::Value::String(s),
            Value::List(items) => serde_json::Value::Array(
                items
                    .into_iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Tree(tree) => serde_json::Value::Object(
                tree.into_iter()
                    .map(|(k, v)| Ok((k, serde_json::Value::try_from(v)?)))
                    .collect::<Result<_, SpecError>>()?,
            ),
            Value::Opaque(o) => {
                return Err(SpecError::Unrepresentable {
                    what: format!("opaque value of type {}", o.type_name()),
                    target: "JSON",
                });
            }
        })
    }
}
