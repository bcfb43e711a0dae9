//! Dynamic values
//!
//! [`Value`] is the currency of the generation tree: fixed overrides are
//! stored as values, leaves are sampled into values and the assembler builds
//! a value bottom-up before converting it into a concrete Rust type.

use crate::error::{FixtureError, Result};
use crate::types::{LeafKind, TypeDesc, TypeKind};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Concrete value of a node or subtree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,

    /// Boolean
    Bool(bool),

    /// Integer
    Int(i64),

    /// Unsigned integer above `i64::MAX`
    UInt(u64),

    /// Floating point
    Float(f64),

    /// String, character or enum variant name
    Str(String),

    /// Ordered elements
    List(Vec<Value>),

    /// Named fields in declaration order
    Object(IndexMap<String, Value>),
}

impl Value {
    /// Build an object from `(name, value)` pairs
    #[must_use]
    pub fn object<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Convert any serializable Rust value
    ///
    /// # Errors
    /// Returns `UnsupportedShape` when the value cannot be represented
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Self::from)
            .map_err(|e| FixtureError::UnsupportedShape(e.to_string()))
    }

    /// Convert into a concrete Rust type
    ///
    /// # Errors
    /// Returns `Assembly` when the value does not fit `T`
    pub fn deserialize_into<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(self.into_json())?)
    }

    /// Runtime type name
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }

    /// Check if value is absent
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Field of an object value
    #[inline]
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Object(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Element of a list value
    #[inline]
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Self::List(elements) => elements.get(index),
            _ => None,
        }
    }

    /// Elements of a list value
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(elements) => Some(elements.as_slice()),
            _ => None,
        }
    }

    /// Check that this value may be stored in a node of type `ty`
    ///
    /// Absent values are assignable everywhere; whether absence is
    /// acceptable is decided when the sample is assembled.
    #[must_use]
    pub fn is_assignable_to(&self, ty: &TypeDesc) -> bool {
        match (self, ty.kind()) {
            (Self::Null, _) | (_, TypeKind::Opaque) => true,
            (Self::Bool(_), TypeKind::Leaf(LeafKind::Bool)) => true,
            (Self::Int(v), TypeKind::Leaf(LeafKind::Int { min, max })) => (*min..=*max).contains(v),
            (Self::Int(v), TypeKind::Leaf(LeafKind::UInt { min, max })) => {
                u64::try_from(*v).is_ok_and(|v| (*min..=*max).contains(&v))
            }
            (Self::UInt(v), TypeKind::Leaf(LeafKind::UInt { min, max })) => (*min..=*max).contains(v),
            (Self::UInt(v), TypeKind::Leaf(LeafKind::Int { min, max })) => {
                i64::try_from(*v).is_ok_and(|v| (*min..=*max).contains(&v))
            }
            (Self::Int(_) | Self::UInt(_) | Self::Float(_), TypeKind::Leaf(LeafKind::Float { .. })) => true,
            (Self::Str(_), TypeKind::Leaf(LeafKind::Str { .. })) => true,
            (Self::Str(s), TypeKind::Leaf(LeafKind::Char)) => s.chars().count() == 1,
            (Self::Str(s), TypeKind::Enum(variants)) => variants.iter().any(|v| v == s),
            (Self::List(_), TypeKind::List(_)) => true,
            (Self::Object(_), TypeKind::Object(_)) => true,
            _ => false,
        }
    }

    /// Convert into `serde_json::Value`
    #[must_use]
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(b),
            Self::Int(i) => serde_json::Value::from(i),
            Self::UInt(u) => serde_json::Value::from(u),
            Self::Float(f) => serde_json::Number::from_f64(f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::Str(s) => serde_json::Value::String(s),
            Self::List(elements) => {
                serde_json::Value::Array(elements.into_iter().map(Self::into_json).collect())
            }
            Self::Object(fields) => serde_json::Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UInt(u)
                } else {
                    Self::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(elements) => {
                Self::List(elements.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(fields) => {
                Self::Object(fields.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(Self::UInt(v), Self::Int)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Str(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Describe;
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Pair {
        left: i32,
        right: Option<String>,
    }

    #[test]
    fn assignability_by_kind() {
        assert!(Value::Int(3).is_assignable_to(&i32::describe()));
        assert!(!Value::Int(300).is_assignable_to(&u8::describe()));
        assert!(Value::Int(3).is_assignable_to(&f64::describe()));
        assert!(!Value::from("3").is_assignable_to(&i32::describe()));
        assert!(Value::from('x').is_assignable_to(&char::describe()));
        assert!(!Value::from("xy").is_assignable_to(&char::describe()));
        assert!(Value::from(vec![1, 2]).is_assignable_to(&Vec::<i32>::describe()));
        assert!(Value::Null.is_assignable_to(&String::describe()));
    }

    #[test]
    fn unsigned_values_beyond_i64() {
        let big = Value::from(u64::MAX);
        assert_eq!(big, Value::UInt(u64::MAX));
        assert_eq!(Value::from(7u64), Value::Int(7));
        assert!(big.is_assignable_to(&u64::describe()));
        assert!(!big.is_assignable_to(&i64::describe()));
        assert!(!Value::Int(-1).is_assignable_to(&u64::describe()));

        let json = Value::from_serialize(&u64::MAX).unwrap();
        assert_eq!(json, big);
        assert_eq!(big.deserialize_into::<u64>().unwrap(), u64::MAX);
    }

    #[test]
    fn enum_variant_assignability() {
        let season = TypeDesc::enumeration("Season", ["Spring", "Summer", "Fall", "Winter"]);
        assert!(Value::from("Fall").is_assignable_to(&season));
        assert!(!Value::from("Monsoon").is_assignable_to(&season));
    }

    #[test]
    fn serialize_and_deserialize_through_value() {
        let pair = Pair {
            left: 7,
            right: None,
        };
        let value = Value::from_serialize(&pair).unwrap();
        assert_eq!(value.get_field("left"), Some(&Value::Int(7)));
        assert_eq!(value.get_field("right"), Some(&Value::Null));

        let back: Pair = value.deserialize_into().unwrap();
        assert_eq!(back, pair);
    }

    #[test]
    fn object_preserves_declaration_order() {
        let value = Value::object([("b", 1), ("a", 2)]);
        match value {
            Value::Object(fields) => {
                let keys: Vec<_> = fields.keys().cloned().collect();
                assert_eq!(keys, vec!["b".to_string(), "a".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn wrong_shape_fails_assembly() {
        let err = Value::from("nope").deserialize_into::<Pair>().unwrap_err();
        assert!(matches!(err, FixtureError::Assembly(_)));
    }
}
