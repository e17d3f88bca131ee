//! Runtime type lattice

use crate::error::TenetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Runtime type of a [`Value`](crate::Value).
///
/// Types form a single-inheritance tree rooted at `Any`:
///
/// ```text
/// Any ─┬─ Null
///      ├─ Bool
///      ├─ Number ─┬─ Int
///      │          └─ Float
///      ├─ Sequence ─┬─ String
///      │            └─ List
///      └─ Map
/// ```
///
/// Leaf types are what `Value::value_type` returns. The inner nodes only
/// appear as arguments to the subtype-aware constraints.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Any,
    Null,
    Bool,
    Number,
    Int,
    Float,
    Sequence,
    String,
    List,
    Map,
}

impl ValueType {
    /// Immediate supertype, `None` for `Any`
    pub fn parent(self) -> Option<ValueType> {
        match self {
            ValueType::Any => None,
            ValueType::Int | ValueType::Float => Some(ValueType::Number),
            ValueType::String | ValueType::List => Some(ValueType::Sequence),
            ValueType::Null
            | ValueType::Bool
            | ValueType::Number
            | ValueType::Sequence
            | ValueType::Map => Some(ValueType::Any),
        }
    }

    /// This type followed by every supertype, most specific first
    pub fn ancestry(self) -> Vec<ValueType> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = current.parent() {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// True if `self` equals `other` or derives from it
    pub fn is_subtype_of(self, other: ValueType) -> bool {
        self.ancestry().contains(&other)
    }

    /// Lowercase name, as accepted by `FromStr`
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Any => "any",
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Number => "number",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Sequence => "sequence",
            ValueType::String => "string",
            ValueType::List => "list",
            ValueType::Map => "map",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ValueType {
    type Err = TenetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" | "object" => Ok(ValueType::Any),
            "null" => Ok(ValueType::Null),
            "bool" | "boolean" => Ok(ValueType::Bool),
            "number" => Ok(ValueType::Number),
            "int" | "integer" => Ok(ValueType::Int),
            "float" | "double" => Ok(ValueType::Float),
            "sequence" => Ok(ValueType::Sequence),
            "string" | "str" => Ok(ValueType::String),
            "list" | "array" => Ok(ValueType::List),
            "map" | "table" => Ok(ValueType::Map),
            _ => Err(TenetError::UnknownType(s.to_string())),
        }
    }
}
