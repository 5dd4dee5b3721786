//! Runtime inspection of checked subjects.
//!
//! Subjects are [`serde_json::Value`]s. This module provides the type tags
//! used by Type rules, the size measure used by Min/Max/Range rules, and
//! by-value equality used by Enum rules.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde_json::Value;

use crate::error::ConfigError;

/// The runtime type tag of a subject.
///
/// An integral number carries both [`TypeTag::Integer`] and
/// [`TypeTag::Number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Null,
    Boolean,
    Number,
    Integer,
    String,
    Array,
    Object,
}

impl TypeTag {
    /// Returns the canonical tag name.
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Boolean => "boolean",
            TypeTag::Number => "number",
            TypeTag::Integer => "integer",
            TypeTag::String => "string",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
        }
    }

    /// Returns true if `value` carries this tag.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            TypeTag::Null => value.is_null(),
            TypeTag::Boolean => value.is_boolean(),
            TypeTag::Number => value.is_number(),
            TypeTag::Integer => value.is_i64() || value.is_u64(),
            TypeTag::String => value.is_string(),
            TypeTag::Array => value.is_array(),
            TypeTag::Object => value.is_object(),
        }
    }

    /// Returns the most specific tag of `value`.
    pub fn of(value: &Value) -> TypeTag {
        match value {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => TypeTag::Integer,
            Value::Number(_) => TypeTag::Number,
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Object(_) => TypeTag::Object,
        }
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(TypeTag::Null),
            "boolean" => Ok(TypeTag::Boolean),
            "number" => Ok(TypeTag::Number),
            "integer" => Ok(TypeTag::Integer),
            "string" => Ok(TypeTag::String),
            "array" => Ok(TypeTag::Array),
            "object" => Ok(TypeTag::Object),
            other => Err(ConfigError::UnknownTypeTag(other.to_string())),
        }
    }
}

/// What a bound is compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    /// The numeric value of a number subject.
    Value(f64),
    /// The length of a string (in chars) or an array (in items).
    Length(usize),
}

impl Measure {
    /// Measures `value`, or `None` if it has neither a numeric value nor a size.
    pub fn of(value: &Value) -> Option<Measure> {
        match value {
            Value::Number(n) => n.as_f64().map(Measure::Value),
            Value::String(s) => Some(Measure::Length(s.chars().count())),
            Value::Array(items) => Some(Measure::Length(items.len())),
            _ => None,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Measure::Value(v) => v,
            Measure::Length(len) => len as f64,
        }
    }

    /// Prefix used in messages: "" for values, "length " for sizes.
    pub(crate) fn subject(self) -> &'static str {
        match self {
            Measure::Value(_) => "",
            Measure::Length(_) => "length ",
        }
    }
}

impl Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Value(v) => write!(f, "{}", v),
            Measure::Length(len) => write!(f, "{}", len),
        }
    }
}

/// A numeric bound for Min, Max and Range rules.
///
/// Implemented for every primitive number, so sizes such as `buf.len()`
/// can be passed directly. Integers beyond 2^53 round to the nearest `f64`.
pub trait Bound {
    fn into_bound(self) -> f64;
}

macro_rules! impl_bound {
    ($($t:ty),*) => {
        $(
            impl Bound for $t {
                fn into_bound(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_bound!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Compares two values by value, treating `1` and `1.0` as equal.
///
/// Two integers compare exactly.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_f64() || y.is_f64() => {
            match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => x == y,
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| loose_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| loose_eq(x, y)))
        }
        _ => a == b,
    }
}

/// Renders `value` for `got` fields, truncated to keep messages readable.
pub(crate) fn describe(value: &Value) -> String {
    const LIMIT: usize = 64;
    let rendered = value.to_string();
    if rendered.chars().count() <= LIMIT {
        rendered
    } else {
        let cut: String = rendered.chars().take(LIMIT).collect();
        format!("{}...", cut)
    }
}
