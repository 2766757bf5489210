//! The tagged value tree rendered by templates.
//!
//! Callers hand the engine a [`Value`] — a closed set of scalars, date/time
//! variants, sequences, and string-keyed mappings. The renderer only ever
//! walks mappings and sequences; scalars are emitted through their string
//! form. Trees are typically built from serde-compatible data:
//!
//! ```rust
//! use stencil_render::Value;
//! use serde_json::json;
//!
//! let value = Value::from(json!({"name": "World", "count": 42}));
//! assert!(value.as_mapping().is_some());
//! ```

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;

use crate::error::RenderError;

/// A tree-shaped value: scalars, date/time variants, sequences, and mappings.
///
/// Values are read-only during a render. The string form produced by
/// `Display` is what a variable marker emits when no modifier rewrites it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value; emits nothing.
    Null,
    /// Boolean; emits `true` or `false`.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating-point number. Integral values keep a trailing `.0` in their
    /// string form so `2.0` does not collapse to `2`.
    Float(f64),
    /// Text.
    String(String),
    /// Calendar date; emits ISO-8601 (`2024-07-01`).
    Date(NaiveDate),
    /// Wall-clock time; emits ISO-8601 (`13:45:30`).
    Time(NaiveTime),
    /// Date and time without zone; emits ISO-8601 (`2024-07-01T13:45:30`).
    DateTime(NaiveDateTime),
    /// An instant in UTC; emits RFC 3339.
    Timestamp(DateTime<Utc>),
    /// Ordered sequence of values; the target of section markers.
    Sequence(Vec<Value>),
    /// String-keyed mapping; the dictionary for variable resolution.
    Mapping(HashMap<String, Value>),
}

impl Value {
    /// Builds a value tree from any serde-serializable data.
    ///
    /// Numbers become [`Value::Integer`] when they fit `i64`, otherwise
    /// [`Value::Float`]. Date/time variants cannot be produced this way;
    /// construct them directly when a template formats temporal data.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Value, RenderError> {
        let json =
            serde_json::to_value(value).map_err(|e| RenderError::Serialization(e.to_string()))?;
        Ok(Value::from(json))
    }

    /// Returns the mapping entries, or `None` for any other variant.
    pub fn as_mapping(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the sequence elements, or `None` for any other variant.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => {
                if x.is_finite() && x.fract() == 0.0 {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            Value::String(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Value::Timestamp(ts) => f.write_str(&ts.to_rfc3339()),
            // Container string forms exist so Display can't fail; a well-formed
            // template addresses containers through sections and paths instead.
            Value::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Mapping(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Mapping(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(entries: HashMap<String, Value>) -> Self {
        Value::Mapping(entries)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
