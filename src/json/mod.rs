//! Minimal JSON encoder for snapshot bodies
//!
//! Objects keep their keys in insertion order so every endpoint emits a
//! stable field layout. Numbers carry their own rendering: plain integers,
//! or fixed-point with a requested count of decimal digits.

use std::fmt::{self, Write};

pub mod builder;
pub use builder::{ObjectBuilder, array, object, string};

/// JSON value type
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Fixed-point number with the given count of decimal digits
    Fixed(f64, u8),
    /// String value
    String(String),
    /// Array value
    Array(Vec<Value>),
    /// Object value with ordered keys
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Get as string if possible
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as array if possible
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Index into object (first key wins)
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Uint(n) => write!(f, "{n}"),
            // JSON has no NaN or infinity
            Value::Fixed(n, _) if !n.is_finite() => f.write_str("null"),
            Value::Fixed(n, precision) => {
                // Ties round away from zero, not to even
                let scale = 10f64.powi(i32::from(*precision));
                write!(f, "{:.*}", usize::from(*precision), (n * scale).round() / scale)
            }
            Value::String(s) => write_escaped(f, s),
            Value::Array(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            Value::Object(fields) => {
                f.write_char('{')?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write_escaped(f, key)?;
                    write!(f, ":{value}")?;
                }
                f.write_char('}')
            }
        }
    }
}

/// Write a quoted, escaped JSON string
fn write_escaped<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            ch if ch.is_control() => write!(out, "\\u{:04x}", ch as u32)?,
            ch => out.write_char(ch)?,
        }
    }
    out.write_char('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_object_keeps_key_order() {
        let value = object()
            .string("zeta", "last")
            .int("alpha", -3)
            .bool("mid", true)
            .build();

        assert_eq!(value.to_string(), r#"{"zeta":"last","alpha":-3,"mid":true}"#);
    }

    #[test]
    fn test_fixed_precision() {
        assert_eq!(Value::Fixed(20.0, 1).to_string(), "20.0");
        assert_eq!(Value::Fixed(19.96, 1).to_string(), "20.0");
        assert_eq!(Value::Fixed(12.34, 1).to_string(), "12.3");
        assert_eq!(Value::Fixed(100.0, 1).to_string(), "100.0");
        assert_eq!(Value::Fixed(0.5, 2).to_string(), "0.50");

        // Exact halves round up
        assert_eq!(Value::Fixed(19.25, 1).to_string(), "19.3");
        assert_eq!(Value::Fixed(12.25, 1).to_string(), "12.3");
        assert_eq!(Value::Fixed(0.25, 1).to_string(), "0.3");
    }

    #[test]
    fn test_non_finite_renders_null() {
        assert_eq!(Value::Fixed(f64::NAN, 1).to_string(), "null");
        assert_eq!(Value::Fixed(f64::INFINITY, 1).to_string(), "null");
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(array(Vec::new()).to_string(), "[]");
        assert_eq!(object().build().to_string(), "{}");
        assert_eq!(
            object().strings("players", Vec::<String>::new()).build().to_string(),
            r#"{"players":[]}"#
        );
    }

    #[test]
    fn test_string_escaping() {
        let value = string("say \"hi\"\\\n\tbell\u{7}");
        assert_eq!(value.to_string(), r#""say \"hi\"\\\n\tbell\u0007""#);

        let parsed: serde_json::Value = serde_json::from_str(&value.to_string()).unwrap();
        assert_eq!(parsed.as_str(), Some("say \"hi\"\\\n\tbell\u{7}"));
    }

    #[test]
    fn test_nested_document_is_valid_json() {
        let doc = object()
            .bool("online", true)
            .object("players", object().uint("online", 2).uint("max", 20).build())
            .strings("names", ["Alice", "Bob"])
            .fixed("tps", 19.5, 1)
            .build();

        let parsed: serde_json::Value = serde_json::from_str(&doc.to_string()).unwrap();
        assert_eq!(parsed["players"]["max"], 20);
        assert_eq!(parsed["names"][1], "Bob");
        assert_eq!(doc.get("online"), Some(&Value::Bool(true)));
    }
}
