//! JSON builder utilities

use super::Value;

/// Object builder for JSON
#[derive(Debug, Default)]
pub struct ObjectBuilder {
    fields: Vec<(String, Value)>,
}

impl ObjectBuilder {
    /// Create a new object builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing an earlier one with the same key in place
    fn insert(mut self, key: &str, value: Value) -> Self {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key.to_string(), value)),
        }
        self
    }

    /// Add a string field
    pub fn string(self, key: &str, value: &str) -> Self {
        self.insert(key, Value::String(value.to_string()))
    }

    /// Add a string field only when present
    pub fn opt_string(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.string(key, value),
            None => self,
        }
    }

    /// Add a signed integer field
    pub fn int(self, key: &str, value: i64) -> Self {
        self.insert(key, Value::Int(value))
    }

    /// Add an unsigned integer field
    pub fn uint(self, key: &str, value: u64) -> Self {
        self.insert(key, Value::Uint(value))
    }

    /// Add an unsigned integer field only when present
    pub fn opt_uint(self, key: &str, value: Option<u64>) -> Self {
        match value {
            Some(value) => self.uint(key, value),
            None => self,
        }
    }

    /// Add a fixed-point number field rendered with `precision` decimals
    pub fn fixed(self, key: &str, value: f64, precision: u8) -> Self {
        self.insert(key, Value::Fixed(value, precision))
    }

    /// Add a boolean field
    pub fn bool(self, key: &str, value: bool) -> Self {
        self.insert(key, Value::Bool(value))
    }

    /// Add an object field
    pub fn object(self, key: &str, value: Value) -> Self {
        self.insert(key, value)
    }

    /// Add an array field
    pub fn array(self, key: &str, value: Vec<Value>) -> Self {
        self.insert(key, Value::Array(value))
    }

    /// Add an array of strings
    pub fn strings<I, S>(self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items = values.into_iter().map(|s| string(s.as_ref())).collect();
        self.array(key, items)
    }

    /// Build the final value
    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Create a JSON object
pub fn object() -> ObjectBuilder {
    ObjectBuilder::new()
}

/// Create a JSON array
pub fn array(items: Vec<Value>) -> Value {
    Value::Array(items)
}

/// Create a JSON string
pub fn string(s: &str) -> Value {
    Value::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted() {
        let value = object()
            .opt_string("motd", None)
            .opt_uint("cpu_cores", Some(8))
            .opt_uint("view_distance", None)
            .build();

        assert_eq!(value.to_string(), r#"{"cpu_cores":8}"#);
    }

    #[test]
    fn test_duplicate_key_replaces_in_place() {
        let value = object().uint("a", 1).uint("b", 2).uint("a", 3).build();
        assert_eq!(value.to_string(), r#"{"a":3,"b":2}"#);
    }
}
