use std::fmt;

use im::HashMap;
use serde::{Deserialize, Serialize};

/// Represents a value produced by evaluating an expression.
///
/// # Examples
///
/// ```rust
/// use templex::value::Value;
/// let n = Value::Number(3.0);
/// assert_eq!(n.type_name(), "Number");
/// assert_eq!(n.to_string(), "3");
/// assert_eq!(Value::Nil.to_template_string(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
}

impl Value {
    /// Returns the type name of the value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
        }
    }

    /// The text this value contributes to a composite template: `Nil` contributes
    /// nothing, everything else its display form.
    pub fn to_template_string(&self) -> String {
        match self {
            Value::Nil => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                let mut keys: Vec<_> = map.keys().collect();
                keys.sort();
                write!(f, "{{")?;
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}={}", map[key])?;
                }
                write!(f, "}}")
            }
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

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-4.0).to_string(), "-4");
        let list = Value::List(vec![Value::from("a"), Value::Nil, Value::from(true)]);
        assert_eq!(list.to_string(), "[a, null, true]");
        let map = Value::Map(HashMap::unit("k".to_string(), Value::Number(1.0)));
        assert_eq!(map.to_string(), "{k=1}");
    }

    #[test]
    fn test_nil_contributes_nothing() {
        assert_eq!(Value::Nil.to_template_string(), "");
        assert_eq!(Value::from("x").to_template_string(), "x");
    }

    #[test]
    fn test_from_json() {
        let value: Value = serde_json::from_str(r#"{"user": {"name": "Ada", "tags": [1, null]}}"#).unwrap();
        let Value::Map(root) = value else {
            panic!("expected a map");
        };
        let Value::Map(user) = &root["user"] else {
            panic!("expected a nested map");
        };
        assert_eq!(user["name"], Value::from("Ada"));
        assert_eq!(user["tags"], Value::List(vec![Value::Number(1.0), Value::Nil]));
    }
}
