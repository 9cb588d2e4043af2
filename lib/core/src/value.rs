use serde::{Deserialize, Serialize};
use std::fmt;

/// Tokens read as a missing cell, following the usual dataframe conventions.
pub const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
];

/// A single table cell with an explicit type tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view of the cell. Booleans count as 0/1, text has none.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(_) | Value::Missing => None,
        }
    }

    /// The category this cell falls into when its column is categorical.
    /// Missing cells have no category.
    pub fn category_key(&self) -> Option<String> {
        match self {
            Value::Missing => None,
            Value::Text(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn is_missing_token(raw: &str) -> bool {
        MISSING_TOKENS.contains(&raw.trim())
    }

    /// Parse a boolean literal in any of the spellings a CSV export produces
    pub fn parse_bool(raw: &str) -> Option<bool> {
        match raw.trim() {
            "True" | "true" | "TRUE" => Some(true),
            "False" | "false" | "FALSE" => Some(false),
            _ => None,
        }
    }

    pub fn parse_number(raw: &str) -> Option<f64> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok()
    }

    /// Convert a JSON value into a cell. Nested values are kept as their JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Missing,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Missing),
            serde_json::Value::String(s) => Value::Text(s.clone()),
            other => Value::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Number(n) => fmt_number(*n, f),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Plain notation for everyday magnitudes, scientific outside them so that
/// very large or small numbers do not expand into hundreds of digits.
fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let magnitude = n.abs();
    if n.is_finite() && n != 0.0 && !(1e-6..1e16).contains(&magnitude) {
        write!(f, "{:e}", n)
    } else {
        write!(f, "{}", n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_key() {
        assert_eq!(Value::from("GET").category_key(), Some("GET".to_string()));
        assert_eq!(Value::from(80i64).category_key(), Some("80".to_string()));
        assert_eq!(Value::from(0.5).category_key(), Some("0.5".to_string()));
        assert_eq!(Value::from(true).category_key(), Some("True".to_string()));
        assert_eq!(Value::Missing.category_key(), None);
    }

    #[test]
    fn test_numeric_view() {
        assert_eq!(Value::from(3.5).as_f64(), Some(3.5));
        assert_eq!(Value::from(false).as_f64(), Some(0.0));
        assert_eq!(Value::from("x").as_f64(), None);
        assert_eq!(Value::Missing.as_f64(), None);
    }

    #[test]
    fn test_parsers() {
        assert!(Value::is_missing_token(""));
        assert!(Value::is_missing_token("NaN"));
        assert!(!Value::is_missing_token("0"));
        assert_eq!(Value::parse_bool("TRUE"), Some(true));
        assert_eq!(Value::parse_bool("yes"), None);
        assert_eq!(Value::parse_number(" 42 "), Some(42.0));
        assert_eq!(Value::parse_number("1.1.1.1"), None);
    }

    #[test]
    fn test_from_json() {
        let v = serde_json::json!({"a": 1, "b": "x", "c": null, "d": true});
        assert_eq!(Value::from_json(&v["a"]), Value::Number(1.0));
        assert_eq!(Value::from_json(&v["b"]), Value::Text("x".to_string()));
        assert_eq!(Value::from_json(&v["c"]), Value::Missing);
        assert_eq!(Value::from_json(&v["d"]), Value::Bool(true));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(120i64).to_string(), "120");
        assert_eq!(Value::from(12.25).to_string(), "12.25");
        assert_eq!(Value::Missing.to_string(), "");
    }

    #[test]
    fn test_display_extreme_magnitudes() {
        assert_eq!(Value::from(1e15).to_string(), "1000000000000000");
        assert_eq!(Value::from(1e200).to_string(), "1e200");
        assert_eq!(Value::from(-1e200).to_string(), "-1e200");
        assert_eq!(Value::from(2.5e-9).to_string(), "2.5e-9");
        assert_eq!(Value::from(0.0).to_string(), "0");

        for n in [1e200, -3.75e-12, 123456789012345680000.0] {
            let text = Value::from(n).to_string();
            assert_eq!(Value::parse_number(&text), Some(n), "{}", text);
        }
    }
}
