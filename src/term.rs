//! Scalar term values and the default-field sentinel

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Pseudo-field targeted when a match is built from a bare term
pub const ALL_FIELD: &str = "_all";

/// Scalar value matched against a field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TermValue {
    /// String term
    String(String),
    /// 64-bit integer
    Long(i64),
    /// 64-bit floating point
    Double(f64),
    /// Boolean
    Bool(bool),
}

impl TermValue {
    /// Extract a scalar term from a JSON value
    ///
    /// Returns `None` for arrays, objects, and null; the caller decides
    /// whether that is an error or a no-op.
    pub fn from_json(value: &Value) -> Option<TermValue> {
        match value {
            Value::String(s) => Some(TermValue::String(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(TermValue::Long(i))
                } else {
                    n.as_f64().map(TermValue::Double)
                }
            }
            Value::Bool(b) => Some(TermValue::Bool(*b)),
            _ => None,
        }
    }

    /// String form if this is a string term
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TermValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// JSON form used when the term is emitted on its own
    pub fn to_json(&self) -> Value {
        match self {
            TermValue::String(s) => Value::String(s.clone()),
            TermValue::Long(v) => Value::from(*v),
            TermValue::Double(v) => Value::from(*v),
            TermValue::Bool(v) => Value::Bool(*v),
        }
    }
}

impl fmt::Display for TermValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermValue::String(s) => f.write_str(s),
            TermValue::Long(v) => write!(f, "{}", v),
            TermValue::Double(v) => write!(f, "{}", v),
            TermValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for TermValue {
    fn from(s: &str) -> Self {
        TermValue::String(s.to_string())
    }
}

impl From<String> for TermValue {
    fn from(s: String) -> Self {
        TermValue::String(s)
    }
}

impl From<i64> for TermValue {
    fn from(v: i64) -> Self {
        TermValue::Long(v)
    }
}

impl From<f64> for TermValue {
    fn from(v: f64) -> Self {
        TermValue::Double(v)
    }
}

impl From<bool> for TermValue {
    fn from(v: bool) -> Self {
        TermValue::Bool(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(
            TermValue::from_json(&json!("rust")),
            Some(TermValue::String("rust".to_string()))
        );
        assert_eq!(TermValue::from_json(&json!(42)), Some(TermValue::Long(42)));
        assert_eq!(
            TermValue::from_json(&json!(3.5)),
            Some(TermValue::Double(3.5))
        );
        assert_eq!(
            TermValue::from_json(&json!(true)),
            Some(TermValue::Bool(true))
        );
    }

    #[test]
    fn test_from_json_rejects_containers() {
        assert_eq!(TermValue::from_json(&json!(null)), None);
        assert_eq!(TermValue::from_json(&json!([1, 2])), None);
        assert_eq!(TermValue::from_json(&json!({ "a": 1 })), None);
    }

    #[test]
    fn test_as_str_on_string_terms_only() {
        assert_eq!(TermValue::from("rust").as_str(), Some("rust"));
        assert_eq!(TermValue::from(42i64).as_str(), None);
        assert_eq!(TermValue::from(true).as_str(), None);
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(TermValue::from("rust").to_string(), "rust");
        assert_eq!(TermValue::from(42i64).to_string(), "42");
        assert_eq!(TermValue::from(1.5).to_string(), "1.5");
        assert_eq!(TermValue::from(false).to_string(), "false");
    }

    #[test]
    fn test_to_json_round_trip() {
        let term = TermValue::from(42i64);
        assert_eq!(term.to_json(), json!(42));
        assert_eq!(TermValue::from("x").to_json(), json!("x"));
    }

    #[test]
    fn test_untagged_serde() {
        let term: TermValue = serde_json::from_value(json!("hello")).unwrap();
        assert_eq!(term, TermValue::String("hello".to_string()));
        assert_eq!(serde_json::to_value(&term).unwrap(), json!("hello"));
    }
}
