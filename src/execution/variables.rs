use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

/// A loosely typed variable value as supplied with a request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum VariableValue {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<VariableValue>),
    Object(IndexMap<String, VariableValue>),
}

/// Variables of one request, in the order they were supplied.
pub type Variables = IndexMap<String, VariableValue>;

/// Reads the `variables` object of a request body.
pub fn variables_from_json(input: &str) -> Result<Variables, serde_json::Error> {
    serde_json::from_str(input)
}

impl VariableValue {
    pub fn is_null(&self) -> bool {
        matches!(self, VariableValue::Null)
    }
}

impl From<serde_json::Value> for VariableValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => VariableValue::Null,
            serde_json::Value::Bool(b) => VariableValue::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => VariableValue::Int(i),
                None => VariableValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => VariableValue::String(s),
            serde_json::Value::Array(items) => {
                VariableValue::List(items.into_iter().map(VariableValue::from).collect())
            }
            serde_json::Value::Object(fields) => VariableValue::Object(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, VariableValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&VariableValue> for serde_json::Value {
    fn from(value: &VariableValue) -> Self {
        match value {
            VariableValue::Null => serde_json::Value::Null,
            VariableValue::Boolean(b) => serde_json::Value::Bool(*b),
            VariableValue::Int(i) => serde_json::Value::from(*i),
            VariableValue::Float(f) => serde_json::Value::from(*f),
            VariableValue::String(s) => serde_json::Value::String(s.clone()),
            VariableValue::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            VariableValue::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::Value::from(self))
    }
}

#[test]
fn reads_variables_from_json() {
    let variables = variables_from_json(r#"{"p": {"x": 1, "y": 2.5}, "tags": ["a", null]}"#)
        .expect("invalid json");

    assert_eq!(variables.len(), 2);
    assert_eq!(
        variables["p"],
        VariableValue::Object(IndexMap::from([
            ("x".to_string(), VariableValue::Int(1)),
            ("y".to_string(), VariableValue::Float(2.5)),
        ]))
    );
    assert_eq!(
        variables["tags"],
        VariableValue::List(vec![
            VariableValue::String("a".to_string()),
            VariableValue::Null
        ])
    );
    assert_eq!(variables["p"].to_string(), r#"{"x":1,"y":2.5}"#);
}

#[test]
fn rejects_non_object_payload() {
    assert!(variables_from_json("[1, 2]").is_err());
}
