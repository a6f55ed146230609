//! Raw transaction record
//!
//! A mapping from field name to raw JSON value. Fields that are not part of
//! the schema are carried along and ignored by the encoder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;
use crate::logic::schema::FieldSpec;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction {
    fields: BTreeMap<String, Value>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Present and not null
    fn required(&self, spec: &FieldSpec) -> Result<&Value, SchemaError> {
        match self.fields.get(&spec.name) {
            None | Some(Value::Null) => Err(SchemaError::MissingField(spec.name.clone())),
            Some(value) => Ok(value),
        }
    }

    /// Numeric field value, range checked
    pub fn numeric(&self, spec: &FieldSpec) -> Result<f64, SchemaError> {
        let value = self.required(spec)?;
        let number = value.as_f64().ok_or_else(|| SchemaError::WrongType {
            field: spec.name.clone(),
            expected: "number",
            actual: json_type_name(value).to_string(),
        })?;
        spec.check_range(number)?;
        Ok(number)
    }

    /// Categorical field value; any string is accepted
    pub fn categorical(&self, spec: &FieldSpec) -> Result<&str, SchemaError> {
        let value = self.required(spec)?;
        value.as_str().ok_or_else(|| SchemaError::WrongType {
            field: spec.name.clone(),
            expected: "string",
            actual: json_type_name(value).to_string(),
        })
    }
}

impl FromIterator<(String, Value)> for Transaction {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl From<serde_json::Map<String, Value>> for Transaction {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_accessor() {
        let spec = FieldSpec::numeric("amount").with_min(0.0);
        let tx = Transaction::new().with("amount", 12.5);
        assert_eq!(tx.numeric(&spec), Ok(12.5));

        let tx = Transaction::new().with("amount", "12.5");
        assert!(matches!(
            tx.numeric(&spec),
            Err(SchemaError::WrongType { expected: "number", .. })
        ));

        let tx = Transaction::new().with("amount", -1.0);
        assert!(matches!(tx.numeric(&spec), Err(SchemaError::OutOfRange { .. })));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let spec = FieldSpec::categorical("device", ["mobile"]);
        let tx = Transaction::new().with("device", Value::Null);
        assert_eq!(
            tx.categorical(&spec),
            Err(SchemaError::MissingField("device".into()))
        );
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let tx: Transaction =
            serde_json::from_str(r#"{"amount": 9000, "merchant_category": "electronics", "extra": [1]}"#)
                .unwrap();
        assert_eq!(tx.len(), 3);
        assert_eq!(tx.get("amount").and_then(Value::as_f64), Some(9000.0));
    }
}
