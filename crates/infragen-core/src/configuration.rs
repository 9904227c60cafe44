//! User-supplied Configuration object
//!
//! A flat mapping of camelCase field names to scalar values, exactly as the
//! wizard submits it. A field is *present* only when it holds a non-empty
//! value: `null`, `false`, `0` and `""` are all treated as unset, which is
//! what an untouched form input turns into.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    fields: Map<String, Value>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// The field's value if it is present (see module docs)
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|value| is_set(value))
    }

    pub fn is_present(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The field's value, copied verbatim, or `Null` when absent
    pub fn value(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or(Value::Null)
    }

    /// The field's value, or `default` when absent
    pub fn value_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.get(key).cloned().unwrap_or_else(|| default.into())
    }

    /// Text form of a field for interpolation into strings
    pub fn text(&self, key: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    pub fn service_type(&self) -> Option<&Value> {
        self.get("serviceType")
    }

    pub fn app_name(&self) -> Option<&Value> {
        self.get("appName")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl From<Map<String, Value>> for Configuration {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

pub(crate) fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
