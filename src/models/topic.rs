use serde_json::{Map, Value};
use std::fmt;

/// A single topic field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl FieldValue {
    pub fn empty() -> Self {
        FieldValue::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }

    /// Convert a JSON value. Returns the value plus whether a lossy
    /// conversion happened (null, arrays and objects).
    pub fn from_json(value: &Value) -> (Self, bool) {
        match value {
            Value::String(s) => (FieldValue::Text(s.clone()), false),
            Value::Bool(b) => (FieldValue::Bool(*b), false),
            Value::Number(n) => match n.as_i64() {
                Some(i) => (FieldValue::Integer(i), false),
                None => (FieldValue::Float(n.as_f64().unwrap_or_default()), false),
            },
            Value::Null => (FieldValue::empty(), true),
            other => (FieldValue::Text(other.to_string()), true),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Bool(b) => Value::Bool(*b),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// What is happening to a topic, for computed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicAction {
    Create,
    Edit,
}

/// A topic record: an integer ID plus field values in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Topic {
    pub id: i64,
    pub fields: Vec<(String, FieldValue)>,
}

impl Topic {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            fields: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Set a field, keeping its position if it already exists.
    pub fn set(&mut self, name: &str, value: FieldValue) {
        match self.fields.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    /// Display text for a field; missing fields render empty.
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(|v| v.to_string()).unwrap_or_default()
    }

    /// JSON object with `id` first.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(self.id));
        for (name, value) in &self.fields {
            if name != "id" {
                map.insert(name.clone(), value.to_json());
            }
        }
        Value::Object(map)
    }
}
