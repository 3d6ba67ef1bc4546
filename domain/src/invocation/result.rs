//! Structured invocation result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key used when a free-text answer is wrapped as a result.
pub const RESPONSE_KEY: &str = "response";

/// Flat mapping of argument name to value.
///
/// Either the arguments of the accepted tool call, or a free-text answer
/// wrapped as `{ "response": <text> }`.
///
/// # Examples
///
/// ```
/// use structcall_domain::StructuredResult;
///
/// let result = StructuredResult::text_response("42");
/// assert_eq!(result.response_text(), Some("42"));
/// assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"response":"42"}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredResult(Map<String, Value>);

impl StructuredResult {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Wrap free-text content as `{ "response": text }`.
    pub fn text_response(text: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(RESPONSE_KEY.to_string(), Value::String(text.into()));
        Self(map)
    }

    /// The wrapped free-text answer, if this is a text response.
    pub fn response_text(&self) -> Option<&str> {
        self.get_str(RESPONSE_KEY)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for StructuredResult {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<StructuredResult> for Value {
    fn from(result: StructuredResult) -> Self {
        Value::Object(result.into_map())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let Value::Object(map) = json!({"a": 2, "title": "Top customers"}) else {
            panic!("expected object");
        };
        let result = StructuredResult::from(map);
        assert_eq!(result.get_i64("a"), Some(2));
        assert_eq!(result.get_str("title"), Some("Top customers"));
        assert_eq!(result.response_text(), None);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_into_value() {
        let value: Value = StructuredResult::text_response("hi").into();
        assert_eq!(value, json!({"response": "hi"}));
    }
}
