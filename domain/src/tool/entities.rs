//! Tool domain entities

use super::arguments::json_kind;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Definition of a callable capability, described by a JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "generate_sql_and_visualization")
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// JSON schema of the parameters object
    #[serde(default = "empty_parameters")]
    pub parameters: Value,
}

fn empty_parameters() -> Value {
    json!({"type": "object", "properties": {}})
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: empty_parameters(),
        }
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = parameters;
        self
    }

    /// Build a definition from one entry of a tool document.
    ///
    /// Accepts both the plain `{name, description, parameters}` shape and the
    /// OpenAI-wrapped `{"type": "function", "function": {...}}` shape. When the
    /// entry has no `name`, `fallback_name` (the mapping key) is used.
    pub fn from_json(value: &Value, fallback_name: Option<&str>) -> Result<Self, DomainError> {
        let Value::Object(object) = value else {
            return Err(DomainError::InvalidToolDefinition(format!(
                "expected an object, found {}",
                json_kind(value)
            )));
        };

        let object = match object.get("function") {
            Some(Value::Object(inner)) if object.get("type") == Some(&json!("function")) => inner,
            _ => object,
        };

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .or(fallback_name)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                DomainError::InvalidToolDefinition("tool definition has no name".to_string())
            })?;

        let description = object
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let parameters = object
            .get("parameters")
            .cloned()
            .unwrap_or_else(empty_parameters);

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
        })
    }

    /// Names listed in the schema's `required` array, in schema order.
    pub fn required_parameters(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Declared name of a document entry, plain or function-wrapped.
    pub fn declared_name(entry: &Value) -> Option<&str> {
        entry
            .get("name")
            .or_else(|| entry.get("function").and_then(|f| f.get("name")))
            .and_then(Value::as_str)
    }

    /// Whether a top-level tool document is itself one definition rather
    /// than a `name → definition` mapping.
    ///
    /// A string `name` only appears at the top level of a definition; in a
    /// mapping it would be a key holding an object.
    pub fn is_single_definition(document: &Value) -> bool {
        let Value::Object(map) = document else {
            return false;
        };
        let plain = map.get("name").is_some_and(Value::is_string);
        let wrapped = map.get("type") == Some(&json!("function"))
            && map.get("function").is_some_and(Value::is_object);
        plain || wrapped
    }

    /// Function-style wire representation shared by the chat APIs.
    pub fn to_function_schema(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// Ordered collection of tool definitions, unique by name.
///
/// A tool set handed to one invocation is never modified during that call;
/// there are no mutating methods after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ToolSet {
    tools: Vec<ToolDefinition>,
}

impl ToolSet {
    /// Create a tool set, rejecting duplicate names.
    pub fn new(tools: Vec<ToolDefinition>) -> Result<Self, DomainError> {
        for (index, tool) in tools.iter().enumerate() {
            if tools[..index].iter().any(|t| t.name == tool.name) {
                return Err(DomainError::DuplicateTool(tool.name.clone()));
            }
        }
        Ok(Self { tools })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Convert a parsed tool document into a tool set.
    ///
    /// - a list of definitions keeps list order
    /// - a mapping of `name → definition` is ordered by key
    /// - a single definition object becomes a one-tool set
    pub fn from_document(document: &Value) -> Result<Self, DomainError> {
        match document {
            Value::Array(items) => {
                let tools = items
                    .iter()
                    .map(|item| ToolDefinition::from_json(item, None))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::new(tools)
            }
            Value::Object(_) if ToolDefinition::is_single_definition(document) => {
                Self::new(vec![ToolDefinition::from_json(document, None)?])
            }
            Value::Object(map) => {
                let tools = map
                    .iter()
                    .map(|(key, item)| ToolDefinition::from_json(item, Some(key)))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::new(tools)
            }
            other => Err(DomainError::UnsupportedToolDocument(json_kind(other))),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    /// The only tool, when the set has exactly one.
    pub fn single(&self) -> Option<&ToolDefinition> {
        match self.tools.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
