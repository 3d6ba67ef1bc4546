//! Response parser: normalizes tool-call argument payloads.
//!
//! | Payload | Result |
//! |---------|--------|
//! | mapping | accepted as-is |
//! | string holding a JSON object | decoded mapping |
//! | string that is not JSON, or JSON that is not an object | [`ArgumentParseError`] |
//! | any other JSON value | [`ArgumentParseError`] |
//!
//! The parser never returns the unparsed string form.

use super::result::StructuredResult;
use crate::session::response::ProposedToolCall;
use crate::tool::arguments::{ArgumentParseError, ToolArguments, json_kind};
use serde_json::Value;

/// Extracts a [`StructuredResult`] from a proposed tool call.
pub struct ResponseParser;

impl ResponseParser {
    /// Normalize the argument payload of `call`.
    pub fn parse_arguments(call: &ProposedToolCall) -> Result<StructuredResult, ArgumentParseError> {
        Self::parse_payload(&call.name, &call.arguments)
    }

    /// Normalize a raw payload for the tool named `tool`.
    pub fn parse_payload(
        tool: &str,
        arguments: &ToolArguments,
    ) -> Result<StructuredResult, ArgumentParseError> {
        match arguments {
            ToolArguments::Mapping(map) => Ok(StructuredResult::new(map.clone())),
            ToolArguments::Encoded(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => Ok(StructuredResult::new(map)),
                Ok(other) => Err(ArgumentParseError::new(
                    tool,
                    format!("expected a JSON object, found {}", json_kind(&other)),
                )),
                Err(e) => Err(ArgumentParseError::new(tool, e.to_string())),
            },
            ToolArguments::Other(value) => Err(ArgumentParseError::new(
                tool,
                format!("expected a mapping or JSON string, found {}", json_kind(value)),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(arguments: ToolArguments) -> ProposedToolCall {
        ProposedToolCall::new("sum_tool", arguments)
    }

    #[test]
    fn mapping_is_accepted_as_is() {
        let result = ResponseParser::parse_arguments(&call(json!({"a": 2, "b": 3}).into())).unwrap();
        assert_eq!(result.get_i64("a"), Some(2));
        assert_eq!(result.get_i64("b"), Some(3));
    }

    #[test]
    fn encoded_object_is_decoded() {
        let result =
            ResponseParser::parse_arguments(&call(ToolArguments::Encoded(r#"{"a":2,"b":3}"#.into())))
                .unwrap();
        assert_eq!(result.get_i64("b"), Some(3));
    }

    #[test]
    fn malformed_string_fails() {
        let err = ResponseParser::parse_arguments(&call(ToolArguments::Encoded("{bad json".into())))
            .unwrap_err();
        assert_eq!(err.tool, "sum_tool");
    }

    #[test]
    fn encoded_non_object_fails() {
        let err = ResponseParser::parse_arguments(&call(ToolArguments::Encoded("[1,2]".into())))
            .unwrap_err();
        assert!(err.reason.contains("array"));
    }

    #[test]
    fn other_values_fail() {
        let err = ResponseParser::parse_arguments(&call(ToolArguments::Other(json!(null)))).unwrap_err();
        assert!(err.reason.contains("null"));
    }

    #[test]
    fn default_payload_is_empty_mapping() {
        let result = ResponseParser::parse_arguments(&call(ToolArguments::default())).unwrap();
        assert!(result.is_empty());
    }
}
