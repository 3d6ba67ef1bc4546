//! Console output formatter for invocation results

use colored::Colorize;
use serde::Serialize;
use serde_json::{Value, json};
use structcall_application::{AnswerQuestionOutput, ResourceInfo, ResourceKindInfo};
use structcall_domain::{OutputFormat, StructuredResult};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format an `ask` result in the requested format
    pub fn format_answer(output: &AnswerQuestionOutput, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::format_json(output),
            OutputFormat::Text => Self::format_answer_text(output),
        }
    }

    /// Format a `chat` reply in the requested format
    pub fn format_reply(reply: &str, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::format_json(&json!({ "response": reply })),
            OutputFormat::Text => reply.to_string(),
        }
    }

    /// Format the resource listing in the requested format
    pub fn format_resources(info: &ResourceInfo, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::format_json(info),
            OutputFormat::Text => {
                let mut output = String::new();
                output.push_str(&Self::kind_section("Prompts", &info.prompts));
                output.push('\n');
                output.push_str(&Self::kind_section("Tools", &info.tools));
                output
            }
        }
    }

    /// Format as JSON
    pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_answer_text(output: &AnswerQuestionOutput) -> String {
        let mut text = String::new();

        if let Some(reply) = output.result.response_text()
            && output.result.len() == 1
        {
            text.push_str(reply);
            text.push('\n');
            return text;
        }

        if let Some(tool) = &output.tool {
            text.push_str(&format!("{} {}\n\n", "Tool:".cyan().bold(), tool));
        }
        text.push_str(&Self::format_result(&output.result));
        text
    }

    /// `key: value` lines; multi-line values are indented under their key
    pub fn format_result(result: &StructuredResult) -> String {
        let mut output = String::new();
        for (key, value) in result.iter() {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => serde_json::to_string_pretty(other).unwrap_or_default(),
            };
            if rendered.contains('\n') {
                output.push_str(&format!("{}\n", format!("{}:", key).bold()));
                output.push_str(&Self::indent(&rendered, "  "));
                output.push('\n');
            } else {
                output.push_str(&format!("{} {}\n", format!("{}:", key).bold(), rendered));
            }
        }
        output
    }

    fn kind_section(title: &str, info: &ResourceKindInfo) -> String {
        let mut output = format!(
            "{} {} ({} cached)\n",
            format!("{}:", title).cyan().bold(),
            info.directory.display(),
            info.cached
        );
        if info.available.is_empty() {
            output.push_str(&format!("  {}\n", "(none)".dimmed()));
        }
        for name in &info.available {
            output.push_str(&format!("  * {}\n", name));
        }
        output
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use std::path::PathBuf;

    fn plain() {
        colored::control::set_override(false);
    }

    fn sql_output() -> AnswerQuestionOutput {
        let mut map = Map::new();
        map.insert("query".to_string(), json!("SELECT region,\n  SUM(amount)\nFROM sales"));
        map.insert("chart".to_string(), json!("bar"));
        AnswerQuestionOutput {
            tool: Some("generate_sql_query".to_string()),
            result: StructuredResult::new(map),
        }
    }

    #[test]
    fn test_answer_text_lists_fields() {
        plain();
        let text = ConsoleFormatter::format_answer(&sql_output(), OutputFormat::Text);
        assert!(text.starts_with("Tool: generate_sql_query\n\n"));
        assert!(text.contains("chart: bar\n"));
        assert!(text.contains("query:\n  SELECT region,\n    SUM(amount)\n  FROM sales"));
    }

    #[test]
    fn test_answer_json_is_parseable() {
        let text = ConsoleFormatter::format_answer(&sql_output(), OutputFormat::Json);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["tool"], "generate_sql_query");
        assert_eq!(value["result"]["chart"], "bar");
    }

    #[test]
    fn test_text_fallback_prints_bare_reply() {
        plain();
        let output = AnswerQuestionOutput {
            tool: Some("insights".to_string()),
            result: StructuredResult::text_response("No trend found."),
        };
        assert_eq!(
            ConsoleFormatter::format_answer(&output, OutputFormat::Text),
            "No trend found.\n"
        );
    }

    #[test]
    fn test_reply_formats() {
        assert_eq!(ConsoleFormatter::format_reply("hi", OutputFormat::Text), "hi");
        let json = ConsoleFormatter::format_reply("hi", OutputFormat::Json);
        assert_eq!(serde_json::from_str::<Value>(&json).unwrap()["response"], "hi");
    }

    #[test]
    fn test_resources_text() {
        plain();
        let info = ResourceInfo {
            prompts: ResourceKindInfo {
                available: vec!["analyst.txt".to_string()],
                cached: 1,
                directory: PathBuf::from("agents/prompts"),
            },
            tools: ResourceKindInfo {
                available: vec![],
                cached: 0,
                directory: PathBuf::from("agents/tools"),
            },
        };
        let text = ConsoleFormatter::format_resources(&info, OutputFormat::Text);
        assert!(text.contains("Prompts: agents/prompts (1 cached)\n  * analyst.txt\n"));
        assert!(text.contains("Tools: agents/tools (0 cached)\n  (none)\n"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
