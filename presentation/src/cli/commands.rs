//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use structcall_domain::{OutputFormat, ToolChoice};

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// `key: value` listing
    Text,
    /// Pretty-printed JSON
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for structcall
#[derive(Parser, Debug)]
#[command(name = "structcall")]
#[command(author, version, about = "Structured answers from a language model via tool calls")]
#[command(long_about = r#"
structcall asks a language model a question and returns the arguments of the
tool call it makes, retrying when the model answers without calling a tool.

Prompts are read from <root>/agents/prompts/*.txt and tool schemas from
<root>/agents/tools/*.json unless configured otherwise.

Configuration files are loaded from (in priority order):
1. STRUCTCALL_* environment variables (e.g. STRUCTCALL_BACKEND__MODEL)
2. --config <path>        Explicit config file
3. ./structcall.toml      Project-level config
4. ~/.config/structcall/config.toml   Global config

Example:
  structcall ask --prompt analyst.txt --tools sql_tools.json "Total sales by region?"
  structcall ask --tools insight.json --tool-choice auto "Any trends worth noting?"
  structcall chat --system "Answer briefly." "What is a CTE?"
  structcall resources
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (defaults to the config file, then text)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormatArg>,

    /// Override the configured model
    #[arg(short, long, value_name = "MODEL", global = true)]
    pub model: Option<String>,

    /// Overall timeout in seconds for one command
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer a question through a prompt and a tools file
    Ask(AskArgs),
    /// Send one message and print the plain text reply
    Chat(ChatArgs),
    /// List prompt and tool files and cache state
    Resources,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to answer
    pub question: String,

    /// System prompt file under the prompts directory
    #[arg(short, long, value_name = "FILE")]
    pub prompt: String,

    /// Tool schema file under the tools directory
    #[arg(short, long, value_name = "FILE")]
    pub tools: String,

    /// Tool to name in the instruction (defaults to the only tool in the file)
    #[arg(long, value_name = "NAME")]
    pub tool: Option<String>,

    /// `required`, `auto`, or a tool name
    #[arg(long, value_name = "CHOICE", default_value = "required")]
    pub tool_choice: ToolChoice,

    /// Extra context section as LABEL=TEXT (repeatable)
    #[arg(long, value_name = "LABEL=TEXT", value_parser = parse_context)]
    pub context: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// The message to send
    pub message: String,

    /// Inline system prompt
    #[arg(short, long, conflicts_with = "prompt")]
    pub system: Option<String>,

    /// System prompt file under the prompts directory
    #[arg(short, long, value_name = "FILE")]
    pub prompt: Option<String>,
}

fn parse_context(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((label, text)) if !label.trim().is_empty() => {
            Ok((label.trim().to_string(), text.to_string()))
        }
        _ => Err(format!("expected LABEL=TEXT, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from([
            "structcall",
            "ask",
            "--prompt",
            "analyst.txt",
            "--tools",
            "sql_tools.json",
            "--tool-choice",
            "generate_sql_query",
            "--context",
            "Schema=sales(region, amount)",
            "-o",
            "json",
            "Total sales?",
        ]);
        let Some(Command::Ask(args)) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(args.question, "Total sales?");
        assert_eq!(args.tool_choice, ToolChoice::tool("generate_sql_query"));
        assert_eq!(
            args.context,
            vec![("Schema".to_string(), "sales(region, amount)".to_string())]
        );
        assert_eq!(cli.output, Some(OutputFormatArg::Json));
    }

    #[test]
    fn test_tool_choice_defaults_to_required() {
        let cli = Cli::parse_from(["structcall", "ask", "-p", "a.txt", "-t", "b.json", "q"]);
        let Some(Command::Ask(args)) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(args.tool_choice, ToolChoice::Required);
        assert!(args.context.is_empty());
    }

    #[test]
    fn test_chat_system_conflicts_with_prompt() {
        let result = Cli::try_parse_from([
            "structcall", "chat", "--system", "s", "--prompt", "p.txt", "hi",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["structcall", "resources", "-vv", "--no-config"]);
        assert!(matches!(cli.command, Some(Command::Resources)));
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_config);
    }

    #[test]
    fn test_parse_context_rejects_missing_label() {
        assert!(parse_context("=text").is_err());
        assert!(parse_context("no separator").is_err());
        assert_eq!(
            parse_context("Notes=a=b").unwrap(),
            ("Notes".to_string(), "a=b".to_string())
        );
    }
}
