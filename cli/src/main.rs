//! CLI entrypoint for structcall
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use std::future::Future;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use structcall_application::{
    AnswerQuestionInput, AnswerQuestionUseCase, ConversationLogger, InvocationEngine,
    InvocationProgress, NoConversationLogger, NoInvocationProgress, ResourceStorePort,
};
use structcall_domain::OutputFormat;
use structcall_infrastructure::{
    AgentResources, ConfigLoader, FileConfig, JsonlConversationLogger, build_gateway,
};
use structcall_presentation::{
    AskArgs, ChatArgs, Cli, Command, ConsoleFormatter, SimpleProgress, SpinnerProgress,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CHAT_SYSTEM: &str = "You are a helpful assistant.";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = load_config(&cli)?;

    let Some(command) = cli.command.as_ref() else {
        bail!("No command given. Run `structcall --help` for usage.");
    };

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();
    if !config.output.color || format == OutputFormat::Json {
        colored::control::set_override(false);
    }

    info!("Starting structcall");

    // === Dependency Injection ===
    let resources = Arc::new(AgentResources::open(
        config.resources.root_dir(),
        &config.resources.prompts_dir,
        &config.resources.tools_dir,
    )?);

    let output = match command {
        Command::Resources => ConsoleFormatter::format_resources(&resources.info(), format),
        Command::Ask(args) => {
            let engine = build_engine(&cli, &config, "ask")?;
            let work = ask(args, resources, engine, format);
            run_bounded(work, cli.timeout.map(Duration::from_secs)).await?
        }
        Command::Chat(args) => {
            let engine = build_engine(&cli, &config, "chat")?;
            let work = chat(args, resources, engine, format);
            run_bounded(work, cli.timeout.map(Duration::from_secs)).await?
        }
    };

    println!("{}", output.trim_end());

    Ok(())
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            error!("{}", issue.message);
        } else {
            warn!("{}", issue.message);
        }
    }
    let errors = issues.iter().filter(|issue| issue.is_error()).count();
    if errors > 0 {
        bail!("Invalid configuration ({} error(s))", errors);
    }

    Ok(config)
}

fn build_engine(cli: &Cli, config: &FileConfig, label: &str) -> Result<InvocationEngine> {
    let (mut settings, _) = config.backend.to_settings();
    if let Some(model) = &cli.model {
        settings.model = model.clone();
    }
    let gateway = build_gateway(&settings)?;
    let (params, _) = config.invocation.to_params();

    let progress: Arc<dyn InvocationProgress> = if cli.quiet || !config.output.show_progress {
        Arc::new(NoInvocationProgress)
    } else if std::io::stderr().is_terminal() {
        Arc::new(SpinnerProgress::new(label))
    } else {
        Arc::new(SimpleProgress)
    };

    let logger: Arc<dyn ConversationLogger> = match &config.logging.conversation_log {
        Some(path) => match JsonlConversationLogger::open(path) {
            Some(logger) => Arc::new(logger),
            None => {
                warn!(
                    "Conversation log {} unavailable, continuing without it",
                    path.display()
                );
                Arc::new(NoConversationLogger)
            }
        },
        None => Arc::new(NoConversationLogger),
    };

    Ok(InvocationEngine::new(gateway, params)
        .with_progress(progress)
        .with_conversation_logger(logger))
}

async fn ask(
    args: &AskArgs,
    resources: Arc<AgentResources>,
    engine: InvocationEngine,
    format: OutputFormat,
) -> Result<String> {
    let mut input = AnswerQuestionInput::new(&args.question, &args.prompt, &args.tools)
        .with_tool_choice(args.tool_choice.clone());
    if let Some(tool) = &args.tool {
        input = input.with_tool_name(tool);
    }
    for (label, text) in &args.context {
        input = input.with_context(label, text);
    }

    let output = AnswerQuestionUseCase::new(resources, engine)
        .execute(input)
        .await?;
    Ok(ConsoleFormatter::format_answer(&output, format))
}

async fn chat(
    args: &ChatArgs,
    resources: Arc<AgentResources>,
    engine: InvocationEngine,
    format: OutputFormat,
) -> Result<String> {
    let system = match (&args.system, &args.prompt) {
        (Some(system), _) => system.clone(),
        (None, Some(file)) => resources.load_prompt(file, true)?,
        (None, None) => DEFAULT_CHAT_SYSTEM.to_string(),
    };

    let reply = engine.invoke_simple(&system, &args.message, &[]).await?;
    Ok(ConsoleFormatter::format_reply(&reply, format))
}

/// Run `work` under the optional overall timeout, aborting on Ctrl-C.
async fn run_bounded<T>(
    work: impl Future<Output = Result<T>>,
    limit: Option<Duration>,
) -> Result<T> {
    let bounded = async {
        match limit {
            Some(limit) => tokio::time::timeout(limit, work)
                .await
                .map_err(|_| anyhow!("Timed out after {}s", limit.as_secs()))?,
            None => work.await,
        }
    };

    tokio::select! {
        result = bounded => result,
        _ = tokio::signal::ctrl_c() => bail!("Interrupted"),
    }
}
