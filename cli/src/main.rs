//! CLI entrypoint for deckhand
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use deckhand_application::{
    ContextLoaderPort, ToolExecutorPort, ToolUseAgent, agent_event_channel,
};
use deckhand_domain::AgentPromptTemplate;
use deckhand_infrastructure::{
    AnthropicGateway, ConfigLoader, FileConfig, JsonSchemaToolConverter, LocalContextLoader,
    ToolRegistry,
};
use deckhand_presentation::{
    ChatRepl, Cli, Command, EventRenderer, InteractiveConfirmation, SessionEnd,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Log file prefix inside `[logging] dir`
const LOG_FILE_PREFIX: &str = "deckhand.log";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::new()
            .load(cli.config.as_deref())
            .context("Failed to load configuration")?
    };

    // Dropping the guard flushes the file writer
    let log_dir = config.logging.resolved_dir();
    let _guard = init_logging(&cli, log_dir.as_deref())?;

    info!("Starting deckhand");

    match &cli.command {
        Command::Chat { model, usage } => {
            run_chat(&config, model.as_deref(), *usage, log_dir.is_some()).await
        }
    }
}

/// `-v` sets the level; without it `RUST_LOG` is honoured, then `warn`.
fn init_logging(cli: &Cli, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = if cli.verbose > 0 {
        EnvFilter::new(cli.log_level())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()))
    };

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
            Ok(None)
        }
    }
}

async fn run_chat(
    config: &FileConfig,
    model_override: Option<&str>,
    show_usage: bool,
    logging_to_file: bool,
) -> Result<ExitCode> {
    let (agent_config, warning) = config.agent.to_agent_config(model_override);
    // Already on stderr through tracing unless logs go to a file
    if let Some(warning) = warning
        && logging_to_file
    {
        eprintln!("Warning: {}", warning);
    }
    let model = agent_config.model;

    let working_dir = std::env::current_dir().context("Failed to resolve working directory")?;

    // === Dependency Injection ===
    let policy = config
        .tools
        .command_policy()
        .context("Invalid tools.extra_destructive_patterns")?;
    let tools = Arc::new(ToolRegistry::default_tools(
        policy,
        config.tools.command_timeout(),
        Some(working_dir.clone()),
    ));

    info!(tools = ?tools.available_tools(), "Tools registered");

    let gateway = Arc::new(
        AnthropicGateway::from_env(config.agent.base_url.clone(), &config.agent.api_key_env)
            .context("Failed to create the Anthropic client")?,
    );

    let project = LocalContextLoader::new().load(&working_dir);
    let system_prompt = AgentPromptTemplate::system(&project, &tools.definitions());

    let (events_tx, events_rx) = agent_event_channel();
    let agent = ToolUseAgent::new(
        gateway,
        tools,
        &JsonSchemaToolConverter,
        agent_config,
        events_tx,
    )
    .with_system_prompt(system_prompt);

    let renderer = EventRenderer::new(config.repl.show_spinner).with_usage(show_usage);
    let mut repl = ChatRepl::new(
        Arc::new(agent),
        events_rx,
        Arc::new(InteractiveConfirmation::new()),
        model,
    )
    .with_renderer(renderer)
    .with_history_path(history_path());

    match repl.run().await? {
        SessionEnd::Quit => Ok(ExitCode::SUCCESS),
        SessionEnd::Closed { reason } => {
            info!(%reason, "Exiting after runtime shutdown");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// `<data dir>/deckhand/history.txt`
fn history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("deckhand").join("history.txt"))
}
