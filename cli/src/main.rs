//! CLI entrypoint for shopwise
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;
mod output;
mod repl;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use shopwise_application::{
    ChatError, ConversationLogger, ConversationOrchestrator, NoConversationLogger,
    ToolExecutorPort,
};
use shopwise_domain::ChatRequest;
use shopwise_infrastructure::{
    CachingToolExecutor, ConfigLoader, FileConfig, FunctionDeclarationConverter,
    GeminiLlmGateway, InMemoryProductCatalog, JsonlConversationLogger, product_tools,
};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::Cli;
use output::{format_outcome, metrics_table};
use repl::ChatRepl;

/// Console logs go to stderr; `log_dir` adds a daily-rotated plain-text file.
fn init_tracing(verbose: u8, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "shopwise.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn load_catalog(cli: &Cli, config: &FileConfig) -> Result<InMemoryProductCatalog> {
    let seed = cli
        .catalog
        .clone()
        .or_else(|| config.catalog.seed_file.as_ref().map(Into::into));
    match seed {
        Some(path) => Ok(InMemoryProductCatalog::from_seed_file(path)?),
        None => Ok(InMemoryProductCatalog::sample()),
    }
}

fn conversation_logger(config: &FileConfig) -> Result<Arc<dyn ConversationLogger>> {
    match &config.logging.conversation_log {
        Some(path) => {
            let logger = JsonlConversationLogger::open(path)
                .with_context(|| format!("Cannot open conversation log {}", path))?;
            info!(path = %logger.path().display(), "Writing conversation transcript");
            Ok(Arc::new(logger))
        }
        None => Ok(Arc::new(NoConversationLogger)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let _log_guard = init_tracing(cli.verbose, config.logging.log_dir.as_deref());

    info!("Starting shopwise");

    // === Dependency Injection ===
    let catalog = Arc::new(load_catalog(&cli, &config)?);
    let registry = Arc::new(product_tools(catalog)?);
    info!(tools = registry.len(), "Registered product tools");

    let executor = Arc::new(
        CachingToolExecutor::new(registry)
            .with_cache(Arc::new(config.tools.build_cache()))
            .with_retry_policy(config.tools.retry_policy()),
    );
    let gateway = Arc::new(GeminiLlmGateway::new(config.llm.to_settings())?);
    let memory = Arc::new(config.memory.build());

    let orchestrator = Arc::new(
        ConversationOrchestrator::new(
            gateway,
            executor.clone(),
            Arc::new(FunctionDeclarationConverter),
            memory,
        )
        .with_params(config.chat_params())
        .with_conversation_logger(conversation_logger(&config)?),
    );
    let credentials = config.llm.resolve_api_key();

    // Chat mode
    if cli.chat {
        ChatRepl::new(orchestrator, executor.clone(), cli.conversation, cli.user.clone())
            .with_credentials(credentials)
            .with_format(cli.output)
            .run()
            .await?;
    } else {
        let Some(message) = cli.message.as_deref() else {
            bail!("A message is required. Use --chat for interactive mode.");
        };

        let mut request = ChatRequest::new(message, cli.user.clone());
        if !cli.stateless {
            request = request.with_conversation(cli.conversation);
        }
        if let Some(credentials) = credentials {
            request = request.with_credentials(credentials);
        }

        let cancel = CancellationToken::new();
        {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            });
        }

        match orchestrator.handle(request, &cancel).await {
            Ok(outcome) => {
                info!(iterations = outcome.iterations, exit = ?outcome.exit, "Chat run finished");
                println!("{}", format_outcome(&outcome, cli.output));
            }
            Err(ChatError::Cancelled) => bail!("Cancelled"),
            Err(e) => return Err(e.into()),
        }
    }

    if cli.metrics {
        println!();
        println!("{}", metrics_table(&executor.metrics()));
    }

    Ok(())
}
