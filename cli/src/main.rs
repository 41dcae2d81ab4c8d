//! CLI entrypoint for llmgate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use llmgate_application::{
    ModelBackend, NoSubmitProgress, SessionGateway, SubmitError, SubmitProgress,
};
use llmgate_domain::{Completion, DomainError, ResponseStyle};
use llmgate_infrastructure::{
    ConfigLoader, FileConfig, FileOutputFormat, JsonlTranscript, OllamaBackend,
};
use llmgate_presentation::{
    ChatRepl, Cli, Command, OutputConfig, OutputFormat, OutputFormatter, ProgressReporter,
};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };

    let _log_guard = init_logging(cli.verbose, &config)?;
    info!("Starting llmgate");

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    };

    let output = OutputConfig {
        format: match config.output.format {
            FileOutputFormat::Text => OutputFormat::Text,
            FileOutputFormat::Json => OutputFormat::Json,
        },
        color: config.output.color,
    }
    .with_format_override(cli.output);
    let formatter = output.formatter();
    let show_progress = !cli.quiet && output.format == OutputFormat::Text;

    // === Dependency Injection ===
    let params = config.gateway_params()?;
    let backend: Arc<dyn ModelBackend> = Arc::new(OllamaBackend::new(config.ollama_config())?);
    let mut gateway = SessionGateway::new(backend, params.clone());
    if let Some(path) = &config.logging.transcript {
        let transcript = JsonlTranscript::open(path)
            .with_context(|| format!("Cannot open transcript {}", path.display()))?;
        debug!("Recording transcript to {}", transcript.path().display());
        gateway = gateway.with_completion_logger(Arc::new(transcript));
    }

    let configured_model = config.request.default_model();
    let succeeded = match command {
        Command::Models { refresh } => {
            let listing = if refresh {
                gateway.refresh_models().await
            } else {
                gateway.list_available_models().await
            };
            match listing {
                Ok(view) => {
                    print!("{}", formatter.models(&view));
                    true
                }
                Err(e) => {
                    eprint!("{}", formatter.catalog_error(&e));
                    false
                }
            }
        }

        Command::Ask {
            model,
            style,
            timeout,
            prompt,
        } => {
            let style = style.or_else(|| params.default_style.map(|s| s.as_str().to_string()));
            let timeout = timeout
                .map(Duration::from_secs)
                .unwrap_or(params.default_timeout);

            let result = async {
                let model = pick_model(&gateway, model, configured_model).await?;
                ask(
                    &gateway,
                    &model,
                    &prompt,
                    style.as_deref(),
                    timeout,
                    show_progress,
                )
                .await
            }
            .await;
            match result {
                Ok(completion) => {
                    print!("{}", formatter.completion(&completion));
                    true
                }
                Err(e) => {
                    eprint!("{}", formatter.submit_error(&e));
                    false
                }
            }
        }

        Command::Chat { model, style } => {
            let style = match chat_style(style.as_deref(), params.default_style) {
                Ok(style) => style,
                Err(e) => {
                    eprint!("{}", formatter.submit_error(&e));
                    return Ok(ExitCode::FAILURE);
                }
            };
            let model = match pick_model(&gateway, model, configured_model).await {
                Ok(model) => Some(model),
                Err(e) => {
                    warn!("Starting chat without a model: {}", e);
                    None
                }
            };

            let shutdown = CancellationToken::new();
            let refresher = params
                .refresh_interval
                .map(|interval| gateway.catalog().spawn_refresher(interval, shutdown.clone()));

            let mut repl = ChatRepl::new(gateway.clone(), formatter)
                .with_model(model)
                .with_style(style)
                .with_progress(!cli.quiet);
            let result = repl.run().await;

            shutdown.cancel();
            if let Some(handle) = refresher {
                let _ = handle.await;
            }
            result?;
            true
        }

        Command::Health => match gateway.health().await {
            Ok(health) => {
                print!("{}", formatter.health(&health));
                true
            }
            Err(e) => {
                eprint!("{}", formatter.health_error(&e));
                false
            }
        },
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// One request with a spinner; Ctrl+C cancels it.
async fn ask(
    gateway: &SessionGateway,
    model: &str,
    prompt: &str,
    style: Option<&str>,
    timeout: Duration,
    show_progress: bool,
) -> Result<Completion, SubmitError> {
    let cancellation = CancellationToken::new();
    let watcher = {
        let cancellation = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancellation.cancel();
            }
        })
    };

    let progress: Box<dyn SubmitProgress> = if show_progress {
        Box::new(ProgressReporter::new(model))
    } else {
        Box::new(NoSubmitProgress)
    };
    let result = gateway
        .submit_with(
            model,
            prompt,
            style,
            timeout,
            progress.as_ref(),
            &cancellation,
        )
        .await;
    watcher.abort();
    result
}

/// Style for a chat session: the `--style` flag, else the configured default.
fn chat_style(
    flag: Option<&str>,
    configured: Option<ResponseStyle>,
) -> Result<Option<ResponseStyle>, SubmitError> {
    match flag {
        Some(style) => Ok(ResponseStyle::parse_optional(Some(style))?),
        None => Ok(configured),
    }
}

/// Model for a command that did not name one: the configured default, else
/// the first model the backend lists.
async fn pick_model(
    gateway: &SessionGateway,
    explicit: Option<String>,
    configured: Option<&str>,
) -> Result<String, SubmitError> {
    if let Some(model) = explicit {
        return Ok(model);
    }
    if let Some(model) = configured {
        return Ok(model.to_string());
    }

    let view = gateway.list_available_models().await?;
    match view.models().first() {
        Some(model) => {
            info!("No model given, using {}", model);
            Ok(model.to_string())
        }
        None => Err(SubmitError::InvalidRequest(DomainError::EmptyModelId)),
    }
}

/// Initialize tracing from the verbosity count, unless `RUST_LOG` is set.
///
/// Writes to stderr, or to `[logging] file` through a non-blocking writer
/// whose guard must live until exit.
fn init_logging(verbose: u8, config: &FileConfig) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match &config.logging.file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
            std::fs::create_dir_all(directory)
                .with_context(|| format!("Cannot create log directory {}", directory.display()))?;

            let appender = tracing_appender::rolling::never(directory, file_name);
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
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}
