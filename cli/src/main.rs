//! CLI entrypoint for roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use roundtable_application::{ConfigSource, RunChatUseCase};
use roundtable_domain::{ChatRequest, ChatUser};
use roundtable_infrastructure::{
    ConfigLoader, ConfigStore, JsonlRunRecorder, LoadedConfig, ModelPlanner, ModelSynthesizer,
    RoutingGateway,
};
use roundtable_presentation::{
    Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter, ServerState, serve,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    // Configuration errors are fatal: nothing is served on a bad config
    let loaded = if cli.no_config {
        ConfigLoader::resolve(ConfigLoader::load_defaults(), None)
    } else {
        ConfigLoader::load_validated(cli.config.as_deref())
    }
    .context("Failed to load configuration")?;

    if let Some(source) = &loaded.source {
        info!("Using configuration from {}", source.display());
    }

    // === Dependency Injection ===
    let gateway = Arc::new(RoutingGateway::from_config(&loaded.file.providers));
    let store = Arc::new(ConfigStore::new(
        loaded.orchestration.clone(),
        loaded.source.clone(),
    ));
    let use_case = Arc::new(build_use_case(&loaded, gateway, store.clone()));

    match cli.command {
        Command::Serve {
            bind,
            watch_config,
            watch_interval_ms,
        } => {
            let shutdown = CancellationToken::new();
            let watcher = if watch_config {
                let handle = store.watch(
                    Duration::from_millis(watch_interval_ms.max(100)),
                    shutdown.clone(),
                );
                if handle.is_none() {
                    warn!("--watch-config given but no configuration file is in use");
                }
                handle
            } else {
                None
            };

            let server = &loaded.file.server;
            let api_key = std::env::var(&server.api_key_env).ok();
            if api_key.is_none() {
                warn!(
                    "{} is not set; /api/chat accepts unauthenticated requests",
                    server.api_key_env
                );
            }
            let state = Arc::new(ServerState::new(use_case).with_api_key(api_key));
            let bind = bind.unwrap_or_else(|| server.bind.clone());

            let signal = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Shutting down");
                }
                signal.cancel();
            });

            serve(&bind, state, shutdown.clone())
                .await
                .with_context(|| format!("HTTP server on {} failed", bind))?;

            shutdown.cancel();
            if let Some(handle) = watcher {
                let _ = handle.await;
            }
        }

        Command::Ask {
            message,
            mode,
            context,
            user,
            output,
            quiet,
        } => {
            let user = ChatUser {
                id: user,
                name: None,
            };
            let mut request = ChatRequest::try_new("cli", mode.into(), user, message)?;
            if let Some(context) = context {
                request = request.with_context(context);
            }

            let outcome = if quiet || output == OutputFormat::Json {
                use_case.execute(request).await?
            } else {
                let progress = ProgressReporter::new();
                use_case.execute_with_progress(request, &progress).await?
            };

            let text = match output {
                OutputFormat::Reply => ConsoleFormatter::format_reply(&outcome),
                OutputFormat::Full => ConsoleFormatter::format(&outcome),
                OutputFormat::Json => ConsoleFormatter::format_json(&outcome),
            };
            println!("{}", text);
        }
    }

    Ok(())
}

fn build_use_case(
    loaded: &LoadedConfig,
    gateway: Arc<RoutingGateway>,
    store: Arc<ConfigStore>,
) -> RunChatUseCase {
    let config: Arc<dyn ConfigSource> = store;
    let planner = Arc::new(ModelPlanner::new(gateway.clone(), config.clone()));
    let synthesizer = Arc::new(ModelSynthesizer::new(gateway.clone(), config.clone()));
    let use_case = RunChatUseCase::new(gateway.clone(), gateway, planner, synthesizer, config);

    match &loaded.file.persistence.runs_dir {
        Some(dir) => match JsonlRunRecorder::in_dir(dir) {
            Ok(recorder) => {
                info!("Recording runs to {}", recorder.path().display());
                use_case.with_recorder(Arc::new(recorder))
            }
            Err(e) => {
                warn!("Run recording disabled, cannot open {}: {}", dir.display(), e);
                use_case
            }
        },
        None => use_case,
    }
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins over the verbosity count. With `log_dir` a second,
/// non-blocking layer writes to a daily file; the returned guard flushes it.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "roundtable.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            tracing_subscriber::registry()
                .with(console)
                .with(file)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(console).init();
            None
        }
    }
}
