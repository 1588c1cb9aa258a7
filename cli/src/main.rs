//! CLI entrypoint for the Translator test harness
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use harness_application::{HarnessProgress, NoProgress, RunSuiteInput, RunSuiteUseCase};
use harness_infrastructure::{
    ConfigLoader, FileConfig, HttpParticipantGateway, NodeNormClient, SmartApiRegistry,
    SuiteLoader,
};
use harness_presentation::{Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the subscriber: stderr always, plus `--log-file` when given.
///
/// The returned guard flushes the file writer when dropped.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
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

    Ok(guard)
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    // CLI flags take precedence over every config source
    if let Some(version) = &cli.trapi_version {
        config.registry.trapi_version = version.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.dispatch.concurrency = usize::from(concurrency);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = load_config(&cli)?;
    if !config.output.color {
        colored::control::set_override(false);
    }

    let Some(tests_path) = cli.tests_path.as_deref() else {
        bail!("A test suite path is required.");
    };
    let suite = SuiteLoader::load(tests_path)?;
    let suite_name = cli.suite.clone().unwrap_or(suite.name);

    info!("Starting test harness for suite {}", suite_name);

    // === Dependency Injection ===
    let registry = Arc::new(SmartApiRegistry::new(
        config.registry.url.clone(),
        Duration::from_secs(config.registry.timeout_seconds),
    )?);
    let gateway = Arc::new(HttpParticipantGateway::new(
        config.dispatch.query_timeout(),
        config.dispatch.poll_request_timeout(),
    )?);
    let normalizer = Arc::new(NodeNormClient::new(
        config.node_norm.urls.clone(),
        Duration::from_secs(config.node_norm.timeout_seconds),
    )?);
    let use_case =
        RunSuiteUseCase::new(registry, gateway, normalizer, config.dispatch.to_params());

    // Ctrl-C cancels the suite, aborting in-flight queries and polls
    let cancellation = CancellationToken::new();
    let on_signal = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling suite run");
            on_signal.cancel();
        }
    });

    let progress: Box<dyn HarnessProgress> = if cli.quiet || !config.output.progress {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let input = RunSuiteInput::new(suite_name, suite.test_cases)
        .with_trapi_version(config.registry.trapi_version.clone());
    let report = match use_case
        .execute_with_progress(input, progress.as_ref(), cancellation)
        .await
    {
        Ok(report) => report,
        Err(e) if e.is_cancelled() => bail!("Suite run cancelled"),
        Err(e) => return Err(e.into()),
    };

    let format = cli
        .output
        .map(harness_domain::OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();
    println!("{}", ConsoleFormatter.render(&report, format));

    Ok(())
}
