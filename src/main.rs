//! `pr-triage` entrypoint: scans configured repositories and writes reports.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use triage::{
    OctocrabTransport, PullRequestScanner, RateLimitedClient, TriageConfig, TriageError,
};

use cli::lock::ProcessLock;
use cli::run::{scan_and_publish, sinks_for, write_summary};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr, filtered by `RUST_LOG` and defaulting to `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

async fn run() -> Result<(), TriageError> {
    let config = load_config()?;

    let repositories = config.require_repositories()?;
    let token = config.resolve_token()?;

    let lock_path = config.lock_path()?;
    let Some(lock) = ProcessLock::acquire(&lock_path)? else {
        tracing::info!(path = %lock_path, "another scan holds the lock; exiting");
        return Ok(());
    };
    tracing::debug!(path = %lock.path(), "process lock acquired");

    let transport = OctocrabTransport::for_token(&token, &config.api_base)?;
    let client = RateLimitedClient::new(transport)
        .with_rate_limit_policy(config.rate_limit_policy())
        .with_retry_policy(config.retry_policy());
    let scanner = PullRequestScanner::new(client, config.scan_options());

    let report = scan_and_publish(&scanner, &repositories, &sinks_for(&config)).await?;
    write_summary(&report)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`TriageError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<TriageConfig, TriageError> {
    TriageConfig::load().map_err(|error| TriageError::Configuration {
        message: error.to_string(),
    })
}
