//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.triage.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `TRIAGE_TOKEN`, `TRIAGE_REPOSITORIES`, …,
//!    or the legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--token`/`-t`, `--repositories`/`-r`, …
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! repositories = ["octo/service", "octo/website"]
//! title = "Octo backlog"
//! output_dir = "reports"
//! max_pull_requests = 200
//! html_report = true
//! ```

use std::env;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::client::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_SECONDS, RetryPolicy};
use crate::github::error::TriageError;
use crate::github::locator::{DEFAULT_API_BASE, PersonalAccessToken, RepositoryLocator};
use crate::github::rate_limit::{
    DEFAULT_RATE_LIMIT_BUFFER_SECONDS, DEFAULT_RATE_LIMIT_THRESHOLD, RateLimitPolicy,
};
use crate::scan::scanner::{
    DEFAULT_MAX_FILES_PER_PULL, DEFAULT_MAX_PULL_REQUESTS, DEFAULT_TITLE, ScanOptions,
};

/// Default directory receiving rendered reports.
pub const DEFAULT_OUTPUT_DIR: &str = "triage-report";

/// File name of the process lock inside the temporary directory.
pub const DEFAULT_LOCK_FILE_NAME: &str = "pr-triage.lock";

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use triage::TriageConfig;
///
/// let config = TriageConfig::load().expect("failed to load configuration");
/// let repositories = config.require_repositories().expect("repositories required");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "TRIAGE",
    discovery(
        dotfile_name = ".triage.toml",
        config_file_name = "triage.toml",
        app_name = "triage"
    )
)]
pub struct TriageConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `TRIAGE_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Repositories to scan, as `owner/name`, in scan order.
    #[ortho_config(cli_short = 'r')]
    pub repositories: Vec<String>,

    /// REST API base URL; set to `https://host/api/v3` for GitHub
    /// Enterprise.
    #[ortho_config()]
    pub api_base: String,

    /// Title shown on every report page.
    #[ortho_config()]
    pub title: String,

    /// Directory receiving the JSON and HTML reports.
    #[ortho_config(cli_short = 'o')]
    pub output_dir: String,

    /// Open pull requests scanned per repository.
    #[ortho_config()]
    pub max_pull_requests: usize,

    /// Changed files above which a pull request is filed under the overflow
    /// bucket of the file index.
    #[ortho_config()]
    pub max_files_per_pull: usize,

    /// Remaining calls below which the client waits for the quota reset.
    #[ortho_config()]
    pub rate_limit_threshold: u32,

    /// Seconds slept past the reported quota reset.
    #[ortho_config()]
    pub rate_limit_buffer_seconds: u64,

    /// Delay before the first retry of a transient failure.
    #[ortho_config()]
    pub retry_delay_seconds: u64,

    /// Retries allowed after the first failed attempt.
    #[ortho_config()]
    pub max_retries: u32,

    /// Writes `scan.json` into the output directory.
    #[ortho_config()]
    pub json_report: bool,

    /// Renders the HTML pages into the output directory.
    #[ortho_config()]
    pub html_report: bool,

    /// Lock file preventing concurrent runs; defaults to a file in the
    /// temporary directory.
    #[ortho_config()]
    pub lock_file: Option<String>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            token: None,
            repositories: Vec::new(),
            api_base: DEFAULT_API_BASE.to_owned(),
            title: DEFAULT_TITLE.to_owned(),
            output_dir: DEFAULT_OUTPUT_DIR.to_owned(),
            max_pull_requests: DEFAULT_MAX_PULL_REQUESTS,
            max_files_per_pull: DEFAULT_MAX_FILES_PER_PULL,
            rate_limit_threshold: DEFAULT_RATE_LIMIT_THRESHOLD,
            rate_limit_buffer_seconds: DEFAULT_RATE_LIMIT_BUFFER_SECONDS,
            retry_delay_seconds: DEFAULT_RETRY_DELAY_SECONDS,
            max_retries: DEFAULT_MAX_RETRIES,
            json_report: true,
            html_report: true,
            lock_file: None,
        }
    }
}

impl TriageConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::MissingToken`] when no token source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, TriageError> {
        let value = self
            .token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(TriageError::MissingToken)?;
        PersonalAccessToken::new(value)
    }

    /// Parses the configured repositories.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Configuration`] when the list is empty and
    /// [`TriageError::InvalidRepository`] for a malformed entry.
    pub fn require_repositories(&self) -> Result<Vec<RepositoryLocator>, TriageError> {
        if self.repositories.is_empty() {
            return Err(TriageError::Configuration {
                message: "at least one repository is required (use --repositories or -r)"
                    .to_owned(),
            });
        }

        self.repositories
            .iter()
            .map(|identifier| RepositoryLocator::parse(identifier))
            .collect()
    }

    /// Quota policy built from the rate limit settings.
    #[must_use]
    pub const fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(
            self.rate_limit_threshold,
            Duration::from_secs(self.rate_limit_buffer_seconds),
        )
    }

    /// Retry policy built from the retry settings.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_secs(self.retry_delay_seconds),
        )
    }

    /// Scan tunables built from the configuration.
    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            title: self.title.clone(),
            max_pull_requests: self.max_pull_requests,
            max_files_per_pull: self.max_files_per_pull,
            ..ScanOptions::default()
        }
    }

    /// Directory receiving the reports.
    #[must_use]
    pub fn output_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(&self.output_dir)
    }

    /// Lock file path, defaulting to the temporary directory.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Configuration`] when the temporary directory is
    /// not valid UTF-8.
    pub fn lock_path(&self) -> Result<Utf8PathBuf, TriageError> {
        if let Some(path) = &self.lock_file {
            return Ok(Utf8PathBuf::from(path));
        }

        let temp = Utf8PathBuf::from_path_buf(env::temp_dir()).map_err(|path| {
            TriageError::Configuration {
                message: format!("temporary directory is not UTF-8: {}", path.display()),
            }
        })?;
        Ok(temp.join(DEFAULT_LOCK_FILE_NAME))
    }
}
