//! Scan orchestration shared by the binary entry point and its tests.

use std::io::{self, Write};

use triage::github::Transport;
use triage::{
    HtmlReportSink, JsonReportSink, PullRequestScanner, ReportSink, RepositoryLocator,
    ScanReport, TriageConfig, TriageError,
};

/// Builds the sinks enabled by `config`, all writing into its output
/// directory.
#[must_use]
pub fn sinks_for(config: &TriageConfig) -> Vec<Box<dyn ReportSink>> {
    let output_dir = config.output_dir();
    let mut sinks: Vec<Box<dyn ReportSink>> = Vec::new();
    if config.json_report {
        sinks.push(Box::new(JsonReportSink::new(output_dir.clone())));
    }
    if config.html_report {
        sinks.push(Box::new(HtmlReportSink::new(output_dir)));
    }
    sinks
}

/// Scans `repositories` and hands the finished report to every sink.
///
/// # Errors
///
/// Returns the first scan or publishing failure. Sinks only run after the
/// scan has succeeded.
pub async fn scan_and_publish<T: Transport>(
    scanner: &PullRequestScanner<T>,
    repositories: &[RepositoryLocator],
    sinks: &[Box<dyn ReportSink>],
) -> Result<ScanReport, TriageError> {
    let report = scanner.scan(repositories).await?;
    for sink in sinks {
        sink.publish(&report)?;
    }
    Ok(report)
}

/// Prints a one-line outcome to stdout.
///
/// # Errors
///
/// Returns [`TriageError::Io`] when stdout cannot be written.
pub fn write_summary(report: &ScanReport) -> Result<(), TriageError> {
    let mut stdout = io::stdout().lock();
    let message = format!(
        "Triaged {} pull requests across {} repositories ({} skipped)",
        report.pull_request_count,
        report.repositories.len(),
        report.failed_repositories.len()
    );

    writeln!(stdout, "{message}").map_err(|error| TriageError::Io {
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use async_trait::async_trait;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;
    use triage::github::{ApiRequest, RawResponse, Transport};
    use triage::{
        PullRequestScanner, RateLimitedClient, ReportSink, RepositoryLocator, ScanOptions,
        ScanReport, TriageConfig, TriageError,
    };

    use super::{scan_and_publish, sinks_for};

    /// Serves repositories with no open pull requests; `octo/gone` is
    /// missing.
    struct EmptyGitHub;

    #[async_trait]
    impl Transport for EmptyGitHub {
        async fn get(&self, request: &ApiRequest) -> Result<RawResponse, TriageError> {
            let path = request.path();
            if path.starts_with("/repos/octo/gone") {
                return Err(TriageError::NotFound {
                    message: "Not Found".to_owned(),
                });
            }
            let body = if path.ends_with("/pulls") {
                "[]"
            } else {
                r#"{"full_name": "octo/repo"}"#
            };
            Ok(RawResponse {
                rate_limit: None,
                has_next_page: false,
                body: body.to_owned(),
            })
        }
    }

    /// Answers every call with a permanent API error.
    struct FailingGitHub;

    #[async_trait]
    impl Transport for FailingGitHub {
        async fn get(&self, _request: &ApiRequest) -> Result<RawResponse, TriageError> {
            Err(TriageError::Api {
                message: "Validation Failed".to_owned(),
            })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        published: Rc<RefCell<Vec<ScanReport>>>,
    }

    impl ReportSink for RecordingSink {
        fn publish(&self, report: &ScanReport) -> Result<(), TriageError> {
            self.published.borrow_mut().push(report.clone());
            Ok(())
        }
    }

    fn locators(names: &[&str]) -> Vec<RepositoryLocator> {
        names
            .iter()
            .map(|name| RepositoryLocator::parse(name).expect("valid identifier"))
            .collect()
    }

    #[tokio::test]
    async fn report_reaches_every_sink() {
        let first = RecordingSink::default();
        let second = RecordingSink::default();
        let sinks: Vec<Box<dyn ReportSink>> = vec![Box::new(first.clone()), Box::new(second.clone())];
        let scanner =
            PullRequestScanner::new(RateLimitedClient::new(EmptyGitHub), ScanOptions::default());

        let report = scan_and_publish(&scanner, &locators(&["octo/repo", "octo/gone"]), &sinks)
            .await
            .expect("scan should succeed");

        assert_eq!(report.failed_repositories.len(), 1);
        for sink in [first, second] {
            let published = sink.published.borrow();
            assert_eq!(published.len(), 1);
            assert_eq!(published.first(), Some(&report));
        }
    }

    #[tokio::test]
    async fn sinks_are_skipped_when_the_scan_fails() {
        let sink = RecordingSink::default();
        let sinks: Vec<Box<dyn ReportSink>> = vec![Box::new(sink.clone())];
        let scanner =
            PullRequestScanner::new(RateLimitedClient::new(FailingGitHub), ScanOptions::default());

        let result = scan_and_publish(&scanner, &locators(&["octo/repo"]), &sinks).await;

        assert!(
            matches!(result, Err(TriageError::Api { .. })),
            "expected Api error, got {result:?}"
        );
        assert!(sink.published.borrow().is_empty());
    }

    #[rstest]
    #[case::both(true, true, 2)]
    #[case::json_only(true, false, 1)]
    #[case::html_only(false, true, 1)]
    #[case::none(false, false, 0)]
    fn sinks_follow_report_toggles(
        #[case] json_report: bool,
        #[case] html_report: bool,
        #[case] expected: usize,
    ) {
        let config = TriageConfig {
            json_report,
            html_report,
            ..TriageConfig::default()
        };

        assert_eq!(sinks_for(&config).len(), expected);
    }

    #[tokio::test]
    async fn empty_run_publishes_to_configured_directory() {
        let dir = TempDir::new().expect("temp dir");
        let output = Utf8PathBuf::from_path_buf(dir.path().join("report")).expect("utf-8 path");
        let config = TriageConfig {
            output_dir: output.to_string(),
            ..TriageConfig::default()
        };
        let scanner =
            PullRequestScanner::new(RateLimitedClient::new(EmptyGitHub), ScanOptions::default());

        let report = scan_and_publish(&scanner, &locators(&["octo/repo"]), &sinks_for(&config))
            .await
            .expect("scan should succeed");

        assert_eq!(report.pull_request_count, 0);
        assert!(output.join("scan.json").exists());
        assert!(output.join("index.html").exists());
    }
}
