//! Pull request backlog triage for GitHub repositories.
//!
//! The library scans the open pull requests of one or more repositories
//! through a rate-limited, retrying GitHub client, classifies each pull
//! request along independent axes (author, files, directories, conflicts,
//! CI failures, merge commits, commit authors, approvals), and produces a
//! [`ScanReport`] with ordered indices and an author ranking. Report sinks
//! render the result as JSON or static HTML.

pub mod config;
pub mod github;
pub mod report;
pub mod scan;

pub use config::TriageConfig;
pub use github::{
    OctocrabTransport, PersonalAccessToken, RateLimitedClient, RepositoryLocator, TriageError,
};
pub use report::{HtmlReportSink, JsonReportSink, ReportSink};
pub use scan::{PullRequestScanner, ScanOptions, ScanReport};
