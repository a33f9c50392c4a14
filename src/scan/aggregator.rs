//! Accumulates classifier output into the final scan report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::classifier::Assignment;
use super::index::{ClassificationIndex, IndexName, PullRequestRef};

/// A repository that could not be resolved and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryFailure {
    /// Repository in `owner/name` form.
    pub repository: String,
    /// Why the repository was skipped.
    pub reason: String,
}

/// One author with the pull requests attributed to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorEntry {
    /// Resolved author login.
    pub author: String,
    /// Pull requests in scan order.
    pub pulls: Vec<PullRequestRef>,
}

/// Authors ordered by pull request count, busiest first.
///
/// Authors with equal counts keep the order in which the scan first met
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AuthorRanking(Vec<AuthorEntry>);

impl AuthorRanking {
    /// Ranks the buckets of a `ByAuthor` index.
    #[must_use]
    pub fn from_index(by_author: &ClassificationIndex) -> Self {
        let mut entries: Vec<AuthorEntry> = by_author
            .buckets()
            .iter()
            .map(|bucket| AuthorEntry {
                author: bucket.key.clone(),
                pulls: bucket.pulls.clone(),
            })
            .collect();
        entries.sort_by(|left, right| right.pulls.len().cmp(&left.pulls.len()));
        Self(entries)
    }

    /// Entries, busiest author first.
    #[must_use]
    pub fn entries(&self) -> &[AuthorEntry] {
        &self.0
    }

    /// Author logins in rank order.
    pub fn authors(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|entry| entry.author.as_str())
    }
}

/// Result of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Report title.
    pub title: String,
    /// When the scan finished.
    pub generated_at: DateTime<Utc>,
    /// Repositories actually scanned, in configured order; skipped ones are
    /// only in `failed_repositories`.
    pub repositories: Vec<String>,
    /// Repositories skipped because they could not be resolved.
    pub failed_repositories: Vec<RepositoryFailure>,
    /// Number of pull requests classified.
    pub pull_request_count: usize,
    /// Every index, keyed by name.
    pub indices: BTreeMap<IndexName, ClassificationIndex>,
    /// Authors ranked by pull request count.
    pub author_ranking: AuthorRanking,
}

impl ScanReport {
    /// Looks up one index.
    #[must_use]
    pub fn index(&self, name: IndexName) -> Option<&ClassificationIndex> {
        self.indices.get(&name)
    }
}

/// Collects assignments for one scan.
///
/// Every index exists from the start, so an index nobody classified into is
/// reported empty rather than missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregator {
    indices: BTreeMap<IndexName, ClassificationIndex>,
    pull_request_count: usize,
}

impl Aggregator {
    /// Creates an aggregator with every index empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            indices: IndexName::ALL
                .into_iter()
                .map(|name| (name, ClassificationIndex::new()))
                .collect(),
            pull_request_count: 0,
        }
    }

    /// Appends `pull` to the `keys` buckets of `index`.
    pub fn record(&mut self, pull: &PullRequestRef, index: IndexName, keys: &[String]) {
        let target = self.indices.entry(index).or_default();
        for key in keys {
            target.insert(key, pull);
        }
    }

    /// Records every assignment produced for one classified pull request.
    pub fn record_pull(&mut self, pull: &PullRequestRef, assignments: &[Assignment]) {
        self.pull_request_count = self.pull_request_count.saturating_add(1);
        for assignment in assignments {
            self.record(pull, assignment.index, &assignment.keys);
        }
    }

    /// Number of pull requests recorded so far.
    #[must_use]
    pub const fn pull_request_count(&self) -> usize {
        self.pull_request_count
    }

    /// Builds the report, ranking authors from the `ByAuthor` index.
    #[must_use]
    pub fn finish(
        self,
        title: impl Into<String>,
        repositories: Vec<String>,
        failed_repositories: Vec<RepositoryFailure>,
    ) -> ScanReport {
        let author_ranking = self
            .indices
            .get(&IndexName::ByAuthor)
            .map(AuthorRanking::from_index)
            .unwrap_or_default();

        ScanReport {
            title: title.into(),
            generated_at: Utc::now(),
            repositories,
            failed_repositories,
            pull_request_count: self.pull_request_count,
            indices: self.indices,
            author_ranking,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
