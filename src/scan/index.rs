//! Named classification indices and their ordered buckets.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// The independent axes along which pull requests are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexName {
    /// Resolved author login.
    ByAuthor,
    /// Changed file path, or the overflow bucket.
    ByFile,
    /// Parent directory of each changed file.
    ByDirectory,
    /// Authors of pull requests with merge conflicts.
    ByConflict,
    /// Authors of pull requests whose checks fail.
    ByCiFailure,
    /// Authors of pull requests containing merge commits.
    ByMergeCommit,
    /// Authors of pull requests with commits by several people.
    ByMultiAuthor,
    /// Number of standing approvals.
    ByApprovalCount,
}

impl IndexName {
    /// Every index, in report order.
    pub const ALL: [Self; 8] = [
        Self::ByAuthor,
        Self::ByFile,
        Self::ByDirectory,
        Self::ByConflict,
        Self::ByCiFailure,
        Self::ByMergeCommit,
        Self::ByMultiAuthor,
        Self::ByApprovalCount,
    ];

    /// Stable identifier used in serialized reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ByAuthor => "by_author",
            Self::ByFile => "by_file",
            Self::ByDirectory => "by_directory",
            Self::ByConflict => "by_conflict",
            Self::ByCiFailure => "by_ci_failure",
            Self::ByMergeCommit => "by_merge_commit",
            Self::ByMultiAuthor => "by_multi_author",
            Self::ByApprovalCount => "by_approval_count",
        }
    }

    /// Human-readable heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ByAuthor => "By author",
            Self::ByFile => "By file",
            Self::ByDirectory => "By directory",
            Self::ByConflict => "Merge conflicts",
            Self::ByCiFailure => "CI failures",
            Self::ByMergeCommit => "Merge commits",
            Self::ByMultiAuthor => "Multiple commit authors",
            Self::ByApprovalCount => "By approvals",
        }
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Retained handle for a classified pull request.
///
/// Enrichment collections (files, commits, reviews) are dropped once a pull
/// request has been classified; only this summary survives in the indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRef {
    /// Repository in `owner/name` form.
    pub repository: String,
    /// Pull request number.
    pub number: u64,
    /// Title, when GitHub returned one.
    pub title: Option<String>,
    /// Link to the pull request page.
    pub html_url: Option<String>,
    /// Resolved author login.
    pub author: String,
    /// Last update timestamp as delivered by GitHub.
    pub updated_at: Option<String>,
}

impl PullRequestRef {
    fn same_pull_request(&self, other: &Self) -> bool {
        self.number == other.number && self.repository == other.repository
    }
}

/// Pull requests sharing one classification key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// Classification key.
    pub key: String,
    /// Members in scan order.
    pub pulls: Vec<PullRequestRef>,
}

/// Mapping from bucket key to the pull requests classified under it.
///
/// Keys keep first-insertion order and members keep scan order, so two
/// scans of the same upstream state yield identical indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassificationIndex {
    buckets: Vec<Bucket>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl ClassificationIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `pull` to the bucket for `key`.
    ///
    /// Returns `false` when the pull request already occupies that bucket.
    pub fn insert(&mut self, key: &str, pull: &PullRequestRef) -> bool {
        let position = self.bucket_position(key);
        let Some(bucket) = self.buckets.get_mut(position) else {
            return false;
        };
        if bucket.pulls.iter().any(|member| member.same_pull_request(pull)) {
            return false;
        }
        bucket.pulls.push(pull.clone());
        true
    }

    fn bucket_position(&mut self, key: &str) -> usize {
        if let Some(position) = self.positions.get(key) {
            return *position;
        }

        let position = self.buckets.len();
        self.buckets.push(Bucket {
            key: key.to_owned(),
            pulls: Vec::new(),
        });
        self.positions.insert(key.to_owned(), position);
        position
    }

    /// Members of the bucket for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[PullRequestRef]> {
        self.positions
            .get(key)
            .and_then(|position| self.buckets.get(*position))
            .map(|bucket| bucket.pulls.as_slice())
    }

    /// Buckets in first-insertion order.
    #[must_use]
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Bucket keys in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|bucket| bucket.key.as_str())
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no pull request has been classified into this index.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of bucket memberships.
    #[must_use]
    pub fn membership_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.pulls.len()).sum()
    }
}
