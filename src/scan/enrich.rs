//! Per-pull-request enrichment record handed to classifiers.

use crate::github::{ChangedFile, Commit, PullRequest, RepositoryLocator, Review};

use super::index::PullRequestRef;

/// Author placeholder used when neither the author nor the head branch owner
/// is known.
pub const GHOST_AUTHOR: &str = "ghost";

/// `ByFile` bucket collecting pull requests that touch too many files.
pub const OVERFLOW_KEY: &str = "(touches many files)";

/// Resolves the login a pull request is attributed to.
///
/// The recorded author wins; a deleted author falls back to the owner of the
/// head branch, and failing that to [`GHOST_AUTHOR`].
///
/// # Example
///
/// ```
/// use triage::github::PullRequest;
/// use triage::scan::resolve_author;
///
/// let pull = PullRequest {
///     head_owner: Some("fork-owner".to_owned()),
///     ..PullRequest::default()
/// };
/// assert_eq!(resolve_author(&pull), "fork-owner");
/// ```
#[must_use]
pub fn resolve_author(pull: &PullRequest) -> String {
    let known = |login: &Option<String>| {
        login
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(str::to_owned)
    };

    known(&pull.author)
        .or_else(|| known(&pull.head_owner))
        .unwrap_or_else(|| GHOST_AUTHOR.to_owned())
}

/// How a pull request's files are attributed in the `ByFile` index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAttribution {
    /// Each changed path gets its own bucket.
    Paths,
    /// The pull request touches more files than the cap allows and goes to
    /// [`OVERFLOW_KEY`] only.
    Overflow,
}

impl FileAttribution {
    /// Chooses the attribution for `file_count` changed files under `cap`.
    #[must_use]
    pub const fn for_count(file_count: usize, cap: usize) -> Self {
        if file_count > cap {
            Self::Overflow
        } else {
            Self::Paths
        }
    }
}

/// A pull request with every collection classifiers need.
///
/// Built once per pull request and dropped after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedPullRequest {
    /// Repository the pull request belongs to.
    pub repository: RepositoryLocator,
    /// Detail payload, including mergeability.
    pub pull: PullRequest,
    /// Output of [`resolve_author`].
    pub author: String,
    /// Every changed file, in server order.
    pub files: Vec<ChangedFile>,
    /// `ByFile` attribution derived from the file count.
    pub file_attribution: FileAttribution,
    /// Commits, in server order.
    pub commits: Vec<Commit>,
    /// Reviews, in chronological order.
    pub reviews: Vec<Review>,
}

impl EnrichedPullRequest {
    /// Retained summary for the indices.
    #[must_use]
    pub fn to_ref(&self) -> PullRequestRef {
        PullRequestRef {
            repository: self.repository.to_string(),
            number: self.pull.number,
            title: self.pull.title.clone(),
            html_url: self.pull.html_url.clone(),
            author: self.author.clone(),
            updated_at: self.pull.updated_at.clone(),
        }
    }
}
