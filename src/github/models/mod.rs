//! Data models for pull requests and their sub-resources.
//!
//! Types prefixed with `Api` are internal deserialisation targets mirroring
//! the GitHub REST payloads; they convert into the public domain types that
//! classifiers consume.

use serde::Deserialize;
use serde::de::IgnoredAny;

/// Upstream answer to "can this pull request be merged automatically?".
///
/// GitHub computes the flag asynchronously and reports `null` until it is
/// known, so the absence of a value is a state of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mergeability {
    /// GitHub reported the pull request as mergeable.
    Mergeable,
    /// GitHub reported a merge conflict.
    Conflicting,
    /// GitHub has not computed the flag yet.
    #[default]
    Unknown,
}

impl From<Option<bool>> for Mergeability {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Mergeable,
            Some(false) => Self::Conflicting,
            None => Self::Unknown,
        }
    }
}

/// GitHub's `mergeable_state` value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MergeState {
    /// Mergeable with passing commit status.
    Clean,
    /// Merge conflicts prevent merging.
    Dirty,
    /// Mergeable but with failing or pending commit status.
    Unstable,
    /// Blocked by branch protection.
    Blocked,
    /// The head branch is behind the base branch.
    Behind,
    /// The pull request is a draft.
    Draft,
    /// Mergeable with passing status and pre-receive hooks.
    HasHooks,
    /// Not yet computed.
    #[default]
    Unknown,
    /// A value this crate does not recognise.
    Other(String),
}

impl From<Option<&str>> for MergeState {
    fn from(value: Option<&str>) -> Self {
        match value {
            None | Some("unknown") => Self::Unknown,
            Some("clean") => Self::Clean,
            Some("dirty") => Self::Dirty,
            Some("unstable") => Self::Unstable,
            Some("blocked") => Self::Blocked,
            Some("behind") => Self::Behind,
            Some("draft") => Self::Draft,
            Some("has_hooks") => Self::HasHooks,
            Some(other) => Self::Other(other.to_owned()),
        }
    }
}

/// Pull request fields used for classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequest {
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: Option<String>,
    /// HTML URL for displaying to a user.
    pub html_url: Option<String>,
    /// Author login if the account still exists.
    pub author: Option<String>,
    /// Login of the account owning the head branch.
    pub head_owner: Option<String>,
    /// Conflict flag as computed by GitHub.
    pub mergeable: Mergeability,
    /// Merge state as computed by GitHub.
    pub merge_state: MergeState,
    /// Last update timestamp (ISO 8601 format).
    pub updated_at: Option<String>,
}

/// A file touched by a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    /// Repository-relative path.
    pub path: String,
}

/// A commit belonging to a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    /// Commit SHA.
    pub sha: String,
    /// Git author email, when GitHub returned one.
    pub author_email: Option<String>,
    /// Number of parent commits; more than one marks a merge commit.
    pub parent_count: usize,
    /// Commit message.
    pub message: Option<String>,
}

/// Review verdicts returned by the reviews endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    /// The reviewer approved the changes.
    Approved,
    /// The reviewer requested changes.
    ChangesRequested,
    /// The reviewer only commented.
    Commented,
    /// The review was dismissed.
    Dismissed,
    /// The review has not been submitted.
    Pending,
    /// A value this crate does not recognise.
    Other(String),
}

impl From<Option<&str>> for ReviewState {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some("APPROVED") => Self::Approved,
            Some("CHANGES_REQUESTED") => Self::ChangesRequested,
            Some("COMMENTED") => Self::Commented,
            Some("DISMISSED") => Self::Dismissed,
            Some("PENDING") => Self::Pending,
            other => Self::Other(other.unwrap_or_default().to_owned()),
        }
    }
}

/// A submitted review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// Reviewer login, absent for deleted accounts.
    pub reviewer: Option<String>,
    /// Verdict of the review.
    pub state: ReviewState,
    /// Submission timestamp (ISO 8601 format).
    pub submitted_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiBranch {
    pub(crate) user: Option<ApiUser>,
}

/// Repository payload; only its presence matters.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepository {
    pub(crate) full_name: Option<String>,
}

/// Pull request payload shared by the listing and detail endpoints.
///
/// The listing omits `mergeable` and `mergeable_state`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) html_url: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) head: Option<ApiBranch>,
    #[serde(default)]
    pub(crate) mergeable: Option<bool>,
    #[serde(default)]
    pub(crate) mergeable_state: Option<String>,
    pub(crate) updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiChangedFile {
    pub(crate) filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiGitAuthor {
    pub(crate) email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommitDetail {
    pub(crate) author: Option<ApiGitAuthor>,
    pub(crate) message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommit {
    pub(crate) sha: String,
    pub(crate) commit: ApiCommitDetail,
    /// Parents are only counted.
    #[serde(default)]
    pub(crate) parents: Vec<IgnoredAny>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReview {
    pub(crate) user: Option<ApiUser>,
    pub(crate) state: Option<String>,
    pub(crate) submitted_at: Option<String>,
}

impl From<ApiPullRequest> for PullRequest {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            title: value.title,
            html_url: value.html_url,
            author: value.user.and_then(|user| user.login),
            head_owner: value
                .head
                .and_then(|head| head.user)
                .and_then(|user| user.login),
            mergeable: value.mergeable.into(),
            merge_state: value.mergeable_state.as_deref().into(),
            updated_at: value.updated_at,
        }
    }
}

impl From<ApiChangedFile> for ChangedFile {
    fn from(value: ApiChangedFile) -> Self {
        Self {
            path: value.filename,
        }
    }
}

impl From<ApiCommit> for Commit {
    fn from(value: ApiCommit) -> Self {
        Self {
            sha: value.sha,
            author_email: value.commit.author.and_then(|author| author.email),
            parent_count: value.parents.len(),
            message: value.commit.message,
        }
    }
}

impl From<ApiReview> for Review {
    fn from(value: ApiReview) -> Self {
        Self {
            reviewer: value.user.and_then(|user| user.login),
            state: value.state.as_deref().into(),
            submitted_at: value.submitted_at,
        }
    }
}
