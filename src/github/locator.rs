//! Repository identifiers and identity wrappers for scan configuration.

use std::fmt;

use super::error::TriageError;
use super::gateway::ApiRequest;

/// Public GitHub REST API base used when no enterprise host is configured.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    fn new(value: &str) -> Option<Self> {
        (!value.is_empty()).then(|| Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    fn new(value: &str) -> Option<Self> {
        (!value.is_empty()).then(|| Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, TriageError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TriageError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(<redacted>)")
    }
}

/// A repository to scan, identified as `owner/name`.
///
/// # Example
///
/// ```
/// use triage::RepositoryLocator;
///
/// let locator = RepositoryLocator::parse("octo/repo").expect("should parse");
/// assert_eq!(locator.owner().as_str(), "octo");
/// assert_eq!(locator.repository().as_str(), "repo");
/// assert_eq!(locator.to_string(), "octo/repo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryLocator {
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Parses an `owner/name` identifier, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidRepository` unless the input holds exactly
    /// two non-empty segments separated by `/`.
    pub fn parse(identifier: &str) -> Result<Self, TriageError> {
        let invalid = || TriageError::InvalidRepository {
            identifier: identifier.to_owned(),
        };

        let (owner, name) = identifier.trim().split_once('/').ok_or_else(invalid)?;
        if name.contains('/') {
            return Err(invalid());
        }

        Ok(Self {
            owner: RepositoryOwner::new(owner).ok_or_else(invalid)?,
            repository: RepositoryName::new(name).ok_or_else(invalid)?,
        })
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    fn base_path(&self) -> String {
        format!(
            "/repos/{}/{}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }

    /// Request resolving the repository itself.
    pub(crate) fn repository_request(&self) -> ApiRequest {
        ApiRequest::new(self.base_path())
    }

    /// Request listing open pull requests, most recently updated first.
    pub(crate) fn open_pulls_request(&self) -> ApiRequest {
        ApiRequest::new(format!("{}/pulls", self.base_path()))
            .with_query("state", "open")
            .with_query("sort", "updated")
            .with_query("direction", "desc")
    }

    /// Request loading one pull request with its mergeability fields.
    pub(crate) fn pull_request(&self, number: u64) -> ApiRequest {
        ApiRequest::new(format!("{}/pulls/{number}", self.base_path()))
    }

    /// Request listing the files changed by a pull request.
    pub(crate) fn pull_files_request(&self, number: u64) -> ApiRequest {
        ApiRequest::new(format!("{}/pulls/{number}/files", self.base_path()))
    }

    /// Request listing the commits of a pull request.
    pub(crate) fn pull_commits_request(&self, number: u64) -> ApiRequest {
        ApiRequest::new(format!("{}/pulls/{number}/commits", self.base_path()))
    }

    /// Request listing the reviews of a pull request in submission order.
    pub(crate) fn pull_reviews_request(&self, number: u64) -> ApiRequest {
        ApiRequest::new(format!("{}/pulls/{number}/reviews", self.base_path()))
    }
}

impl fmt::Display for RepositoryLocator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}/{}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }
}
