//! Pure classification rules.
//!
//! Every rule implements [`Classifier`]: it maps one enriched pull request
//! to zero or more bucket keys of a single named index. Rules never call
//! GitHub and never see other pull requests. A rule that meets data it
//! cannot interpret reports [`MalformedData`]; the set logs the failure and
//! that rule contributes nothing for the pull request while the others
//! still run.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use crate::github::{Mergeability, MergeState, ReviewState};

use super::enrich::{EnrichedPullRequest, FileAttribution, OVERFLOW_KEY};
use super::index::IndexName;

/// Bucket key for root-level files in the `ByDirectory` index.
pub const ROOT_DIRECTORY: &str = ".";

/// Data a classifier could not interpret.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedData {
    /// A commit carries no git author email.
    #[error("commit {sha} has no author email")]
    MissingCommitEmail {
        /// SHA of the offending commit.
        sha: String,
    },
    /// A review carries no reviewer login.
    #[error("review submitted at {submitted_at} has no reviewer")]
    MissingReviewer {
        /// Submission timestamp, or `unknown`.
        submitted_at: String,
    },
}

/// A rule assigning pull requests to buckets of one index.
pub trait Classifier: Send + Sync {
    /// Index this rule populates.
    fn index(&self) -> IndexName;

    /// Returns the bucket keys for `pull`.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedData`] when the pull request's data cannot be
    /// interpreted by this rule.
    fn classify(&self, pull: &EnrichedPullRequest) -> Result<Vec<String>, MalformedData>;
}

/// Output of one classifier for one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Index the keys belong to.
    pub index: IndexName,
    /// Bucket keys, in rule order.
    pub keys: Vec<String>,
}

/// The rules applied to every pull request of a scan.
pub struct ClassifierSet {
    classifiers: Vec<Box<dyn Classifier>>,
}

impl ClassifierSet {
    /// Wraps an arbitrary set of rules.
    #[must_use]
    pub fn new(classifiers: Vec<Box<dyn Classifier>>) -> Self {
        Self { classifiers }
    }

    /// The eight structured rules, one per [`IndexName`].
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(AuthorClassifier),
            Box::new(FileClassifier),
            Box::new(DirectoryClassifier),
            Box::new(ConflictClassifier),
            Box::new(CiFailureClassifier),
            Box::new(MergeCommitClassifier),
            Box::new(MultiAuthorClassifier),
            Box::new(ApprovalCountClassifier),
        ])
    }

    /// Number of rules in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    /// Whether the set has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    /// Runs every rule against `pull`.
    ///
    /// Rules reporting malformed data are logged and skipped.
    #[must_use]
    pub fn classify(&self, pull: &EnrichedPullRequest) -> Vec<Assignment> {
        self.classifiers
            .iter()
            .filter_map(|classifier| {
                let index = classifier.index();
                match classifier.classify(pull) {
                    Ok(keys) => Some(Assignment { index, keys }),
                    Err(error) => {
                        tracing::warn!(
                            repository = %pull.repository,
                            number = pull.pull.number,
                            %index,
                            "skipping classifier: {error}"
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

impl Default for ClassifierSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Buckets every pull request under its resolved author.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorClassifier;

impl Classifier for AuthorClassifier {
    fn index(&self) -> IndexName {
        IndexName::ByAuthor
    }

    fn classify(&self, pull: &EnrichedPullRequest) -> Result<Vec<String>, MalformedData> {
        Ok(vec![pull.author.clone()])
    }
}

/// Buckets by changed path, or under [`OVERFLOW_KEY`] when too many files
/// changed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileClassifier;

impl Classifier for FileClassifier {
    fn index(&self) -> IndexName {
        IndexName::ByFile
    }

    fn classify(&self, pull: &EnrichedPullRequest) -> Result<Vec<String>, MalformedData> {
        Ok(match pull.file_attribution {
            FileAttribution::Overflow => vec![OVERFLOW_KEY.to_owned()],
            FileAttribution::Paths => pull.files.iter().map(|file| file.path.clone()).collect(),
        })
    }
}

/// Buckets by the parent directory of each changed file.
///
/// Applies to every file regardless of the overflow cap.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryClassifier;

impl Classifier for DirectoryClassifier {
    fn index(&self) -> IndexName {
        IndexName::ByDirectory
    }

    fn classify(&self, pull: &EnrichedPullRequest) -> Result<Vec<String>, MalformedData> {
        let mut seen = HashSet::new();
        Ok(pull
            .files
            .iter()
            .map(|file| parent_directory(&file.path))
            .filter(|directory| seen.insert(directory.clone()))
            .collect())
    }
}

fn parent_directory(path: &str) -> String {
    Path::new(path)
        .parent()
        .and_then(Path::to_str)
        .filter(|parent| !parent.is_empty())
        .unwrap_or(ROOT_DIRECTORY)
        .to_owned()
}

/// Buckets conflicting pull requests under their author.
///
/// Unknown mergeability is not a conflict.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictClassifier;

impl Classifier for ConflictClassifier {
    fn index(&self) -> IndexName {
        IndexName::ByConflict
    }

    fn classify(&self, pull: &EnrichedPullRequest) -> Result<Vec<String>, MalformedData> {
        let conflicting = pull.pull.mergeable == Mergeability::Conflicting
            || pull.pull.merge_state == MergeState::Dirty;
        Ok(author_if(conflicting, pull))
    }
}

/// Buckets pull requests with failing checks under their author.
#[derive(Debug, Clone, Copy, Default)]
pub struct CiFailureClassifier;

impl Classifier for CiFailureClassifier {
    fn index(&self) -> IndexName {
        IndexName::ByCiFailure
    }

    fn classify(&self, pull: &EnrichedPullRequest) -> Result<Vec<String>, MalformedData> {
        Ok(author_if(pull.pull.merge_state == MergeState::Unstable, pull))
    }
}

/// Buckets pull requests containing a merge commit under their author.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeCommitClassifier;

impl Classifier for MergeCommitClassifier {
    fn index(&self) -> IndexName {
        IndexName::ByMergeCommit
    }

    fn classify(&self, pull: &EnrichedPullRequest) -> Result<Vec<String>, MalformedData> {
        let has_merge = pull.commits.iter().any(|commit| commit.parent_count > 1);
        Ok(author_if(has_merge, pull))
    }
}

/// Buckets pull requests whose commits come from several email addresses
/// under their author.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiAuthorClassifier;

impl Classifier for MultiAuthorClassifier {
    fn index(&self) -> IndexName {
        IndexName::ByMultiAuthor
    }

    fn classify(&self, pull: &EnrichedPullRequest) -> Result<Vec<String>, MalformedData> {
        let mut emails = HashSet::new();
        for commit in &pull.commits {
            let email = commit.author_email.as_deref().ok_or_else(|| {
                MalformedData::MissingCommitEmail {
                    sha: commit.sha.clone(),
                }
            })?;
            emails.insert(email);
        }
        Ok(author_if(emails.len() > 1, pull))
    }
}

/// Buckets by the number of reviewers whose latest submitted verdict is an
/// approval.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApprovalCountClassifier;

impl Classifier for ApprovalCountClassifier {
    fn index(&self) -> IndexName {
        IndexName::ByApprovalCount
    }

    fn classify(&self, pull: &EnrichedPullRequest) -> Result<Vec<String>, MalformedData> {
        let mut approvers = HashSet::new();
        // Pending reviews are unsubmitted drafts and change no verdict.
        for review in pull
            .reviews
            .iter()
            .filter(|review| review.state != ReviewState::Pending)
        {
            let reviewer = review.reviewer.as_deref().ok_or_else(|| {
                MalformedData::MissingReviewer {
                    submitted_at: review
                        .submitted_at
                        .clone()
                        .unwrap_or_else(|| "unknown".to_owned()),
                }
            })?;

            if review.state == ReviewState::Approved {
                approvers.insert(reviewer);
            } else {
                approvers.remove(reviewer);
            }
        }
        Ok(vec![approval_key(approvers.len())])
    }
}

/// Bucket key for `count` standing approvals.
#[must_use]
pub fn approval_key(count: usize) -> String {
    format!("Approvals: {count}")
}

fn author_if(condition: bool, pull: &EnrichedPullRequest) -> Vec<String> {
    if condition {
        vec![pull.author.clone()]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
