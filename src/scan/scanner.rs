//! The scan loop: resolve, list, enrich, classify.
//!
//! Repositories are scanned one after another in configured order, and the
//! pull requests of a repository one after another in listing order. Each
//! pull request is enriched exactly once (detail, files, commits, reviews),
//! handed to every classifier, and then dropped; only its summary survives
//! in the aggregator.

use std::collections::HashSet;

use serde::de::DeserializeOwned;

use crate::github::models::{ApiChangedFile, ApiCommit, ApiPullRequest, ApiRepository, ApiReview};
use crate::github::pagination::DEFAULT_PER_PAGE;
use crate::github::{
    ApiRequest, ChangedFile, Commit, Paginator, PullRequest, RateLimitedClient,
    RepositoryLocator, Review, Transport, TriageError,
};

use super::aggregator::{Aggregator, RepositoryFailure, ScanReport};
use super::classifier::ClassifierSet;
use super::enrich::{EnrichedPullRequest, FileAttribution, resolve_author};

/// Default cap on open pull requests scanned per repository.
pub const DEFAULT_MAX_PULL_REQUESTS: usize = 500;

/// Default number of changed files above which a pull request overflows.
pub const DEFAULT_MAX_FILES_PER_PULL: usize = 10;

/// Default report title.
pub const DEFAULT_TITLE: &str = "Pull request triage";

/// Tunables for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Title carried into the report.
    pub title: String,
    /// Open pull requests scanned per repository, most recently updated
    /// first.
    pub max_pull_requests: usize,
    /// Changed-file count above which `ByFile` uses the overflow bucket.
    pub max_files_per_pull: usize,
    /// Page size for every collection.
    pub per_page: u8,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            max_pull_requests: DEFAULT_MAX_PULL_REQUESTS,
            max_files_per_pull: DEFAULT_MAX_FILES_PER_PULL,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Scans repositories and classifies their open pull requests.
pub struct PullRequestScanner<T: Transport> {
    client: RateLimitedClient<T>,
    classifiers: ClassifierSet,
    options: ScanOptions,
}

impl<T: Transport> PullRequestScanner<T> {
    /// Creates a scanner using the standard classifier set.
    #[must_use]
    pub fn new(client: RateLimitedClient<T>, options: ScanOptions) -> Self {
        Self {
            client,
            classifiers: ClassifierSet::standard(),
            options,
        }
    }

    /// Replaces the classifier set.
    #[must_use]
    pub fn with_classifiers(mut self, classifiers: ClassifierSet) -> Self {
        self.classifiers = classifiers;
        self
    }

    /// Borrows the underlying client.
    #[must_use]
    pub const fn client(&self) -> &RateLimitedClient<T> {
        &self.client
    }

    /// Scans `repositories` in order and builds the report.
    ///
    /// Repositories that cannot be resolved (missing, or not visible to the
    /// token) are logged, recorded in the report and skipped.
    ///
    /// # Errors
    ///
    /// Any other failure aborts the scan without a report: a rejected token,
    /// exhausted retries, API errors while listing or enriching pull
    /// requests, and malformed payloads.
    pub async fn scan(
        &self,
        repositories: &[RepositoryLocator],
    ) -> Result<ScanReport, TriageError> {
        let mut aggregator = Aggregator::new();
        let mut scanned = Vec::new();
        let mut failures = Vec::new();

        for repository in repositories {
            if let Err(error) = self.resolve_repository(repository).await {
                if !error.is_resolution_failure() {
                    return Err(error);
                }
                tracing::error!(%repository, "skipping repository: {error}");
                failures.push(RepositoryFailure {
                    repository: repository.to_string(),
                    reason: error.to_string(),
                });
                continue;
            }

            self.scan_repository(repository, &mut aggregator).await?;
            scanned.push(repository.to_string());
        }

        tracing::info!(
            repositories = scanned.len(),
            failed = failures.len(),
            pull_requests = aggregator.pull_request_count(),
            "scan complete"
        );

        Ok(aggregator.finish(self.options.title.clone(), scanned, failures))
    }

    async fn resolve_repository(&self, repository: &RepositoryLocator) -> Result<(), TriageError> {
        let resolved: ApiRepository = self
            .client
            .get_json(&repository.repository_request())
            .await?;
        tracing::info!(
            %repository,
            full_name = resolved.full_name.as_deref().unwrap_or_default(),
            "scanning repository"
        );
        Ok(())
    }

    async fn scan_repository(
        &self,
        repository: &RepositoryLocator,
        aggregator: &mut Aggregator,
    ) -> Result<(), TriageError> {
        let mut listing = Paginator::<_, ApiPullRequest>::new(
            &self.client,
            repository.open_pulls_request(),
            self.options.per_page,
        )?;

        // Activity during a long scan can push an already listed pull request
        // onto a later page; it is classified once and not counted again.
        let mut seen = HashSet::new();
        let mut scanned = 0_usize;
        while scanned < self.options.max_pull_requests {
            let Some(listed) = listing.next().await? else {
                break;
            };
            if !seen.insert(listed.number) {
                tracing::debug!(%repository, number = listed.number, "pull request listed twice");
                continue;
            }
            scanned = scanned.saturating_add(1);

            let enriched = self.enrich(repository, listed.number).await?;
            let assignments = self.classifiers.classify(&enriched);
            aggregator.record_pull(&enriched.to_ref(), &assignments);
        }

        tracing::info!(%repository, pull_requests = scanned, "repository scanned");
        Ok(())
    }

    async fn enrich(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<EnrichedPullRequest, TriageError> {
        tracing::info!(%repository, number, "classifying pull request");

        let pull: PullRequest = self
            .client
            .get_json::<ApiPullRequest>(&repository.pull_request(number))
            .await?
            .into();
        let author = resolve_author(&pull);

        let files: Vec<ChangedFile> = self
            .collect::<ApiChangedFile>(repository.pull_files_request(number))
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        let commits: Vec<Commit> = self
            .collect::<ApiCommit>(repository.pull_commits_request(number))
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        let reviews: Vec<Review> = self
            .collect::<ApiReview>(repository.pull_reviews_request(number))
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let file_attribution =
            FileAttribution::for_count(files.len(), self.options.max_files_per_pull);

        Ok(EnrichedPullRequest {
            repository: repository.clone(),
            pull,
            author,
            files,
            file_attribution,
            commits,
            reviews,
        })
    }

    async fn collect<Item: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Vec<Item>, TriageError> {
        Paginator::new(&self.client, request, self.options.per_page)?
            .try_collect()
            .await
    }
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
