//! GitHub access for pull request scans.
//!
//! Calls flow through a narrow [`Transport`] seam into the
//! [`RateLimitedClient`], which shares one quota view between all calls,
//! sleeps when the quota runs low, and retries transient failures. The
//! [`Paginator`] builds lazy collection traversal on top of the client.

pub mod client;
pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod rate_limit;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{RateLimitedClient, RetryPolicy};
pub use error::TriageError;
pub use gateway::{ApiRequest, OctocrabTransport, RawResponse, Transport};
pub use locator::{PersonalAccessToken, RepositoryLocator, RepositoryName, RepositoryOwner};
pub use models::{
    ChangedFile, Commit, MergeState, Mergeability, PullRequest, Review, ReviewState,
};
pub use pagination::Paginator;
pub use rate_limit::{RateLimitInfo, RateLimitPolicy};
