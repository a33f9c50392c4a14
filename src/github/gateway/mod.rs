//! Transport seam for issuing GitHub REST calls.
//!
//! The [`Transport`] trait performs exactly one authenticated `GET` and
//! reports what the rate-limited client needs to know about the response:
//! quota headers, whether another page follows, and the raw body. Keeping
//! the seam this narrow lets tests substitute scripted responses while the
//! Octocrab implementation handles real HTTP requests.

mod client;
mod error_mapping;
mod http_utils;
mod octocrab_transport;

pub use octocrab_transport::OctocrabTransport;

use async_trait::async_trait;
use url::form_urlencoded;

use crate::github::error::TriageError;
use crate::github::rate_limit::RateLimitInfo;

/// A `GET` request against the GitHub REST API, relative to the API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    path: String,
    query: Vec<(String, String)>,
}

impl ApiRequest {
    /// Creates a request for `path` with no query parameters.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Appends a query parameter, keeping insertion order.
    #[must_use]
    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    /// Returns a copy of this request addressing one page of a collection.
    #[must_use]
    pub fn for_page(&self, per_page: u8, page: u32) -> Self {
        self.clone()
            .with_query("per_page", per_page)
            .with_query("page", page)
    }

    /// Request path without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path and encoded query string, as sent on the wire.
    #[must_use]
    pub fn uri(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        format!("{}?{query}", self.path)
    }
}

/// Successful response data consumed by the client and paginator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Quota reported by the response headers, when present.
    pub rate_limit: Option<RateLimitInfo>,
    /// Whether the `Link` header advertises a `rel="next"` page.
    pub has_next_page: bool,
    /// Response body as text.
    pub body: String,
}

/// Issues single GitHub API calls.
///
/// Implementations map every non-success status into a [`TriageError`] so
/// that the caller can decide between retrying and giving up.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one `GET` request.
    async fn get(&self, request: &ApiRequest) -> Result<RawResponse, TriageError>;
}
