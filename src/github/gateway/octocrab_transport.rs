//! Octocrab-backed implementation of the [`Transport`] seam.

use async_trait::async_trait;
use http::Uri;
use http::header::LINK;
use octocrab::Octocrab;

use crate::github::error::TriageError;
use crate::github::locator::PersonalAccessToken;

use super::client::build_octocrab_client;
use super::error_mapping::{map_http_error, map_octocrab_error};
use super::http_utils::{extract_github_message, has_next_link, rate_limit_from_headers};
use super::{ApiRequest, RawResponse, Transport};

/// Octocrab-backed transport.
///
/// Requests go through Octocrab's raw `GET` so that status codes and quota
/// headers stay visible to the caller instead of being folded into
/// Octocrab's own error type.
pub struct OctocrabTransport {
    client: Octocrab,
}

impl OctocrabTransport {
    /// Creates a new transport from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidUrl` when the base URI cannot be parsed or
    /// `TriageError::Api` when Octocrab fails to construct a client.
    pub fn for_token(token: &PersonalAccessToken, api_base: &str) -> Result<Self, TriageError> {
        build_octocrab_client(token, api_base).map(Self::new)
    }
}

#[async_trait]
impl Transport for OctocrabTransport {
    async fn get(&self, request: &ApiRequest) -> Result<RawResponse, TriageError> {
        let operation = request.path();
        let uri: Uri = request
            .uri()
            .parse::<Uri>()
            .map_err(|error| TriageError::InvalidUrl(format!("{operation}: {error}")))?;

        let response = self
            .client
            ._get(uri)
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;

        let status = response.status();
        let rate_limit = rate_limit_from_headers(response.headers());
        let has_next_page = has_next_link(response.headers().get(LINK));

        let body = self
            .client
            .body_to_string(response)
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;

        if !status.is_success() {
            return Err(map_http_error(
                operation,
                status,
                extract_github_message(&body),
                rate_limit,
            ));
        }

        Ok(RawResponse {
            rate_limit,
            has_next_page,
            body,
        })
    }
}
