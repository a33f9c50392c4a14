//! Error types exposed by the GitHub access layer and the scan pipeline.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while configuring a scan or communicating with GitHub.
///
/// Variants split into two families: transient failures that the
/// rate-limited client retries ([`TriageError::is_transient`]) and permanent
/// failures that propagate to the caller on first sight.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TriageError {
    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// A configured repository identifier is not of the form `owner/name`.
    #[error("repository identifier `{identifier}` must be of the form owner/name")]
    InvalidRepository {
        /// The identifier as written in configuration.
        identifier: String,
    },

    /// The API base URL or a request path could not be parsed.
    #[error("GitHub URL is invalid: {0}")]
    InvalidUrl(String),

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401 response.
        message: String,
    },

    /// The token is valid but may not read the requested resource.
    #[error("GitHub denied access: {message}")]
    Forbidden {
        /// GitHub error message returned with the 403 response.
        message: String,
    },

    /// The requested resource does not exist or is hidden from the token.
    #[error("GitHub resource not found: {message}")]
    NotFound {
        /// Response detail from GitHub.
        message: String,
    },

    /// GitHub returned a permanent API error or an unreadable payload.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// GitHub answered with a server-side (5xx) error.
    #[error("GitHub server error: {message}")]
    Server {
        /// Status and message returned by GitHub.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with a rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit info if available from response headers.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// A transient failure persisted through every permitted retry.
    #[error("{operation} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Request path that kept failing.
        operation: String,
        /// Number of attempts made, including the first.
        attempts: u32,
        /// The failure observed on the final attempt.
        last_error: Box<TriageError>,
    },

    /// Invalid pagination parameters.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// A report template failed to compile or render.
    #[error("report rendering failed: {message}")]
    Template {
        /// Error detail from the template engine.
        message: String,
    },
}

impl TriageError {
    /// Returns true when retrying the same request may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Server { .. } | Self::RateLimitExceeded { .. }
        )
    }

    /// Returns true when the error means one repository cannot be read with
    /// the configured token (missing, renamed, or not accessible).
    ///
    /// A rejected token is not a resolution failure: it affects every
    /// repository alike.
    #[must_use]
    pub const fn is_resolution_failure(&self) -> bool {
        matches!(self, Self::Forbidden { .. } | Self::NotFound { .. })
    }
}
