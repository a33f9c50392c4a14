//! Maps Octocrab failures and HTTP statuses onto [`TriageError`].
//!
//! The split between transient and permanent variants decided here is what
//! the rate-limited client uses to choose between retrying and giving up.

use http::StatusCode;

use crate::github::error::TriageError;
use crate::github::rate_limit::RateLimitInfo;

/// Checks if an octocrab error represents a network/transport issue.
const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether a response is GitHub's rate limit rejection, based on the
/// status plus either the message text or an exhausted quota header.
fn is_rate_limit_rejection(
    status: StatusCode,
    message: &str,
    rate_limit: Option<&RateLimitInfo>,
) -> bool {
    let is_rate_limit_status = matches!(
        status,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let indicates_rate_limit = message.to_lowercase().contains("rate limit")
        || rate_limit.is_some_and(RateLimitInfo::is_exhausted);

    is_rate_limit_status && indicates_rate_limit
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> TriageError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_http_error(
            operation,
            source.status_code,
            Some(source.message.clone()),
            None,
        );
    }

    if is_network_error(error) {
        return TriageError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    TriageError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
    rate_limit: Option<RateLimitInfo>,
) -> TriageError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());

    if is_rate_limit_rejection(status, &message, rate_limit.as_ref()) {
        let detail = match &rate_limit {
            Some(info) => format!(
                "{operation} failed: {message} (resets at {reset})",
                reset = info.reset_at()
            ),
            None => format!("{operation} failed: {message}"),
        };
        return TriageError::RateLimitExceeded {
            rate_limit,
            message: detail,
        };
    }

    let detail = format!("{operation} failed with status {status}: {message}");
    match status {
        StatusCode::UNAUTHORIZED => TriageError::Authentication { message: detail },
        StatusCode::FORBIDDEN => TriageError::Forbidden { message: detail },
        StatusCode::NOT_FOUND => TriageError::NotFound { message: detail },
        StatusCode::REQUEST_TIMEOUT => TriageError::Network { message: detail },
        status if status.is_server_error() => TriageError::Server { message: detail },
        _ => TriageError::Api { message: detail },
    }
}
