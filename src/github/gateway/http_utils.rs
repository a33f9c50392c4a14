//! Header and body helpers for the Octocrab transport.

use http::header::{HeaderMap, HeaderValue};

use crate::github::rate_limit::RateLimitInfo;

const RATE_LIMIT_LIMIT: &str = "x-ratelimit-limit";
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

pub(super) fn header_to_string(header_value: Option<&HeaderValue>) -> Option<String> {
    header_value
        .and_then(|raw| raw.to_str().ok())
        .map(ToOwned::to_owned)
}

fn parse_header<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    header_to_string(headers.get(name))?.trim().parse().ok()
}

/// Reads the quota headers; all three must be present and numeric.
pub(super) fn rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let limit = parse_header::<u32>(headers, RATE_LIMIT_LIMIT)?;
    let remaining = parse_header::<u32>(headers, RATE_LIMIT_REMAINING)?;
    let reset_at = parse_header::<u64>(headers, RATE_LIMIT_RESET)?;
    Some(RateLimitInfo::new(limit, remaining, reset_at))
}

/// Returns true when an RFC 8288 `Link` header lists a `rel="next"` target.
pub(super) fn has_next_link(link: Option<&HeaderValue>) -> bool {
    header_to_string(link).is_some_and(|value| {
        value.split(',').any(|entry| {
            entry
                .split(';')
                .skip(1)
                .any(|param| param.trim().eq_ignore_ascii_case("rel=\"next\""))
        })
    })
}

pub(super) fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
