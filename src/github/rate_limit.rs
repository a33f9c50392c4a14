//! Rate limit information from GitHub API responses.
//!
//! This module provides the `RateLimitInfo` type for capturing rate limit
//! headers returned by the GitHub API, and the `RateLimitPolicy` that decides
//! how long to pause before the remaining quota runs out.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Remaining-call count below which the client pauses until the reset.
pub const DEFAULT_RATE_LIMIT_THRESHOLD: u32 = 100;

/// Extra seconds slept past the reported reset time.
pub const DEFAULT_RATE_LIMIT_BUFFER_SECONDS: u64 = 10;

/// Rate limit information extracted from GitHub API response headers.
///
/// GitHub includes rate limit headers (`X-RateLimit-Limit`, `X-RateLimit-Remaining`,
/// `X-RateLimit-Reset`) in API responses. This struct captures those values for
/// inspection by callers.
///
/// # Example
///
/// ```
/// use triage::github::rate_limit::RateLimitInfo;
///
/// let info = RateLimitInfo::new(5000, 4999, 1700000000);
/// assert!(!info.is_exhausted());
/// assert_eq!(info.remaining(), 4999);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window.
    limit: u32,
    /// Remaining requests in the current window.
    remaining: u32,
    /// Unix timestamp when the rate limit resets.
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a new rate limit info instance.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// Returns the maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the remaining requests in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns the Unix timestamp when the rate limit resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Returns true if the rate limit has been exhausted.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Calculates seconds until the rate limit resets.
    ///
    /// Returns 0 if the reset time has already passed or if the system time
    /// cannot be determined.
    #[must_use]
    pub fn seconds_until_reset(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0);

        self.reset_at.saturating_sub(now)
    }
}

/// Decides when the client must wait for the quota window to reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    threshold: u32,
    buffer: Duration,
}

impl RateLimitPolicy {
    /// Creates a policy pausing below `threshold` remaining calls and
    /// sleeping `buffer` past the reset time.
    #[must_use]
    pub const fn new(threshold: u32, buffer: Duration) -> Self {
        Self { threshold, buffer }
    }

    /// Remaining-call count that triggers a pause.
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Returns how long to sleep before the next call, if at all.
    #[must_use]
    pub fn pause_before_call(&self, info: &RateLimitInfo) -> Option<Duration> {
        if info.remaining() >= self.threshold {
            return None;
        }

        Some(Duration::from_secs(info.seconds_until_reset()).saturating_add(self.buffer))
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_RATE_LIMIT_THRESHOLD,
            Duration::from_secs(DEFAULT_RATE_LIMIT_BUFFER_SECONDS),
        )
    }
}
