//! Rate-limited, retrying client shared by every GitHub call of a scan.
//!
//! The quota snapshot is the only mutable state shared between calls. It is
//! held behind one async mutex for the whole "check quota, maybe sleep, call,
//! record quota" sequence, so concurrent callers cannot each conclude that
//! budget remains and overspend it together. Retry sleeps happen outside the
//! lock.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::sleep;

use super::error::TriageError;
use super::gateway::{ApiRequest, RawResponse, Transport};
use super::rate_limit::{RateLimitInfo, RateLimitPolicy};

/// Default number of retries after the first failed attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default delay before the first retry.
pub const DEFAULT_RETRY_DELAY_SECONDS: u64 = 5;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(300);

/// Bounded exponential backoff for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy allowing `max_retries` retries, starting at
    /// `initial_delay` and doubling up to five minutes.
    #[must_use]
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay: MAX_RETRY_DELAY.max(initial_delay),
        }
    }

    /// Maximum number of retries after the first attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before the given retry (1-based).
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2_u32.saturating_pow(retry.saturating_sub(1));
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_RETRIES,
            Duration::from_secs(DEFAULT_RETRY_DELAY_SECONDS),
        )
    }
}

/// Issues GitHub calls within the shared quota, retrying transient failures.
pub struct RateLimitedClient<T: Transport> {
    transport: T,
    quota: Mutex<Option<RateLimitInfo>>,
    rate_limit_policy: RateLimitPolicy,
    retry_policy: RetryPolicy,
}

impl<T: Transport> RateLimitedClient<T> {
    /// Wraps a transport with the default rate limit and retry policies.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            quota: Mutex::new(None),
            rate_limit_policy: RateLimitPolicy::default(),
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Replaces the rate limit policy.
    #[must_use]
    pub fn with_rate_limit_policy(mut self, policy: RateLimitPolicy) -> Self {
        self.rate_limit_policy = policy;
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Borrows the wrapped transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the most recently reported quota, if any response carried one.
    pub async fn quota(&self) -> Option<RateLimitInfo> {
        *self.quota.lock().await
    }

    /// Performs a call, waiting out low quota and retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns permanent failures unchanged on first sight, and
    /// [`TriageError::RetriesExhausted`] once a transient failure outlasts
    /// the retry policy.
    pub async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, TriageError> {
        let mut retries = 0_u32;
        loop {
            let error = match self.attempt(request).await {
                Ok(response) => return Ok(response),
                Err(error) if error.is_transient() => error,
                Err(error) => return Err(error),
            };

            if retries >= self.retry_policy.max_retries() {
                return Err(TriageError::RetriesExhausted {
                    operation: request.path().to_owned(),
                    attempts: retries.saturating_add(1),
                    last_error: Box::new(error),
                });
            }

            retries = retries.saturating_add(1);
            let delay = self.retry_policy.delay_for(retries);
            tracing::warn!(
                path = request.path(),
                retry = retries,
                delay_seconds = delay.as_secs(),
                "transient GitHub failure, retrying: {error}"
            );
            sleep(delay).await;
        }
    }

    /// Performs a call and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::execute`], or [`TriageError::Api`] when
    /// the body does not match the expected shape.
    pub async fn get_json<D: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<D, TriageError> {
        let response = self.execute(request).await?;
        decode_body(request, &response.body)
    }

    async fn attempt(&self, request: &ApiRequest) -> Result<RawResponse, TriageError> {
        let mut quota = self.quota.lock().await;

        if let Some(pause) = quota
            .as_ref()
            .and_then(|info| self.rate_limit_policy.pause_before_call(info))
        {
            tracing::warn!(
                remaining = quota.as_ref().map(RateLimitInfo::remaining),
                pause_seconds = pause.as_secs(),
                "GitHub quota low, sleeping until reset"
            );
            sleep(pause).await;
            // The window has rolled over; the next response reports the new quota.
            *quota = None;
        }

        let result = self.transport.get(request).await;
        match &result {
            Ok(RawResponse {
                rate_limit: Some(info),
                ..
            })
            | Err(TriageError::RateLimitExceeded {
                rate_limit: Some(info),
                ..
            }) => *quota = Some(*info),
            _ => {}
        }
        result
    }
}

pub(crate) fn decode_body<D: DeserializeOwned>(
    request: &ApiRequest,
    body: &str,
) -> Result<D, TriageError> {
    serde_json::from_str(body).map_err(|error| TriageError::Api {
        message: format!(
            "{path} response deserialisation failed: {error}",
            path = request.path()
        ),
    })
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
