//! Scripted transport used by unit tests across the crate.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

use super::error::TriageError;
use super::gateway::{ApiRequest, RawResponse, Transport};
use super::rate_limit::RateLimitInfo;

type Scripted = Result<RawResponse, TriageError>;

/// One observed call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Encoded path and query.
    pub uri: String,
    /// Tokio clock reading at the time of the call.
    pub at: Instant,
}

/// In-memory transport answering from per-URI response queues.
///
/// Responses for a URI are served in the order they were scripted; the last
/// one repeats once the queue would otherwise run dry. Unscripted URIs
/// answer with [`TriageError::NotFound`].
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw result for `request`.
    pub fn respond(&self, request: &ApiRequest, result: Scripted) {
        self.routes
            .lock()
            .expect("routes lock")
            .entry(request.uri())
            .or_default()
            .push_back(result);
    }

    /// Queues a JSON body without quota headers.
    pub fn respond_json(&self, request: &ApiRequest, body: Value) {
        self.respond(request, Ok(response(body, false, None)));
    }

    /// Queues one page of a collection.
    pub fn respond_page(&self, request: &ApiRequest, body: Value, has_next_page: bool) {
        self.respond(request, Ok(response(body, has_next_page, None)));
    }

    /// Queues a JSON body reporting the given quota.
    pub fn respond_with_quota(&self, request: &ApiRequest, body: Value, quota: RateLimitInfo) {
        self.respond(request, Ok(response(body, false, Some(quota))));
    }

    /// Queues an error for `request`.
    pub fn fail(&self, request: &ApiRequest, error: TriageError) {
        self.respond(request, Err(error));
    }

    /// All calls observed so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Number of calls observed so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    /// Number of calls made for `request`.
    pub fn calls_to(&self, request: &ApiRequest) -> usize {
        let uri = request.uri();
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .filter(|call| call.uri == uri)
            .count()
    }
}

/// Builds a successful response.
pub fn response(body: Value, has_next_page: bool, rate_limit: Option<RateLimitInfo>) -> RawResponse {
    RawResponse {
        rate_limit,
        has_next_page,
        body: body.to_string(),
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, request: &ApiRequest) -> Result<RawResponse, TriageError> {
        let uri = request.uri();
        self.calls.lock().expect("calls lock").push(RecordedCall {
            uri: uri.clone(),
            at: Instant::now(),
        });

        let mut routes = self.routes.lock().expect("routes lock");
        let Some(queue) = routes.get_mut(&uri) else {
            return Err(TriageError::NotFound {
                message: format!("no scripted response for {uri}"),
            });
        };

        if queue.len() > 1 {
            if let Some(next) = queue.pop_front() {
                return next;
            }
        }

        queue.front().cloned().unwrap_or_else(|| {
            Err(TriageError::NotFound {
                message: format!("no scripted response for {uri}"),
            })
        })
    }
}
