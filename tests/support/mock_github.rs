//! Wiremock-backed GitHub API shared by the integration tests.
//!
//! The server and the Tokio runtime driving it live in `rstest-bdd` slots so
//! that synchronous step functions can mount routes and run scans.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use rstest_bdd::Slot;
use serde_json::Value;
use tokio::runtime::Runtime;
use triage::TriageError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Priority for routes that replace a default response mounted earlier.
pub const OVERRIDE_PRIORITY: u8 = 1;

/// Runtime handle that can be stored in a `Slot`.
#[derive(Clone)]
pub struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

/// Starts the runtime and mock server on first use.
///
/// # Errors
///
/// Returns [`TriageError::Io`] when the runtime cannot be created.
pub fn ensure_runtime_and_server(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
) -> Result<SharedRuntime, TriageError> {
    if runtime.with_ref(|_| ()).is_none() {
        let created = Runtime::new().map_err(|error| TriageError::Io {
            message: format!("failed to create Tokio runtime: {error}"),
        })?;
        runtime.set(SharedRuntime::new(created));
    }

    let shared_runtime = runtime.get().ok_or_else(|| TriageError::Io {
        message: "runtime not initialised after set".to_owned(),
    })?;

    if server.with_ref(|_| ()).is_none() {
        server.set(shared_runtime.block_on(MockServer::start()));
    }

    Ok(shared_runtime)
}

/// Answers `GET route` with `status` and a JSON body.
///
/// Routes match on path only, so paginated requests hit the same mock.
///
/// # Errors
///
/// Returns [`TriageError::Io`] when the runtime cannot be created.
pub fn mount_json(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
    route: &str,
    status: u16,
    body: &Value,
    priority: Option<u8>,
) -> Result<(), TriageError> {
    let shared_runtime = ensure_runtime_and_server(runtime, server)?;

    let mut mock = Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body));
    if let Some(value) = priority {
        mock = mock.with_priority(value);
    }

    server
        .with_ref(|mock_server| shared_runtime.block_on(mock.mount(mock_server)))
        .ok_or_else(|| TriageError::Io {
            message: "mock server not initialised".to_owned(),
        })
}
