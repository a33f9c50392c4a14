//! When steps running a scan against the mock API.

use rstest_bdd_macros::when;
use triage::{
    OctocrabTransport, PersonalAccessToken, PullRequestScanner, RateLimitedClient,
    RepositoryLocator, ScanOptions, TriageError,
};
use wiremock::MockServer;

use crate::mock_github::ensure_runtime_and_server;
use crate::scan_bdd_state::{ScanState, list_argument};

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[when("the repositories {repositories} are scanned")]
fn scan_repositories(scan_state: &ScanState, repositories: String) -> Result<(), TriageError> {
    let runtime = ensure_runtime_and_server(&scan_state.runtime, &scan_state.server)?;
    let api_base = scan_state
        .server
        .with_ref(MockServer::uri)
        .ok_or_else(|| TriageError::InvalidUrl("mock server URL missing".to_owned()))?;
    let locators = list_argument(&repositories)
        .iter()
        .map(|identifier| RepositoryLocator::parse(identifier))
        .collect::<Result<Vec<_>, _>>()?;

    let token = PersonalAccessToken::new("test-token")?;

    // The octocrab client spawns background tasks, so it must be built
    // inside the runtime context.
    let outcome = runtime.block_on(async {
        let transport = OctocrabTransport::for_token(&token, &api_base)?;
        let scanner =
            PullRequestScanner::new(RateLimitedClient::new(transport), ScanOptions::default());
        Ok::<_, TriageError>(scanner.scan(&locators).await)
    })?;

    match outcome {
        Ok(report) => {
            drop(scan_state.error.take());
            scan_state.report.set(report);
        }
        Err(error) => {
            drop(scan_state.report.take());
            scan_state.error.set(error);
        }
    }

    Ok(())
}
