//! Behavioural tests for scanning repositories into a triage report.

#[path = "support/mock_github.rs"]
mod mock_github;
#[path = "scan_bdd/given.rs"]
mod scan_bdd_given;
#[path = "scan_bdd/state.rs"]
mod scan_bdd_state;
#[path = "scan_bdd/then.rs"]
mod scan_bdd_then;
#[path = "scan_bdd/when.rs"]
mod scan_bdd_when;

use rstest::fixture;
use rstest_bdd_macros::scenario;

use scan_bdd_state::ScanState;

#[fixture]
fn scan_state() -> ScanState {
    ScanState::default()
}

#[scenario(path = "tests/features/scan.feature", index = 0)]
fn repositories_share_indices(scan_state: ScanState) {
    let _ = scan_state;
}

#[scenario(path = "tests/features/scan.feature", index = 1)]
fn missing_repository_is_skipped(scan_state: ScanState) {
    let _ = scan_state;
}

#[scenario(path = "tests/features/scan.feature", index = 2)]
fn large_pull_requests_overflow(scan_state: ScanState) {
    let _ = scan_state;
}

#[scenario(path = "tests/features/scan.feature", index = 3)]
fn merge_commits_are_flagged(scan_state: ScanState) {
    let _ = scan_state;
}

#[scenario(path = "tests/features/scan.feature", index = 4)]
fn authors_are_ranked(scan_state: ScanState) {
    let _ = scan_state;
}
