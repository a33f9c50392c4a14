//! Scenario state for pull request scan behavioural tests.

use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use triage::{ScanReport, TriageError};
use wiremock::MockServer;

pub(crate) use crate::mock_github::SharedRuntime;

#[derive(ScenarioState, Default)]
pub(crate) struct ScanState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) report: Slot<ScanReport>,
    pub(crate) error: Slot<TriageError>,
}

/// Splits a quoted, comma-separated step argument into trimmed items.
pub(crate) fn list_argument(raw: &str) -> Vec<String> {
    raw.trim_matches('"')
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Strips the quotes Gherkin leaves around string arguments.
pub(crate) fn unquote(raw: &str) -> &str {
    raw.trim_matches('"')
}
