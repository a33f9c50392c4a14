//! Then steps inspecting the scan report.

use rstest_bdd_macros::then;
use triage::ScanReport;
use triage::scan::IndexName;

use crate::scan_bdd_state::{ScanState, list_argument, unquote};

fn report(scan_state: &ScanState) -> ScanReport {
    let maybe_report = scan_state.report.get();
    let Some(found) = maybe_report else {
        let error = scan_state.error.get();
        panic!("scan report missing; last error: {error:?}");
    };
    found
}

#[then("the report counts {count:usize} pull requests")]
fn assert_pull_request_count(scan_state: &ScanState, count: usize) {
    assert_eq!(report(scan_state).pull_request_count, count);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the {index} index files pull request {number:u64} under {key}")]
fn assert_bucket_membership(scan_state: &ScanState, index: String, number: u64, key: String) {
    let name = unquote(&index);
    let Some(index_name) = IndexName::ALL
        .into_iter()
        .find(|candidate| candidate.as_str() == name)
    else {
        panic!("unknown index {name}");
    };
    let scanned = report(scan_state);
    let Some(classification) = scanned.index(index_name) else {
        panic!("index {name} missing from report");
    };
    let expected_key = unquote(&key);
    let Some(pulls) = classification.get(expected_key) else {
        let keys: Vec<&str> = classification.keys().collect();
        panic!("{name} has no bucket {expected_key}; buckets: {keys:?}");
    };

    assert!(
        pulls.iter().any(|pull| pull.number == number),
        "pull request {number} not filed under {expected_key} in {name}"
    );
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("repository {repository} is reported as skipped")]
fn assert_repository_skipped(scan_state: &ScanState, repository: String) {
    let name = unquote(&repository);
    let scanned = report(scan_state);

    assert!(
        scanned
            .failed_repositories
            .iter()
            .any(|failure| failure.repository == name),
        "{name} not listed among {:?}",
        scanned.failed_repositories
    );
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the author ranking is {authors}")]
fn assert_author_ranking(scan_state: &ScanState, authors: String) {
    let scanned = report(scan_state);
    let ranking: Vec<&str> = scanned.author_ranking.authors().collect();

    assert_eq!(ranking, list_argument(&authors));
}
