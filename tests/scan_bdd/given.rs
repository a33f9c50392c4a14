//! Given steps seeding the mock GitHub API.

use rstest_bdd_macros::given;
use serde_json::{Value, json};
use triage::TriageError;

use crate::mock_github::{OVERRIDE_PRIORITY, mount_json};
use crate::scan_bdd_state::{ScanState, list_argument, unquote};

fn mount(
    scan_state: &ScanState,
    route: &str,
    body: &Value,
    priority: Option<u8>,
) -> Result<(), TriageError> {
    mount_json(
        &scan_state.runtime,
        &scan_state.server,
        route,
        200,
        body,
        priority,
    )
}

fn commit(sha: &str, email: &str, parents: usize) -> Value {
    let parent_shas: Vec<Value> = (0..parents)
        .map(|index| json!({ "sha": format!("{sha}-parent-{index}") }))
        .collect();
    json!({
        "sha": sha,
        "commit": { "author": { "email": email }, "message": format!("commit {sha}") },
        "parents": parent_shas
    })
}

fn seed_pull_request(
    scan_state: &ScanState,
    repository: &str,
    number: u64,
    author: &str,
    files: &[String],
) -> Result<(), TriageError> {
    let base = format!("/repos/{repository}/pulls/{number}");
    let detail = json!({
        "number": number,
        "title": format!("Change {number}"),
        "html_url": format!("https://github.com/{repository}/pull/{number}"),
        "user": { "login": author },
        "head": { "user": { "login": author } },
        "mergeable": true,
        "mergeable_state": "clean",
        "updated_at": "2026-01-01T00:00:00Z"
    });
    let changed: Vec<Value> = files
        .iter()
        .map(|file| json!({ "filename": file }))
        .collect();
    let commits = json!([commit(&format!("{number}a"), &format!("{author}@example.com"), 1)]);

    mount(scan_state, &base, &detail, None)?;
    mount(scan_state, &format!("{base}/files"), &Value::from(changed), None)?;
    mount(scan_state, &format!("{base}/commits"), &commits, None)?;
    mount(scan_state, &format!("{base}/reviews"), &json!([]), None)
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("repository {repository} has open pull requests {numbers}")]
fn seed_repository(
    scan_state: &ScanState,
    repository: String,
    numbers: String,
) -> Result<(), TriageError> {
    let name = unquote(&repository);
    let listing: Vec<Value> = list_argument(&numbers)
        .iter()
        .map(|number| {
            number
                .parse::<u64>()
                .map(|parsed| json!({ "number": parsed }))
                .map_err(|error| TriageError::Io {
                    message: format!("bad pull request number {number}: {error}"),
                })
        })
        .collect::<Result<_, _>>()?;

    mount(
        scan_state,
        &format!("/repos/{name}"),
        &json!({ "full_name": name }),
        None,
    )?;
    mount(
        scan_state,
        &format!("/repos/{name}/pulls"),
        &Value::from(listing),
        None,
    )
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("repository {repository} does not exist")]
fn seed_missing_repository(scan_state: &ScanState, repository: String) -> Result<(), TriageError> {
    mount_json(
        &scan_state.runtime,
        &scan_state.server,
        &format!("/repos/{}", unquote(&repository)),
        404,
        &json!({ "message": "Not Found" }),
        None,
    )
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("pull request {number:u64} in {repository} is by {author} and touches files {files}")]
fn seed_pull_request_with_files(
    scan_state: &ScanState,
    number: u64,
    repository: String,
    author: String,
    files: String,
) -> Result<(), TriageError> {
    seed_pull_request(
        scan_state,
        unquote(&repository),
        number,
        unquote(&author),
        &list_argument(&files),
    )
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("pull request {number:u64} in {repository} is by {author} and touches {count:usize} generated files")]
fn seed_large_pull_request(
    scan_state: &ScanState,
    number: u64,
    repository: String,
    author: String,
    count: usize,
) -> Result<(), TriageError> {
    let files: Vec<String> = (0..count)
        .map(|index| format!("gen/file_{index}.rs"))
        .collect();
    seed_pull_request(
        scan_state,
        unquote(&repository),
        number,
        unquote(&author),
        &files,
    )
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("pull request {number:u64} in {repository} contains a merge commit by {email}")]
fn seed_merge_commit(
    scan_state: &ScanState,
    number: u64,
    repository: String,
    email: String,
) -> Result<(), TriageError> {
    let commits = json!([
        commit(&format!("{number}a"), "author@example.com", 1),
        commit(&format!("{number}m"), unquote(&email), 2)
    ]);
    mount(
        scan_state,
        &format!("/repos/{}/pulls/{number}/commits", unquote(&repository)),
        &commits,
        Some(OVERRIDE_PRIORITY),
    )
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("pull request {number:u64} in {repository} is approved by {reviewer}")]
fn seed_approval(
    scan_state: &ScanState,
    number: u64,
    repository: String,
    reviewer: String,
) -> Result<(), TriageError> {
    let reviews = json!([{
        "user": { "login": unquote(&reviewer) },
        "state": "APPROVED",
        "submitted_at": "2026-01-02T00:00:00Z"
    }]);
    mount(
        scan_state,
        &format!("/repos/{}/pulls/{number}/reviews", unquote(&repository)),
        &reviews,
        Some(OVERRIDE_PRIORITY),
    )
}
