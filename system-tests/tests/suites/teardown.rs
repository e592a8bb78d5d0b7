// system-tests/tests/suites/teardown.rs
// ============================================================================
// Module: Teardown Tests
// Description: Best-effort cleanup behavior.
// Purpose: Verify cleanup failures are captured and never fail the run.
// Dependencies: system-tests helpers
// ============================================================================

use std::error::Error;

use story_spoiler_client::SpoilerClient;
use system_tests::session::cleanup_stories;
use system_tests::session::run_session;
use system_tests::suite::story_spoiler_cases;

use crate::helpers::fixtures::STUB_TIMEOUT;
use crate::helpers::fixtures::stub_config;
use crate::helpers::spoiler_stub::StubOptions;
use crate::helpers::spoiler_stub::spawn_spoiler_stub;

#[test]
fn undeletable_story_is_reported_and_run_completes() -> Result<(), Box<dyn Error>> {
    let stub = spawn_spoiler_stub(StubOptions {
        locked_stories: vec![("Locked spoiler".to_string(), "Cannot go".to_string())],
        ..StubOptions::default()
    })?;
    let dir = tempfile::tempdir()?;
    let config = stub_config(stub.base_url(), dir.path());

    let report = run_session(&config, story_spoiler_cases())?;
    if !report.passed() {
        return Err("cases should pass alongside a pre-existing story".into());
    }
    let teardown = &report.teardown;
    if teardown.listed != 3 || teardown.deleted != 2 || teardown.failures.len() != 1 {
        return Err(format!("unexpected teardown: {teardown:?}").into());
    }
    let failure = &teardown.failures[0];
    if failure.story_id.as_deref() != Some("locked-1") || !failure.reason.contains("400") {
        return Err(format!("unexpected teardown failure: {failure:?}").into());
    }
    let remaining = stub.stories();
    if remaining.len() != 1 || !remaining[0].locked {
        return Err("only the locked story should remain".into());
    }
    Ok(())
}

#[test]
fn list_failure_is_captured_without_deletes() -> Result<(), Box<dyn Error>> {
    let stub = spawn_spoiler_stub(StubOptions::default())?;
    let client = SpoilerClient::new(stub.base_url(), STUB_TIMEOUT)?;

    let summary = cleanup_stories(&client);
    if summary.listed != 0 || summary.deleted != 0 || summary.failures.len() != 1 {
        return Err(format!("unexpected teardown: {summary:?}").into());
    }
    if summary.failures[0].story_id.is_some() || !summary.failures[0].reason.contains("401") {
        return Err(format!("unexpected failure: {:?}", summary.failures[0]).into());
    }
    if stub.story_requests() != 1 {
        return Err("teardown should stop after the failed list".into());
    }
    Ok(())
}
