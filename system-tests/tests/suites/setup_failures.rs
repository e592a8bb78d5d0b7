// system-tests/tests/suites/setup_failures.rs
// ============================================================================
// Module: Setup Failure Tests
// Description: Session aborts that must happen before any case runs.
// Purpose: Verify authentication failures and invalid case lists fail fast.
// Dependencies: system-tests helpers
// ============================================================================

use std::error::Error;

use story_spoiler_client::ApiError;
use story_spoiler_client::AuthError;
use story_spoiler_client::StatusCode;
use system_tests::check::CaseResult;
use system_tests::session::OrderedCase;
use system_tests::session::SessionContext;
use system_tests::session::SessionError;
use system_tests::session::run_session;
use system_tests::suite::story_spoiler_cases;

use crate::helpers::fixtures::stub_config;
use crate::helpers::spoiler_stub::StubOptions;
use crate::helpers::spoiler_stub::spawn_spoiler_stub;

#[test]
fn rejected_credentials_abort_before_story_requests() -> Result<(), Box<dyn Error>> {
    let stub = spawn_spoiler_stub(StubOptions::default())?;
    let dir = tempfile::tempdir()?;
    let mut config = stub_config(stub.base_url(), dir.path());
    config.credentials.password = "wrong".to_string();

    let err = run_session(&config, story_spoiler_cases()).err().ok_or("expected setup failure")?;
    let SessionError::Setup { source: AuthError::Status(StatusCode::UNAUTHORIZED), .. } = &err
    else {
        return Err(format!("unexpected error: {err}").into());
    };
    if err.transcript().len() != 1 || stub.auth_requests() != 1 {
        return Err("authentication must be attempted exactly once".into());
    }
    if stub.story_requests() != 0 {
        return Err("no story endpoint may be contacted after setup failure".into());
    }
    Ok(())
}

#[test]
fn blank_token_aborts_before_story_requests() -> Result<(), Box<dyn Error>> {
    let stub = spawn_spoiler_stub(StubOptions {
        token: "   ".to_string(),
        ..StubOptions::default()
    })?;
    let dir = tempfile::tempdir()?;
    let config = stub_config(stub.base_url(), dir.path());

    let err = run_session(&config, story_spoiler_cases()).err().ok_or("expected setup failure")?;
    if !matches!(err, SessionError::Setup { source: AuthError::BlankToken, .. }) {
        return Err(format!("unexpected error: {err}").into());
    }
    if stub.story_requests() != 0 {
        return Err("no story endpoint may be contacted after setup failure".into());
    }
    Ok(())
}

#[test]
fn unreachable_api_is_setup_fatal() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let config = stub_config("http://127.0.0.1:1", dir.path());

    let err = run_session(&config, story_spoiler_cases()).err().ok_or("expected setup failure")?;
    if !matches!(
        err,
        SessionError::Setup { source: AuthError::Request(ApiError::Transport(_)), .. }
    ) {
        return Err(format!("unexpected error: {err}").into());
    }
    Ok(())
}

#[test]
fn invalid_case_list_is_rejected_before_authentication() -> Result<(), Box<dyn Error>> {
    let stub = spawn_spoiler_stub(StubOptions::default())?;
    let dir = tempfile::tempdir()?;
    let config = stub_config(stub.base_url(), dir.path());
    let mut cases = story_spoiler_cases();
    cases.push(OrderedCase::pinned(1, "create_again", create_again));

    let err = run_session(&config, cases).err().ok_or("expected runner error")?;
    if !matches!(err, SessionError::Runner(_)) {
        return Err(format!("unexpected error: {err}").into());
    }
    if stub.auth_requests() != 0 {
        return Err("authentication must not run for an invalid case list".into());
    }
    Ok(())
}

fn create_again(ctx: &mut SessionContext) -> CaseResult {
    ctx.client().create_story(ctx.story())?;
    Ok(())
}
