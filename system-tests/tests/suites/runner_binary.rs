// system-tests/tests/suites/runner_binary.rs
// ============================================================================
// Module: Runner Binary Tests
// Description: Exit codes and artifacts of the story-spoiler-suite binary.
// Purpose: Verify the CLI maps run outcomes onto exit codes 0, 1, and 2.
// Dependencies: system-tests helpers
// ============================================================================

use std::error::Error;
use std::path::Path;
use std::process::Command;
use std::process::Output;

use serde_json::Value;
use system_tests::config::SuiteEnv;

use crate::helpers::fixtures::stub_config;
use crate::helpers::fixtures::write_config_file;
use crate::helpers::spoiler_stub::StubOptions;
use crate::helpers::spoiler_stub::spawn_spoiler_stub;

const SUITE_ENV: [SuiteEnv; 8] = [
    SuiteEnv::ConfigPath,
    SuiteEnv::BaseUrl,
    SuiteEnv::Username,
    SuiteEnv::Password,
    SuiteEnv::TimeoutSeconds,
    SuiteEnv::EmptySearchStatus,
    SuiteEnv::RunRoot,
    SuiteEnv::LogLevel,
];

fn run_suite(args: &[&str]) -> std::io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_story-spoiler-suite"));
    for key in SUITE_ENV {
        command.env_remove(key.as_str());
    }
    command.args(args).output()
}

fn summary_status(run_root: &Path) -> Result<String, Box<dyn Error>> {
    let json: Value = serde_json::from_slice(&std::fs::read(run_root.join("summary.json"))?)?;
    Ok(json["status"].as_str().unwrap_or_default().to_string())
}

#[test]
fn passing_run_exits_zero() -> Result<(), Box<dyn Error>> {
    let stub = spawn_spoiler_stub(StubOptions::default())?;
    let dir = tempfile::tempdir()?;
    let run_root = dir.path().join("run");
    let config_path = write_config_file(dir.path(), &stub_config(stub.base_url(), &run_root))?;

    let output = run_suite(&["--config", config_path.to_str().ok_or("utf-8 path")?])?;
    if output.status.code() != Some(0) {
        return Err(format!("exit {:?}: {}", output.status, String::from_utf8_lossy(&output.stderr))
            .into());
    }
    if summary_status(&run_root)? != "pass" {
        return Err("summary should record pass".into());
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("status: pass") {
        return Err(format!("unexpected stdout: {stdout}").into());
    }
    Ok(())
}

#[test]
fn failing_case_exits_one() -> Result<(), Box<dyn Error>> {
    let stub = spawn_spoiler_stub(StubOptions {
        empty_search_status: 400,
        ..StubOptions::default()
    })?;
    let dir = tempfile::tempdir()?;
    let run_root = dir.path().join("run");
    let config_path = write_config_file(dir.path(), &stub_config(stub.base_url(), &run_root))?;

    let output = run_suite(&["--config", config_path.to_str().ok_or("utf-8 path")?])?;
    if output.status.code() != Some(1) {
        return Err(format!("expected exit 1, got {:?}", output.status).into());
    }
    if summary_status(&run_root)? != "fail" {
        return Err("summary should record fail".into());
    }

    let override_root = dir.path().join("override");
    let output = run_suite(&[
        "--config",
        config_path.to_str().ok_or("utf-8 path")?,
        "--empty-search-status",
        "400",
        "--run-root",
        override_root.to_str().ok_or("utf-8 path")?,
    ])?;
    if output.status.code() != Some(0) || summary_status(&override_root)? != "pass" {
        return Err("command-line expectation should override the file".into());
    }
    Ok(())
}

#[test]
fn setup_failure_exits_two() -> Result<(), Box<dyn Error>> {
    let stub = spawn_spoiler_stub(StubOptions::default())?;
    let dir = tempfile::tempdir()?;
    let run_root = dir.path().join("run");
    let mut config = stub_config(stub.base_url(), &run_root);
    config.credentials.password = "wrong".to_string();
    let config_path = write_config_file(dir.path(), &config)?;

    let output = run_suite(&["--config", config_path.to_str().ok_or("utf-8 path")?])?;
    if output.status.code() != Some(2) {
        return Err(format!("expected exit 2, got {:?}", output.status).into());
    }
    if summary_status(&run_root)? != "setup_failed" || stub.story_requests() != 0 {
        return Err("setup failure must be recorded before any story request".into());
    }
    Ok(())
}

#[test]
fn invalid_configuration_exits_two() -> Result<(), Box<dyn Error>> {
    let output = run_suite(&["--base-url", "ftp://spoilers.example"])?;
    if output.status.code() != Some(2) {
        return Err(format!("expected exit 2, got {:?}", output.status).into());
    }
    let output = run_suite(&["--empty-search-status", "418"])?;
    if output.status.code() != Some(2) {
        return Err(format!("expected exit 2, got {:?}", output.status).into());
    }
    Ok(())
}
