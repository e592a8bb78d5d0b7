// system-tests/src/bin/story_spoiler_suite.rs
// ============================================================================
// Module: Story Spoiler Suite Runner
// Description: CLI entrypoint running the ordered suite once.
// Purpose: Run a session against a configured API and write run artifacts.
// Dependencies: clap, system-tests
// ============================================================================

//! ## Overview
//! Runs the story spoiler suite once. Exit code 0 means every case passed, 1
//! means at least one case failed, 2 means configuration or setup failed and
//! no case ran.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use system_tests::config::EnvOverrides;
use system_tests::config::SuiteConfig;
use system_tests::logging;
use system_tests::report::RunSummary;
use system_tests::report::SuiteReporter;
use system_tests::session::run_session;
use system_tests::suite::SUITE_NAME;
use system_tests::suite::story_spoiler_cases;
use tracing::error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// CLI arguments for a suite run.
#[derive(Debug, Parser)]
#[command(name = "story-spoiler-suite", about = "Run the ordered story spoiler API suite.")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// API base URL.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Directory receiving run artifacts.
    #[arg(long, value_name = "DIR")]
    run_root: Option<PathBuf>,
    /// Status expected when a search matches nothing (404 or 400).
    #[arg(long, value_name = "CODE")]
    empty_search_status: Option<u16>,
}

/// Exit code for configuration and setup failures.
const EXIT_SETUP_FAILED: u8 = 2;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entrypoint.
fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();
    let overrides = EnvOverrides {
        base_url: cli.base_url,
        run_root: cli.run_root,
        empty_search_status: cli.empty_search_status,
        ..EnvOverrides::default()
    };
    let config = match SuiteConfig::load_with_overrides(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "configuration failed");
            report_line(&format!("story-spoiler-suite: {err}"));
            return ExitCode::from(EXIT_SETUP_FAILED);
        }
    };
    let mut reporter = match SuiteReporter::new(SUITE_NAME, config.artifacts.run_root.as_deref())
    {
        Ok(reporter) => reporter,
        Err(err) => {
            report_line(&format!("story-spoiler-suite: cannot create run root: {err}"));
            return ExitCode::from(EXIT_SETUP_FAILED);
        }
    };
    let root = reporter.artifacts().root().display().to_string();
    match run_session(&config, story_spoiler_cases()) {
        Ok(report) => {
            let written = reporter.finish_session(&report);
            print_summary(written.as_ref().ok(), &root);
            if let Err(err) = written {
                report_line(&format!("story-spoiler-suite: writing artifacts failed: {err}"));
            }
            if report.passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
        }
        Err(err) => {
            let message = err.to_string();
            if let Err(write_err) = reporter.finish_setup_failure(&message, err.transcript()) {
                report_line(&format!("story-spoiler-suite: writing artifacts failed: {write_err}"));
            }
            report_line(&format!("story-spoiler-suite: {message}"));
            ExitCode::from(EXIT_SETUP_FAILED)
        }
    }
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Prints one line per case and the overall status to stdout.
fn print_summary(summary: Option<&RunSummary>, root: &str) {
    let mut stdout = std::io::stdout();
    if let Some(summary) = summary {
        for case in &summary.cases {
            let mark = if case.passed() { "ok  " } else { "FAIL" };
            let _ = writeln!(stdout, "{mark} {:>2} {}", case.position, case.name);
            if let Some(detail) = &case.detail {
                let _ = writeln!(stdout, "        {detail}");
            }
        }
        let _ = writeln!(stdout, "status: {}", summary.status.as_str());
    }
    let _ = writeln!(stdout, "artifacts: {root}");
}

/// Writes a diagnostic line to stderr.
fn report_line(message: &str) {
    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "{message}");
}
