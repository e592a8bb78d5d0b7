// system-tests/src/report.rs
// ============================================================================
// Module: Suite Reporter
// Description: Summary and transcript artifacts for a suite run.
// Purpose: Write deterministic summaries even when a run is cut short.
// Dependencies: serde, serde_jcs, story-spoiler-client
// ============================================================================

//! ## Overview
//! A [`SuiteReporter`] owns one run directory. It writes `summary.json`
//! (canonical JCS), `summary.md`, and `transcript.json`. A reporter dropped
//! before finishing still writes a summary with status `panic` or `unknown`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use story_spoiler_client::TranscriptEntry;

use crate::session::CaseRecord;
use crate::session::CaseStatus;
use crate::session::SessionReport;
use crate::session::TeardownSummary;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Summary file name (canonical JSON).
pub const SUMMARY_JSON: &str = "summary.json";
/// Summary file name (markdown).
pub const SUMMARY_MARKDOWN: &str = "summary.md";
/// Transcript file name.
pub const TRANSCRIPT_JSON: &str = "transcript.json";

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Final status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every case passed.
    Pass,
    /// At least one case failed.
    Fail,
    /// Configuration or setup failed; no case ran.
    SetupFailed,
    /// The reporter was dropped while panicking.
    Panic,
    /// The reporter was dropped without finishing.
    Unknown,
}

impl RunStatus {
    /// Returns the serialized name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::SetupFailed => "setup_failed",
            Self::Panic => "panic",
            Self::Unknown => "unknown",
        }
    }
}

/// Contents of `summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Suite name.
    pub suite: String,
    /// Final status.
    pub status: RunStatus,
    /// Start time in Unix milliseconds.
    pub started_at_ms: u64,
    /// End time in Unix milliseconds.
    pub ended_at_ms: u64,
    /// Run duration in milliseconds.
    pub duration_ms: u64,
    /// Case records in execution order.
    pub cases: Vec<CaseRecord>,
    /// Teardown outcome, absent when no session ran.
    pub teardown: Option<TeardownSummary>,
    /// Free-form notes such as the setup error.
    pub notes: Vec<String>,
    /// Files written next to the summary.
    pub artifacts: Vec<String>,
}

// ============================================================================
// SECTION: Artifacts
// ============================================================================

/// Writer for one run directory.
#[derive(Debug, Clone)]
pub struct RunArtifacts {
    /// Directory receiving the files.
    root: PathBuf,
}

impl RunArtifacts {
    /// Creates the run directory, defaulting to a timestamped directory under
    /// `target/story-spoiler`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created.
    pub fn new(suite: &str, run_root: Option<&Path>) -> io::Result<Self> {
        let root = run_root.map_or_else(|| default_run_root(suite), Path::to_path_buf);
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
        })
    }

    /// Returns the run directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a JSON artifact using canonical JCS serialization.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when serialization or the write fails.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        let bytes = serde_jcs::to_vec(value).map_err(|err| io::Error::other(err.to_string()))?;
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Writes a UTF-8 text artifact.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the write fails.
    pub fn write_text(&self, name: &str, value: &str) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        fs::write(&path, value.as_bytes())?;
        Ok(path)
    }
}

// ============================================================================
// SECTION: Reporter
// ============================================================================

/// Writes run summaries, including when the run is cut short.
#[derive(Debug)]
pub struct SuiteReporter {
    /// Output directory.
    artifacts: RunArtifacts,
    /// Suite name.
    suite: String,
    /// Start time in Unix milliseconds.
    started_at_ms: u64,
    /// Whether a summary has been written.
    finalized: bool,
}

impl SuiteReporter {
    /// Creates a reporter writing into `run_root` or the default location.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the run directory cannot be created.
    pub fn new(suite: &str, run_root: Option<&Path>) -> io::Result<Self> {
        Ok(Self {
            artifacts: RunArtifacts::new(suite, run_root)?,
            suite: suite.to_string(),
            started_at_ms: now_millis(),
            finalized: false,
        })
    }

    /// Returns the artifact writer.
    #[must_use]
    pub const fn artifacts(&self) -> &RunArtifacts {
        &self.artifacts
    }

    /// Writes the transcript and summary of a finished session.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when an artifact cannot be written.
    pub fn finish_session(&mut self, report: &SessionReport) -> io::Result<RunSummary> {
        self.artifacts.write_json(TRANSCRIPT_JSON, &report.transcript)?;
        let status = if report.passed() { RunStatus::Pass } else { RunStatus::Fail };
        let notes = report
            .teardown
            .failures
            .iter()
            .map(|failure| {
                let target = failure.story_id.as_deref().unwrap_or("<list>");
                format!("teardown {target}: {}", failure.reason)
            })
            .collect();
        self.finish(
            status,
            report.cases.clone(),
            Some(report.teardown.clone()),
            notes,
            vec![TRANSCRIPT_JSON.to_string()],
        )
    }

    /// Writes the summary of a run that failed before any case executed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when an artifact cannot be written.
    pub fn finish_setup_failure(
        &mut self,
        reason: &str,
        transcript: &[TranscriptEntry],
    ) -> io::Result<RunSummary> {
        self.artifacts.write_json(TRANSCRIPT_JSON, &transcript)?;
        self.finish(
            RunStatus::SetupFailed,
            Vec::new(),
            None,
            vec![reason.to_string()],
            vec![TRANSCRIPT_JSON.to_string()],
        )
    }

    /// Writes `summary.json` and `summary.md`.
    fn finish(
        &mut self,
        status: RunStatus,
        cases: Vec<CaseRecord>,
        teardown: Option<TeardownSummary>,
        notes: Vec<String>,
        artifacts: Vec<String>,
    ) -> io::Result<RunSummary> {
        let ended_at_ms = now_millis();
        let summary = RunSummary {
            suite: self.suite.clone(),
            status,
            started_at_ms: self.started_at_ms,
            ended_at_ms,
            duration_ms: ended_at_ms.saturating_sub(self.started_at_ms),
            cases,
            teardown,
            notes,
            artifacts,
        };
        self.artifacts.write_json(SUMMARY_JSON, &summary)?;
        self.artifacts.write_text(SUMMARY_MARKDOWN, &summary_markdown(&summary))?;
        self.finalized = true;
        Ok(summary)
    }
}

impl Drop for SuiteReporter {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        let status = if std::thread::panicking() { RunStatus::Panic } else { RunStatus::Unknown };
        let _ = self.finish(
            status,
            Vec::new(),
            None,
            vec!["run terminated without explicit summary".to_string()],
            Vec::new(),
        );
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Current time in Unix milliseconds, saturating at `u64::MAX`.
fn now_millis() -> u64 {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Timestamped run directory for `suite`.
fn default_run_root(suite: &str) -> PathBuf {
    PathBuf::from("target/story-spoiler").join(format!("run_{}", now_millis())).join(suite)
}

/// Renders the markdown summary.
#[must_use]
pub fn summary_markdown(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str("# Story Spoiler Suite Summary\n\n");
    out.push_str("## Status\n\n");
    let _ = writeln!(out, "- Suite: {}", summary.suite);
    let _ = writeln!(out, "- Status: {}", summary.status.as_str());
    let _ = writeln!(out, "- Duration (ms): {}", summary.duration_ms);
    out.push_str("\n## Cases\n\n");
    if summary.cases.is_empty() {
        out.push_str("- None\n");
    } else {
        out.push_str("| # | Order | Case | Status | ms | Detail |\n");
        out.push_str("|---|---|---|---|---|---|\n");
        for case in &summary.cases {
            let order = case.order.map_or_else(|| "-".to_string(), |order| order.to_string());
            let status = match case.status {
                CaseStatus::Pass => "pass",
                CaseStatus::Fail => "fail",
            };
            let detail = case.detail.as_deref().unwrap_or("").replace('|', "\\|");
            let _ = writeln!(
                out,
                "| {} | {order} | {} | {status} | {} | {detail} |",
                case.position, case.name, case.duration_ms
            );
        }
    }
    out.push_str("\n## Teardown\n\n");
    match &summary.teardown {
        Some(teardown) => {
            let _ = writeln!(out, "- Listed: {}", teardown.listed);
            let _ = writeln!(out, "- Deleted: {}", teardown.deleted);
            let _ = writeln!(out, "- Failures: {}", teardown.failures.len());
        }
        None => out.push_str("- Not run\n"),
    }
    out.push_str("\n## Notes\n\n");
    if summary.notes.is_empty() {
        out.push_str("- None\n");
    } else {
        for note in &summary.notes {
            let _ = writeln!(out, "- {note}");
        }
    }
    out
}

