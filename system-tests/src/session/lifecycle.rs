// system-tests/src/session/lifecycle.rs
// ============================================================================
// Module: Session Lifecycle
// Description: Setup, ordered run, and teardown for one session.
// Purpose: Authenticate once, run cases in order, and always clean up.
// Dependencies: story-spoiler-client, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`run_session`] validates the case list, builds the client, authenticates,
//! runs every case, and then tears down. Setup failures abort the session
//! before any story endpoint is contacted; case failures never do.

// ============================================================================
// SECTION: Imports
// ============================================================================

use story_spoiler_client::ApiError;
use story_spoiler_client::AuthError;
use story_spoiler_client::SpoilerClient;
use story_spoiler_client::TranscriptEntry;
use story_spoiler_client::authenticate;
use thiserror::Error;
use tracing::error;
use tracing::info;

use super::context::SessionContext;
use super::runner::CaseRecord;
use super::runner::OrderedCase;
use super::runner::RunnerError;
use super::runner::SuiteRunner;
use super::teardown::TeardownSummary;
use super::teardown::cleanup_stories;
use crate::config::SuiteConfig;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures that abort a session before any case runs.
///
/// # Invariants
/// - No case has executed when one of these is returned.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The case list is invalid.
    #[error("invalid case list: {0}")]
    Runner(#[from] RunnerError),
    /// The HTTP client could not be built.
    #[error("client setup failed: {0}")]
    Client(#[from] ApiError),
    /// Authentication failed or returned no usable token.
    #[error("authentication failed: {source}")]
    Setup {
        /// Underlying authentication error.
        #[source]
        source: AuthError,
        /// Exchanges recorded before the failure.
        transcript: Vec<TranscriptEntry>,
    },
}

impl SessionError {
    /// Returns exchanges recorded before the failure, if any.
    #[must_use]
    pub fn transcript(&self) -> &[TranscriptEntry] {
        match self {
            Self::Setup { transcript, .. } => transcript,
            Self::Runner(_) | Self::Client(_) => &[],
        }
    }
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Everything a finished session produced.
#[derive(Debug)]
pub struct SessionReport {
    /// Case records in execution order.
    pub cases: Vec<CaseRecord>,
    /// Teardown outcome.
    pub teardown: TeardownSummary,
    /// Every exchange of the session, authentication included.
    pub transcript: Vec<TranscriptEntry>,
}

impl SessionReport {
    /// Returns true when every case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.cases.iter().all(CaseRecord::passed)
    }

    /// Returns the number of failed cases.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.cases.iter().filter(|record| !record.passed()).count()
    }
}

// ============================================================================
// SECTION: Lifecycle
// ============================================================================

/// Builds the client and authenticates once.
///
/// # Errors
///
/// Returns [`SessionError::Client`] when the client cannot be built and
/// [`SessionError::Setup`] when authentication fails.
pub fn setup(config: &SuiteConfig) -> Result<SessionContext, SessionError> {
    let client = SpoilerClient::new(&config.api.base_url, config.timeout())?;
    info!(base_url = %client.base_url(), "authenticating");
    let token = match authenticate(&client, &config.credentials()) {
        Ok(token) => token,
        Err(source) => {
            error!(error = %source, "session setup failed");
            return Err(SessionError::Setup {
                source,
                transcript: client.transcript(),
            });
        }
    };
    info!("session authenticated");
    Ok(SessionContext::new(
        client.with_bearer_token(token),
        config.fixture_story(),
        config.empty_search_status(),
    ))
}

/// Runs one full session: setup, every case in order, then teardown.
///
/// # Errors
///
/// Returns [`SessionError`] when the case list is invalid or setup fails; in
/// both cases no case has run.
pub fn run_session(
    config: &SuiteConfig,
    cases: Vec<OrderedCase<SessionContext>>,
) -> Result<SessionReport, SessionError> {
    let runner = SuiteRunner::new(cases)?;
    let mut context = setup(config)?;
    let records = runner.run(&mut context);
    let teardown = cleanup_stories(context.client());
    let report = SessionReport {
        cases: records,
        teardown,
        transcript: context.client().transcript(),
    };
    info!(
        cases = report.cases.len(),
        failed = report.failed_count(),
        "session finished"
    );
    Ok(report)
}
