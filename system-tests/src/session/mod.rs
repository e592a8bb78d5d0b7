// system-tests/src/session/mod.rs
// ============================================================================
// Module: Test Session
// Description: Ordered session lifecycle for the story spoiler suite.
// Purpose: Authenticate once, run ordered cases, then clean up unconditionally.
// Dependencies: story-spoiler-client, tracing
// ============================================================================

//! ## Overview
//! A session is setup, an ordered run of cases sharing a [`SessionContext`],
//! and a best-effort teardown.
//! Invariants:
//! - Setup runs exactly once and must succeed before any case runs.
//! - Cases run serially in ascending pinned order, then unpinned in
//!   declaration order.
//! - Teardown runs exactly once after every case and never fails the run.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod context;
mod lifecycle;
mod runner;
mod teardown;


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use context::FixtureState;
pub use context::SessionContext;
pub use lifecycle::SessionError;
pub use lifecycle::SessionReport;
pub use lifecycle::run_session;
pub use lifecycle::setup;
pub use runner::CaseFn;
pub use runner::CaseOrder;
pub use runner::CaseRecord;
pub use runner::CaseStatus;
pub use runner::OrderedCase;
pub use runner::RunnerError;
pub use runner::SuiteRunner;
pub use teardown::TeardownFailure;
pub use teardown::TeardownSummary;
pub use teardown::cleanup_stories;
