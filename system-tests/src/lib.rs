// system-tests/src/lib.rs
// ============================================================================
// Module: Story Spoiler Suite Library
// Description: Ordered API suite for the story spoiler service.
// Purpose: Provide configuration, the session runner, cases, and reporting.
// Dependencies: story-spoiler-client
// ============================================================================

//! ## Overview
//! This crate hosts the ordered story spoiler suite: layered configuration,
//! the session lifecycle (setup, ordered cases, teardown), the case list
//! itself, and run artifacts. The `story-spoiler-suite` binary and the tests
//! in `system-tests/tests` drive it.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod check;
pub mod config;
pub mod logging;
pub mod report;
pub mod session;
pub mod suite;
