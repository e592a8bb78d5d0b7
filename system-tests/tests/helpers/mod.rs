// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: Suite Test Helpers
// Description: Shared helpers for the story spoiler test binaries.
// Purpose: Provide the API stub and configuration fixtures.
// Dependencies: system-tests, axum, tokio, tempfile
// ============================================================================

//! ## Overview
//! Shared helpers for the story spoiler test binaries.
//! Invariants:
//! - Offline tests never contact the real API.
//! - Every stub runs on its own loopback port.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod spoiler_stub;
