// system-tests/src/logging.rs
// ============================================================================
// Module: Suite Logging
// Description: Process-level tracing setup for the suite runner.
// Purpose: Route case progress and teardown warnings to stderr.
// Dependencies: tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! Installs a `tracing` subscriber whose level comes from `STORY_SPOILER_LOG`
//! (`trace`, `debug`, `info`, `warn`, `error`; default `info`). Library code
//! only emits events; installing the subscriber is left to binaries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::OnceLock;

use tracing::Level;

use crate::config::SuiteEnv;
use crate::config::read_env_strict;

// ============================================================================
// SECTION: Initialization
// ============================================================================

/// Guards against installing the subscriber twice.
static INIT: OnceLock<()> = OnceLock::new();

/// Maps a level name to a tracing level, defaulting to `info`.
#[must_use]
pub fn parse_level(raw: Option<&str>) -> Level {
    match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        Some("trace") => Level::TRACE,
        Some("debug") => Level::DEBUG,
        Some("warn") => Level::WARN,
        Some("error") => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initializes stderr tracing output from `STORY_SPOILER_LOG`.
///
/// Repeated calls are no-ops. Invalid UTF-8 in the variable falls back to
/// `info`.
pub fn init() {
    INIT.get_or_init(|| {
        let raw = read_env_strict(SuiteEnv::LogLevel.as_str()).ok().flatten();
        let _ = tracing_subscriber::fmt()
            .with_max_level(parse_level(raw.as_deref()))
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

// ============================================================================
// SECTION: Tests
// ============================================================================
