// system-tests/src/check.rs
// ============================================================================
// Module: Case Assertions
// Description: Failure type and assertion helpers for ordered cases.
// Purpose: Turn status and body mismatches into recorded case failures.
// Dependencies: thiserror, story-spoiler-client
// ============================================================================

//! ## Overview
//! Cases return [`CaseResult`]; every helper here yields a [`CaseFailure`]
//! instead of panicking so a mismatch fails only the case that observed it.
//! Invariants:
//! - Failure messages carry the expected and observed values.
//! - Response excerpts are bounded in length.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;

use story_spoiler_client::ApiError;
use story_spoiler_client::ApiResponse;
use story_spoiler_client::StatusCode;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of response body characters quoted in a failure.
const BODY_EXCERPT_CHARS: usize = 256;

// ============================================================================
// SECTION: Failure Types
// ============================================================================

/// Outcome of a single ordered case.
pub type CaseResult = Result<(), CaseFailure>;

/// Reasons an ordered case fails.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum CaseFailure {
    /// Response status differed from the expected status.
    #[error("expected status {expected}, got {actual}: {body}")]
    Status {
        /// Expected status.
        expected: StatusCode,
        /// Observed status.
        actual: StatusCode,
        /// Excerpt of the response body.
        body: String,
    },
    /// A body field differed from its expected value.
    #[error("{field}: expected `{expected}`, got `{actual}`")]
    Mismatch {
        /// Field being compared.
        field: String,
        /// Expected rendering.
        expected: String,
        /// Observed rendering.
        actual: String,
    },
    /// A free-form assertion did not hold.
    #[error("assertion failed: {0}")]
    Assertion(String),
    /// Fixture state a dependent case needs was never captured.
    #[error("fixture state missing: {0}")]
    MissingState(&'static str),
    /// The request could not be sent or the body could not be decoded.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The case panicked.
    #[error("case panicked: {0}")]
    Panicked(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Fails unless the response carries `expected`.
///
/// # Errors
///
/// Returns [`CaseFailure::Status`] with a body excerpt on mismatch.
pub fn expect_status(response: &ApiResponse, expected: StatusCode) -> CaseResult {
    if response.status() == expected {
        return Ok(());
    }
    Err(CaseFailure::Status {
        expected,
        actual: response.status(),
        body: response.body().chars().take(BODY_EXCERPT_CHARS).collect(),
    })
}

/// Fails unless `actual` equals `expected`.
///
/// # Errors
///
/// Returns [`CaseFailure::Mismatch`] naming `field`.
pub fn expect_eq<T>(field: &str, expected: &T, actual: &T) -> CaseResult
where
    T: PartialEq + Display + ?Sized,
{
    if expected == actual {
        return Ok(());
    }
    Err(CaseFailure::Mismatch {
        field: field.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}

/// Fails unless an optional body field is present and equals `expected`.
///
/// # Errors
///
/// Returns [`CaseFailure::Mismatch`]; an absent field renders as `<absent>`.
pub fn expect_field(field: &str, expected: &str, actual: Option<&str>) -> CaseResult {
    match actual {
        Some(actual) => expect_eq(field, expected, actual),
        None => Err(CaseFailure::Mismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: "<absent>".to_string(),
        }),
    }
}

/// Fails with `message` unless `condition` holds.
///
/// # Errors
///
/// Returns [`CaseFailure::Assertion`].
pub fn ensure(condition: bool, message: impl Into<String>) -> CaseResult {
    if condition { Ok(()) } else { Err(CaseFailure::Assertion(message.into())) }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
