// crates/story-spoiler-client/src/auth.rs
// ============================================================================
// Module: Story Spoiler Authentication
// Description: Exchanges credentials for a bearer token.
// Purpose: Fail fast on any non-OK status or blank token.
// Dependencies: reqwest, thiserror
// ============================================================================

//! ## Overview
//! [`authenticate`] performs exactly one request to the authentication
//! endpoint. Anything other than `200 OK` with a non-blank `accessToken` is an
//! error; there is no retry and no expiry tracking.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use reqwest::Method;
use reqwest::StatusCode;
use thiserror::Error;

use crate::client::AUTHENTICATION_PATH;
use crate::client::ApiError;
use crate::client::ApiRequest;
use crate::client::SpoilerClient;
use crate::dto::AuthResponse;
use crate::dto::Credentials;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Authentication failures. All of them abort the session before any case runs.
///
/// # Invariants
/// - Messages never include credentials or token material.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request could not be built or sent, or the body was malformed.
    #[error("authentication request failed: {0}")]
    Request(#[from] ApiError),
    /// The endpoint answered with a non-OK status.
    #[error("authentication returned status {0}")]
    Status(StatusCode),
    /// The endpoint answered OK without a usable token.
    #[error("access token is empty")]
    BlankToken,
}

// ============================================================================
// SECTION: Token
// ============================================================================

/// Non-blank bearer token.
///
/// # Invariants
/// - The wrapped string is never blank.
/// - `Debug` output never contains the token.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a raw token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::BlankToken`] when the token is empty or whitespace.
    pub fn new(raw: impl Into<String>) -> Result<Self, AuthError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(AuthError::BlankToken);
        }
        Ok(Self(raw))
    }

    /// Returns the token for the `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

// ============================================================================
// SECTION: Authentication
// ============================================================================

/// Exchanges credentials for a bearer token using `client`.
///
/// The exchange is recorded in the client's transcript with both bodies
/// redacted.
///
/// # Errors
///
/// Returns [`AuthError::Status`] for any status other than `200 OK`,
/// [`AuthError::BlankToken`] when the token is missing or blank, and
/// [`AuthError::Request`] for transport or decode failures.
pub fn authenticate(
    client: &SpoilerClient,
    credentials: &Credentials,
) -> Result<BearerToken, AuthError> {
    let request = ApiRequest::new(Method::POST, AUTHENTICATION_PATH).json(credentials)?.redacted();
    let response = client.send(&request)?;
    if response.status() != StatusCode::OK {
        return Err(AuthError::Status(response.status()));
    }
    let payload: AuthResponse = response.json()?;
    BearerToken::new(payload.access_token.unwrap_or_default())
}
