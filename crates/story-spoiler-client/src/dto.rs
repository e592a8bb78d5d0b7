// crates/story-spoiler-client/src/dto.rs
// ============================================================================
// Module: Story Spoiler DTOs
// Description: JSON shapes exchanged with the story spoiler API.
// Purpose: Mirror request and response bodies with their exact wire names.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Request and response bodies for the story spoiler API. Response types are
//! lenient (missing fields default) because the suite asserts on them rather
//! than trusting them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Username/password pair exchanged for a bearer token.
///
/// # Invariants
/// - `Debug` output never contains the password.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Account name, sent as `userName`.
    pub user_name: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Builds credentials from a username and password.
    #[must_use]
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body for story create and edit requests.
///
/// Absent fields serialize as `null`, which the API rejects as invalid input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryInput {
    /// Story title.
    pub title: Option<String>,
    /// Story description.
    pub description: Option<String>,
}

impl StoryInput {
    /// Builds a fully populated story input.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }

    /// Builds an input with no title or description.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            title: None,
            description: None,
        }
    }
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Response body of the authentication endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    /// Issued JWT, absent when the service omits it.
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
}

/// Message envelope returned by mutating endpoints and failed searches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    /// Operation message, sent as `msg`.
    #[serde(rename = "msg", default)]
    pub message: Option<String>,
    /// Identifier of the created story, sent as `storyId`.
    #[serde(rename = "storyId", default)]
    pub story_id: Option<String>,
}

/// Story as returned by the list and search endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRecord {
    /// Server-assigned identifier.
    pub id: String,
    /// Story title.
    #[serde(default)]
    pub title: String,
    /// Story description.
    #[serde(default)]
    pub description: String,
}
