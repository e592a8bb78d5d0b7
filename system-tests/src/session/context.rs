// system-tests/src/session/context.rs
// ============================================================================
// Module: Session Context
// Description: Explicit state threaded through ordered cases.
// Purpose: Hold the authenticated client, captured fixture state, and expectations.
// Dependencies: story-spoiler-client
// ============================================================================

//! ## Overview
//! [`SessionContext`] is built once per session and passed by `&mut` to each
//! case. Creator cases record what they produced in [`FixtureState`];
//! dependent cases read it back and fail with
//! [`CaseFailure::MissingState`] when an earlier case never populated it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use story_spoiler_client::SpoilerClient;
use story_spoiler_client::StatusCode;
use story_spoiler_client::StoryInput;

use crate::check::CaseFailure;

// ============================================================================
// SECTION: Fixture State
// ============================================================================

/// Values captured by one case and consumed by later cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureState {
    /// Identifier of the most recently created story.
    pub story_id: Option<String>,
    /// Title of the most recently created story.
    pub story_title: Option<String>,
}

impl FixtureState {
    /// Records the story a creator case produced.
    pub fn capture(&mut self, story_id: impl Into<String>, title: impl Into<String>) {
        self.story_id = Some(story_id.into());
        self.story_title = Some(title.into());
    }

    /// Returns the captured story identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CaseFailure::MissingState`] when no non-empty id was captured.
    pub fn require_story_id(&self) -> Result<&str, CaseFailure> {
        self.story_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(CaseFailure::MissingState("story_id"))
    }

    /// Returns the captured story title.
    ///
    /// # Errors
    ///
    /// Returns [`CaseFailure::MissingState`] when no title was captured.
    pub fn require_story_title(&self) -> Result<&str, CaseFailure> {
        self.story_title.as_deref().ok_or(CaseFailure::MissingState("story_title"))
    }
}

// ============================================================================
// SECTION: Session Context
// ============================================================================

/// Per-session state passed to every case.
#[derive(Debug)]
pub struct SessionContext {
    /// Authenticated client.
    client: SpoilerClient,
    /// Story created by the first case.
    story: StoryInput,
    /// Status expected for a search with no matches.
    empty_search_status: StatusCode,
    /// Fixture state shared across cases.
    pub fixture: FixtureState,
}

impl SessionContext {
    /// Builds a context around an authenticated client with empty fixture state.
    #[must_use]
    pub fn new(client: SpoilerClient, story: StoryInput, empty_search_status: StatusCode) -> Self {
        Self {
            client,
            story,
            empty_search_status,
            fixture: FixtureState::default(),
        }
    }

    /// Returns the authenticated client.
    #[must_use]
    pub const fn client(&self) -> &SpoilerClient {
        &self.client
    }

    /// Returns the story the suite creates.
    #[must_use]
    pub const fn story(&self) -> &StoryInput {
        &self.story
    }

    /// Returns the status expected for a search with no matches.
    #[must_use]
    pub const fn empty_search_status(&self) -> StatusCode {
        self.empty_search_status
    }
}
