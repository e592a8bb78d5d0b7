// system-tests/src/suite.rs
// ============================================================================
// Module: Story Spoiler Cases
// Description: The ordered case list exercising the story spoiler API.
// Purpose: Assert statuses and envelopes for valid and invalid inputs.
// Dependencies: story-spoiler-client
// ============================================================================

//! ## Overview
//! Pinned cases form one dependent chain around a single story: create, list,
//! search, edit, delete, delete again. Validation cases follow, and the
//! duplicate-title check runs unpinned at the end.
//! Invariants:
//! - Only the create case writes `story_id` and `story_title` into the
//!   fixture state.
//! - Response messages are matched exactly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use story_spoiler_client::ApiEnvelope;
use story_spoiler_client::StatusCode;
use story_spoiler_client::StoryInput;
use story_spoiler_client::StoryRecord;

use crate::check::CaseFailure;
use crate::check::CaseResult;
use crate::check::ensure;
use crate::check::expect_eq;
use crate::check::expect_field;
use crate::check::expect_status;
use crate::session::OrderedCase;
use crate::session::SessionContext;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suite name used for artifacts.
pub const SUITE_NAME: &str = "story_spoiler";
/// Message returned after a successful create.
pub const CREATED_MESSAGE: &str = "Successfully created!";
/// Message returned after a successful edit.
pub const EDITED_MESSAGE: &str = "Successfully edited";
/// Message returned after a successful delete.
pub const DELETED_MESSAGE: &str = "Deleted successfully!";
/// Message returned when deleting an unknown story.
pub const DELETE_FAILED_MESSAGE: &str = "Unable to delete this story spoiler!";
/// Message returned when a search matches nothing.
pub const NO_SPOILERS_MESSAGE: &str = "No spoilers...";
/// Identifier no story ever has.
pub const UNKNOWN_STORY_ID: &str = "InvalidId";
/// Keyword no story title contains.
pub const UNKNOWN_KEYWORD: &str = "NonExistingSpoilerKeyword";
/// Title written by the edit case.
pub const EDITED_TITLE: &str = "Edited title";
/// Description written by the edit case.
pub const EDITED_DESCRIPTION: &str = "Edited description";

// ============================================================================
// SECTION: Case List
// ============================================================================

/// Returns every case of the story spoiler suite.
#[must_use]
pub fn story_spoiler_cases() -> Vec<OrderedCase<SessionContext>> {
    vec![
        OrderedCase::pinned(1, "create_story_with_valid_input", create_story),
        OrderedCase::pinned(2, "list_ends_with_created_story", list_ends_with_created_story),
        OrderedCase::pinned(3, "search_by_title_finds_created_story", search_by_title),
        OrderedCase::pinned(4, "edit_created_story", edit_created_story),
        OrderedCase::pinned(5, "delete_created_story", delete_created_story),
        OrderedCase::pinned(6, "delete_stale_story_returns_bad_request", delete_stale_story),
        OrderedCase::pinned(7, "create_with_empty_input_returns_bad_request", create_empty_story),
        OrderedCase::pinned(8, "edit_unknown_story_returns_not_found", edit_unknown_story),
        OrderedCase::pinned(9, "delete_unknown_story_returns_bad_request", delete_unknown_story),
        OrderedCase::pinned(10, "search_unknown_keyword_returns_not_found", search_unknown_keyword),
        OrderedCase::unpinned("duplicate_titles_yield_distinct_ids", duplicate_titles),
    ]
}

// ============================================================================
// SECTION: Dependent Chain
// ============================================================================

/// Creates the fixture story and captures its id and title.
fn create_story(ctx: &mut SessionContext) -> CaseResult {
    let story = ctx.story().clone();
    let story_id = create_and_check(ctx, &story)?;
    ctx.fixture.capture(story_id, story.title.unwrap_or_default());
    Ok(())
}

/// The created story is the last entry of the full list.
fn list_ends_with_created_story(ctx: &mut SessionContext) -> CaseResult {
    let story_id = ctx.fixture.require_story_id()?;
    let response = ctx.client().list_stories()?;
    expect_status(&response, StatusCode::OK)?;
    let stories: Vec<StoryRecord> = response.json()?;
    let last = stories
        .last()
        .ok_or_else(|| CaseFailure::Assertion("story list is empty".to_string()))?;
    expect_eq("last story id", story_id, last.id.as_str())
}

/// Searching the captured title returns exactly the listed stories whose
/// title contains it, the created story among them.
fn search_by_title(ctx: &mut SessionContext) -> CaseResult {
    let story_id = ctx.fixture.require_story_id()?;
    let title = ctx.fixture.require_story_title()?;
    let response = ctx.client().search_stories(title)?;
    expect_status(&response, StatusCode::OK)?;
    let stories: Vec<StoryRecord> = response.json()?;
    ensure(!stories.is_empty(), "search returned no stories")?;
    ensure(
        stories.iter().all(|story| story.title.contains(title)),
        format!("search for `{title}` returned a non-matching title"),
    )?;
    ensure(
        stories.iter().any(|story| story.id == story_id),
        format!("search for `{title}` did not return story {story_id}"),
    )?;

    let response = ctx.client().list_stories()?;
    expect_status(&response, StatusCode::OK)?;
    let listed: Vec<StoryRecord> = response.json()?;
    let mut expected: Vec<&str> = listed
        .iter()
        .filter(|story| story.title.contains(title))
        .map(|story| story.id.as_str())
        .collect();
    let mut found: Vec<&str> = stories.iter().map(|story| story.id.as_str()).collect();
    expected.sort_unstable();
    found.sort_unstable();
    expect_eq("matching story ids", expected.join(",").as_str(), found.join(",").as_str())
}

/// Editing the created story succeeds.
fn edit_created_story(ctx: &mut SessionContext) -> CaseResult {
    let story_id = ctx.fixture.require_story_id()?;
    let response =
        ctx.client().edit_story(story_id, &StoryInput::new(EDITED_TITLE, EDITED_DESCRIPTION))?;
    expect_status(&response, StatusCode::OK)?;
    let envelope: ApiEnvelope = response.json()?;
    expect_field("msg", EDITED_MESSAGE, envelope.message.as_deref())
}

/// Deleting the created story succeeds.
fn delete_created_story(ctx: &mut SessionContext) -> CaseResult {
    let story_id = ctx.fixture.require_story_id()?;
    let response = ctx.client().delete_story(story_id)?;
    expect_status(&response, StatusCode::OK)?;
    let envelope: ApiEnvelope = response.json()?;
    expect_field("msg", DELETED_MESSAGE, envelope.message.as_deref())
}

/// Deleting the already-deleted story is rejected with a fixed message.
fn delete_stale_story(ctx: &mut SessionContext) -> CaseResult {
    let story_id = ctx.fixture.require_story_id()?;
    let response = ctx.client().delete_story(story_id)?;
    expect_status(&response, StatusCode::BAD_REQUEST)?;
    let envelope: ApiEnvelope = response.json()?;
    expect_field("msg", DELETE_FAILED_MESSAGE, envelope.message.as_deref())
}

// ============================================================================
// SECTION: Validation Cases
// ============================================================================

/// Creating with null title and description is rejected.
fn create_empty_story(ctx: &mut SessionContext) -> CaseResult {
    let response = ctx.client().create_story(&StoryInput::empty())?;
    expect_status(&response, StatusCode::BAD_REQUEST)
}

/// Editing an unknown id is not found.
fn edit_unknown_story(ctx: &mut SessionContext) -> CaseResult {
    let response = ctx
        .client()
        .edit_story(UNKNOWN_STORY_ID, &StoryInput::new(EDITED_TITLE, EDITED_DESCRIPTION))?;
    expect_status(&response, StatusCode::NOT_FOUND)
}

/// Deleting an unknown id is rejected with a fixed message.
fn delete_unknown_story(ctx: &mut SessionContext) -> CaseResult {
    let response = ctx.client().delete_story(UNKNOWN_STORY_ID)?;
    expect_status(&response, StatusCode::BAD_REQUEST)?;
    let envelope: ApiEnvelope = response.json()?;
    expect_field("msg", DELETE_FAILED_MESSAGE, envelope.message.as_deref())
}

/// Searching a keyword with no matches returns the configured status.
fn search_unknown_keyword(ctx: &mut SessionContext) -> CaseResult {
    let response = ctx.client().search_stories(UNKNOWN_KEYWORD)?;
    expect_status(&response, ctx.empty_search_status())?;
    let envelope: ApiEnvelope = response.json()?;
    expect_field("msg", NO_SPOILERS_MESSAGE, envelope.message.as_deref())
}

// ============================================================================
// SECTION: Independent Cases
// ============================================================================

/// Identical creates yield distinct ids, both found by title search.
fn duplicate_titles(ctx: &mut SessionContext) -> CaseResult {
    let story = ctx.story().clone();
    let first = create_and_check(ctx, &story)?;
    let second = create_and_check(ctx, &story)?;
    ensure(first != second, format!("duplicate creates returned the same id {first}"))?;

    let title = story.title.as_deref().unwrap_or_default();
    let response = ctx.client().search_stories(title)?;
    expect_status(&response, StatusCode::OK)?;
    let stories: Vec<StoryRecord> = response.json()?;
    for id in [&first, &second] {
        ensure(
            stories.iter().any(|found| &found.id == id),
            format!("search for `{title}` did not return story {id}"),
        )?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Creates `story` and checks the 201 envelope, returning the new id.
fn create_and_check(ctx: &SessionContext, story: &StoryInput) -> Result<String, CaseFailure> {
    let response = ctx.client().create_story(story)?;
    expect_status(&response, StatusCode::CREATED)?;
    let envelope: ApiEnvelope = response.json()?;
    expect_field("msg", CREATED_MESSAGE, envelope.message.as_deref())?;
    envelope
        .story_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| CaseFailure::Assertion("created story has no storyId".to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
