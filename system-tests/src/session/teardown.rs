// system-tests/src/session/teardown.rs
// ============================================================================
// Module: Session Teardown
// Description: Best-effort removal of every story the account can see.
// Purpose: Leave the remote store empty after a run without failing the run.
// Dependencies: story-spoiler-client, serde, tracing
// ============================================================================

//! ## Overview
//! Teardown lists every story and deletes each one. Every failure is captured
//! as a [`TeardownFailure`] and logged at warn level; none is propagated.
//! The suite assumes it is the only writer, so every listed story is deleted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use story_spoiler_client::SpoilerClient;
use story_spoiler_client::StatusCode;
use story_spoiler_client::StoryRecord;
use tracing::info;
use tracing::warn;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A cleanup step that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeardownFailure {
    /// Story being deleted; absent when listing failed.
    pub story_id: Option<String>,
    /// What went wrong.
    pub reason: String,
}

/// Outcome of teardown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeardownSummary {
    /// Stories returned by the list call.
    pub listed: usize,
    /// Stories deleted with a 200 response.
    pub deleted: usize,
    /// Failed steps.
    pub failures: Vec<TeardownFailure>,
}

// ============================================================================
// SECTION: Cleanup
// ============================================================================

/// Lists all stories and deletes each one, swallowing every failure.
#[must_use]
pub fn cleanup_stories(client: &SpoilerClient) -> TeardownSummary {
    let mut summary = TeardownSummary::default();
    let stories = match list_all(client) {
        Ok(stories) => stories,
        Err(reason) => {
            warn!(error = %reason, "teardown could not list stories");
            summary.failures.push(TeardownFailure {
                story_id: None,
                reason,
            });
            return summary;
        }
    };
    summary.listed = stories.len();
    for story in stories {
        let outcome = match client.delete_story(&story.id) {
            Ok(response) if response.status() == StatusCode::OK => Ok(()),
            Ok(response) => Err(format!("delete returned status {}", response.status())),
            Err(err) => Err(err.to_string()),
        };
        match outcome {
            Ok(()) => summary.deleted += 1,
            Err(reason) => {
                warn!(story_id = %story.id, error = %reason, "teardown delete failed");
                summary.failures.push(TeardownFailure {
                    story_id: Some(story.id),
                    reason,
                });
            }
        }
    }
    info!(
        listed = summary.listed,
        deleted = summary.deleted,
        failed = summary.failures.len(),
        "teardown finished"
    );
    summary
}

/// Fetches the full story list.
fn list_all(client: &SpoilerClient) -> Result<Vec<StoryRecord>, String> {
    let response = client.list_stories().map_err(|err| err.to_string())?;
    if response.status() != StatusCode::OK {
        return Err(format!("list returned status {}", response.status()));
    }
    response.json::<Vec<StoryRecord>>().map_err(|err| err.to_string())
}
