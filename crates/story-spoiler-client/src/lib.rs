// crates/story-spoiler-client/src/lib.rs
// ============================================================================
// Module: Story Spoiler Client Library
// Description: Wire contract for the remote story spoiler REST API.
// Purpose: Provide DTOs, a transcript-capturing HTTP client, and authentication.
// Dependencies: reqwest, serde, url
// ============================================================================

//! ## Overview
//! Thin, typed access to the story spoiler API consumed by the system-tests
//! suite. The client never retries and never interprets status codes; callers
//! assert on [`ApiResponse::status`] themselves.
//! Invariants:
//! - Every exchange is attempted exactly once.
//! - Credentials and bearer tokens never appear in `Debug` output or transcripts.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod client;
pub mod dto;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::AuthError;
pub use auth::BearerToken;
pub use auth::authenticate;
pub use client::ApiError;
pub use client::ApiRequest;
pub use client::ApiResponse;
pub use client::SpoilerClient;
pub use client::TranscriptEntry;
pub use dto::ApiEnvelope;
pub use dto::AuthResponse;
pub use dto::Credentials;
pub use dto::StoryInput;
pub use dto::StoryRecord;
pub use reqwest::Method;
pub use reqwest::StatusCode;
