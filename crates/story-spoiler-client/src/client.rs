// crates/story-spoiler-client/src/client.rs
// ============================================================================
// Module: Story Spoiler HTTP Client
// Description: Blocking HTTP client for the story spoiler API.
// Purpose: Issue single-shot requests and capture an exchange transcript.
// Dependencies: reqwest, serde, serde_json, url
// ============================================================================

//! ## Overview
//! [`SpoilerClient`] sends one request per call, returns the raw status and
//! body, and records every exchange in a shared transcript. Status codes are
//! never interpreted here; the suite owns all expectations.
//! Invariants:
//! - No retries: each [`SpoilerClient::send`] performs at most one HTTP exchange.
//! - Redacted requests record neither request nor response bodies.
//! - Clones share one transcript, so a client rebound to a bearer token keeps
//!   the authentication exchange in its history.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::Method;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::auth::BearerToken;
use crate::dto::StoryInput;

// ============================================================================
// SECTION: Endpoints
// ============================================================================

/// Authentication endpoint path.
pub const AUTHENTICATION_PATH: &str = "/api/User/Authentication";
/// Story creation endpoint path.
pub const CREATE_STORY_PATH: &str = "/api/Story/Create";
/// Story edit endpoint path prefix; the story id is appended as a segment.
pub const EDIT_STORY_PATH: &str = "/api/Story/Edit";
/// Story delete endpoint path prefix; the story id is appended as a segment.
pub const DELETE_STORY_PATH: &str = "/api/Story/Delete";
/// Story listing endpoint path.
pub const LIST_STORIES_PATH: &str = "/api/Story/All";
/// Story search endpoint path.
pub const SEARCH_STORIES_PATH: &str = "/api/Story/Search";
/// Query parameter carrying the search keyword.
pub const SEARCH_KEYWORD_PARAM: &str = "keyword";

/// Placeholder recorded in place of sensitive bodies.
const REDACTED: &str = "<redacted>";
/// Maximum response body excerpt embedded in decode errors.
const ERROR_BODY_EXCERPT: usize = 256;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Client-side failures. HTTP error statuses are not errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Base URL could not be used to build request URLs.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    ClientBuild(String),
    /// Request body could not be serialized.
    #[error("request encoding failed: {0}")]
    Encode(String),
    /// The exchange failed before a response was read.
    #[error("http request failed: {0}")]
    Transport(String),
    /// The response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),
}

// ============================================================================
// SECTION: Request / Response
// ============================================================================

/// One request against the API: method, path, optional id segment, optional
/// query parameter, optional JSON body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    method: Method,
    /// Path relative to the base URL.
    path: String,
    /// Extra path segments, percent-encoded on send.
    segments: Vec<String>,
    /// Optional single query parameter.
    query: Option<(String, String)>,
    /// Optional JSON body.
    body: Option<Value>,
    /// Keep bodies out of the transcript.
    redact: bool,
}

impl ApiRequest {
    /// Creates a request with no body or query.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            query: None,
            body: None,
            redact: false,
        }
    }

    /// Appends an encoded path segment such as a story id.
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Sets the query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query = Some((name.into(), value.into()));
        self
    }

    /// Attaches a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] when the body cannot be serialized.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|err| ApiError::Encode(err.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Marks the exchange as sensitive so its bodies are not recorded.
    #[must_use]
    pub const fn redacted(mut self) -> Self {
        self.redact = true;
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path without segments.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the JSON body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Raw response: status plus the full body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status.
    status: StatusCode,
    /// Response body text.
    body: String,
}

impl ApiResponse {
    /// Creates a response from parts.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns the HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] with the status and a body excerpt when the
    /// body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|err| {
            ApiError::Decode(format!(
                "{err} (status {}, body: {})",
                self.status.as_u16(),
                excerpt(&self.body)
            ))
        })
    }
}

/// Recorded request/response pair.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    /// 1-based position in the transcript.
    pub sequence: u64,
    /// HTTP method.
    pub method: String,
    /// Resolved request path.
    pub path: String,
    /// Encoded query string, if any.
    pub query: Option<String>,
    /// Response status when a response arrived.
    pub status: Option<u16>,
    /// Request body (redacted for sensitive exchanges).
    pub request: Option<Value>,
    /// Response body as JSON when parseable, else as a string.
    pub response: Value,
    /// Transport error, if the exchange failed.
    pub error: Option<String>,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Blocking client bound to one base URL and, after authentication, one
/// bearer token.
#[derive(Clone)]
pub struct SpoilerClient {
    /// Base URL every path is appended to.
    base_url: Url,
    /// Underlying reqwest client.
    client: Client,
    /// Bearer token attached to every request when set.
    bearer_token: Option<BearerToken>,
    /// Shared exchange history.
    transcript: Arc<Mutex<Vec<TranscriptEntry>>>,
}

impl fmt::Debug for SpoilerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpoilerClient")
            .field("base_url", &self.base_url.as_str())
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl SpoilerClient {
    /// Creates an unauthenticated client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] for non-http(s) or unparsable URLs
    /// and [`ApiError::ClientBuild`] when reqwest rejects the configuration.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url =
            Url::parse(base_url).map_err(|err| ApiError::InvalidBaseUrl(format!("{base_url}: {err}")))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }
        base_url.set_query(None);
        base_url.set_fragment(None);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::ClientBuild(err.to_string()))?;
        Ok(Self {
            base_url,
            client,
            bearer_token: None,
            transcript: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Binds a bearer token to every subsequent request.
    #[must_use]
    pub fn with_bearer_token(mut self, token: BearerToken) -> Self {
        self.bearer_token = Some(token);
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns true when a bearer token is bound.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }

    /// Returns a snapshot of the transcript.
    #[must_use]
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Resolves the full URL for a request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] when the base URL cannot take path
    /// segments.
    pub fn resolve(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidBaseUrl(self.base_url.to_string()))?;
            segments.pop_if_empty();
            for part in request.path.split('/').filter(|part| !part.is_empty()) {
                segments.push(part);
            }
            for segment in &request.segments {
                segments.push(segment);
            }
        }
        if let Some((name, value)) = &request.query {
            url.query_pairs_mut().append_pair(name, value);
        }
        Ok(url)
    }

    /// Sends one request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the URL cannot be built or the exchange fails
    /// before a full response body is read. Error statuses are returned as
    /// `Ok`.
    pub fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.resolve(request)?;
        let mut builder = self.client.request(request.method.clone(), url.clone());
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let outcome = builder.send().map_err(|err| ApiError::Transport(err.to_string())).and_then(
            |response| {
                let status = response.status();
                let body = response.text().map_err(|err| {
                    ApiError::Transport(format!("failed to read response body: {err}"))
                })?;
                Ok(ApiResponse::new(status, body))
            },
        );
        self.record(request, &url, &outcome);
        outcome
    }

    /// `POST /api/Story/Create`.
    ///
    /// # Errors
    ///
    /// See [`SpoilerClient::send`].
    pub fn create_story(&self, input: &StoryInput) -> Result<ApiResponse, ApiError> {
        self.send(&ApiRequest::new(Method::POST, CREATE_STORY_PATH).json(input)?)
    }

    /// `PUT /api/Story/Edit/{id}`.
    ///
    /// # Errors
    ///
    /// See [`SpoilerClient::send`].
    pub fn edit_story(&self, story_id: &str, input: &StoryInput) -> Result<ApiResponse, ApiError> {
        self.send(&ApiRequest::new(Method::PUT, EDIT_STORY_PATH).segment(story_id).json(input)?)
    }

    /// `DELETE /api/Story/Delete/{id}`.
    ///
    /// # Errors
    ///
    /// See [`SpoilerClient::send`].
    pub fn delete_story(&self, story_id: &str) -> Result<ApiResponse, ApiError> {
        self.send(&ApiRequest::new(Method::DELETE, DELETE_STORY_PATH).segment(story_id))
    }

    /// `GET /api/Story/All`.
    ///
    /// # Errors
    ///
    /// See [`SpoilerClient::send`].
    pub fn list_stories(&self) -> Result<ApiResponse, ApiError> {
        self.send(&ApiRequest::new(Method::GET, LIST_STORIES_PATH))
    }

    /// `GET /api/Story/Search?keyword=...`.
    ///
    /// # Errors
    ///
    /// See [`SpoilerClient::send`].
    pub fn search_stories(&self, keyword: &str) -> Result<ApiResponse, ApiError> {
        self.send(
            &ApiRequest::new(Method::GET, SEARCH_STORIES_PATH).query(SEARCH_KEYWORD_PARAM, keyword),
        )
    }

    /// Appends an exchange to the transcript.
    fn record(&self, request: &ApiRequest, url: &Url, outcome: &Result<ApiResponse, ApiError>) {
        let Ok(mut guard) = self.transcript.lock() else {
            return;
        };
        let sequence = u64::try_from(guard.len()).unwrap_or(u64::MAX).saturating_add(1);
        let (status, response, error) = match outcome {
            Ok(response) if request.redact => {
                (Some(response.status.as_u16()), Value::String(REDACTED.to_string()), None)
            }
            Ok(response) => (Some(response.status.as_u16()), body_value(&response.body), None),
            Err(err) => (None, Value::Null, Some(err.to_string())),
        };
        let request_body = request.body.as_ref().map(|body| {
            if request.redact { Value::String(REDACTED.to_string()) } else { body.clone() }
        });
        guard.push(TranscriptEntry {
            sequence,
            method: request.method.to_string(),
            path: url.path().to_string(),
            query: url.query().map(ToString::to_string),
            status,
            request: request_body,
            response,
            error,
        });
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a body as JSON, falling back to a string value.
fn body_value(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// Truncates a body for error messages on a char boundary.
fn excerpt(body: &str) -> String {
    if body.len() <= ERROR_BODY_EXCERPT {
        return body.to_string();
    }
    let mut end = ERROR_BODY_EXCERPT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
