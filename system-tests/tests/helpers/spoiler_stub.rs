// system-tests/tests/helpers/spoiler_stub.rs
// ============================================================================
// Module: Spoiler API Stub
// Description: In-process stand-in for the story spoiler REST API.
// Purpose: Run the ordered suite offline with controllable server behavior.
// Dependencies: axum, tokio, serde_json
// ============================================================================

//! ## Overview
//! Serves the six endpoints the suite uses from an in-memory store on a
//! dedicated thread. Options control credentials, the issued token, the
//! empty-search status, undeletable seeded stories, a create response
//! without `storyId`, and deliberately wrong delete and search replies.

use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

/// Behavior switches for the stub.
#[derive(Clone, Debug)]
pub struct StubOptions {
    pub username: String,
    pub password: String,
    /// Token issued on successful authentication; may be blank.
    pub token: String,
    /// Status for a search with no matches.
    pub empty_search_status: u16,
    /// Stories present before the run that reject deletion.
    pub locked_stories: Vec<(String, String)>,
    /// Create responds 201 without a `storyId`.
    pub omit_story_id: bool,
    /// Message returned when deleting an id that was already deleted.
    pub stale_delete_message: Option<String>,
    /// Search leaves locked stories out of its matches.
    pub search_skips_locked: bool,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            username: "storytester".to_string(),
            password: "abc123".to_string(),
            token: "stub-jwt".to_string(),
            empty_search_status: 404,
            locked_stories: Vec::new(),
            omit_story_id: false,
            stale_delete_message: None,
            search_skips_locked: false,
        }
    }
}

/// A story held by the stub.
#[derive(Clone, Debug)]
pub struct StubStory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub locked: bool,
}

#[derive(Default)]
struct StubStore {
    stories: Vec<StubStory>,
    deleted: Vec<String>,
    next_id: u64,
    auth_requests: usize,
    story_requests: usize,
}

#[derive(Clone)]
struct StubState {
    options: Arc<StubOptions>,
    store: Arc<Mutex<StubStore>>,
}

/// Handle for the running stub; shuts the server down on drop.
pub struct SpoilerStubHandle {
    base_url: String,
    store: Arc<Mutex<StubStore>>,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
}

impl SpoilerStubHandle {
    /// Returns the stub base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the stories currently stored.
    pub fn stories(&self) -> Vec<StubStory> {
        self.store.lock().map_or_else(|_| Vec::new(), |store| store.stories.clone())
    }

    /// Returns the number of authentication requests served.
    pub fn auth_requests(&self) -> usize {
        self.store.lock().map_or(0, |store| store.auth_requests)
    }

    /// Returns the number of story endpoint requests served.
    pub fn story_requests(&self) -> usize {
        self.store.lock().map_or(0, |store| store.story_requests)
    }
}

impl Drop for SpoilerStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawns the stub with `options` on a loopback port.
pub fn spawn_spoiler_stub(options: StubOptions) -> Result<SpoilerStubHandle, String> {
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("spoiler stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("spoiler stub listener nonblocking failed: {err}"))?;
    let addr =
        listener.local_addr().map_err(|err| format!("spoiler stub local addr failed: {err}"))?;
    let base_url = format!("http://{addr}");

    let mut store = StubStore::default();
    for (title, description) in &options.locked_stories {
        store.next_id += 1;
        store.stories.push(StubStory {
            id: format!("locked-{}", store.next_id),
            title: title.clone(),
            description: description.clone(),
            locked: true,
        });
    }
    let store = Arc::new(Mutex::new(store));
    let state = StubState {
        options: Arc::new(options),
        store: Arc::clone(&store),
    };
    let app = Router::new()
        .route("/api/User/Authentication", post(authenticate))
        .route("/api/Story/Create", post(create_story))
        .route("/api/Story/Edit/{id}", put(edit_story))
        .route("/api/Story/Delete/{id}", delete(delete_story))
        .route("/api/Story/All", get(list_stories))
        .route("/api/Story/Search", get(search_stories))
        .with_state(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = thread::spawn(move || {
        let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
            return;
        };
        runtime.block_on(async move {
            let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                return;
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(SpoilerStubHandle {
        base_url,
        store,
        shutdown: Some(shutdown_tx),
        join: Some(join),
    })
}

type Reply = (StatusCode, Json<Value>);

fn reply(status: StatusCode, body: Value) -> Reply {
    (status, Json(body))
}

fn message(status: StatusCode, msg: &str) -> Reply {
    reply(status, json!({ "msg": msg }))
}

/// Counts a story request and checks the bearer token.
fn admit(state: &StubState, headers: &HeaderMap) -> Result<(), Reply> {
    if let Ok(mut store) = state.store.lock() {
        store.story_requests += 1;
    }
    let expected = format!("Bearer {}", state.options.token);
    let presented = headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok());
    if state.options.token.trim().is_empty() || presented != Some(expected.as_str()) {
        return Err(message(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }
    Ok(())
}

fn text_field(body: &Value, name: &str) -> Option<String> {
    body.get(name)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .map(ToString::to_string)
}

async fn authenticate(State(state): State<StubState>, Json(body): Json<Value>) -> Reply {
    if let Ok(mut store) = state.store.lock() {
        store.auth_requests += 1;
    }
    let user = body.get("userName").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);
    if user != Some(state.options.username.as_str())
        || password != Some(state.options.password.as_str())
    {
        return message(StatusCode::UNAUTHORIZED, "Invalid username or password");
    }
    reply(StatusCode::OK, json!({ "accessToken": state.options.token }))
}

async fn create_story(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if let Err(rejected) = admit(&state, &headers) {
        return rejected;
    }
    let (Some(title), Some(description)) =
        (text_field(&body, "title"), text_field(&body, "description"))
    else {
        return message(StatusCode::BAD_REQUEST, "Title and description are required");
    };
    let Ok(mut store) = state.store.lock() else {
        return message(StatusCode::INTERNAL_SERVER_ERROR, "store poisoned");
    };
    store.next_id += 1;
    let id = format!("story-{}", store.next_id);
    store.stories.push(StubStory {
        id: id.clone(),
        title,
        description,
        locked: false,
    });
    if state.options.omit_story_id {
        return message(StatusCode::CREATED, "Successfully created!");
    }
    reply(StatusCode::CREATED, json!({ "msg": "Successfully created!", "storyId": id }))
}

async fn edit_story(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    if let Err(rejected) = admit(&state, &headers) {
        return rejected;
    }
    let Ok(mut store) = state.store.lock() else {
        return message(StatusCode::INTERNAL_SERVER_ERROR, "store poisoned");
    };
    let Some(story) = store.stories.iter_mut().find(|story| story.id == id) else {
        return message(StatusCode::NOT_FOUND, "No spoilers...");
    };
    if let Some(title) = text_field(&body, "title") {
        story.title = title;
    }
    if let Some(description) = text_field(&body, "description") {
        story.description = description;
    }
    message(StatusCode::OK, "Successfully edited")
}

async fn delete_story(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    if let Err(rejected) = admit(&state, &headers) {
        return rejected;
    }
    let Ok(mut store) = state.store.lock() else {
        return message(StatusCode::INTERNAL_SERVER_ERROR, "store poisoned");
    };
    match store.stories.iter().position(|story| story.id == id && !story.locked) {
        Some(index) => {
            let removed = store.stories.remove(index);
            store.deleted.push(removed.id);
            message(StatusCode::OK, "Deleted successfully!")
        }
        None => {
            let stale = store.deleted.contains(&id);
            let text = match &state.options.stale_delete_message {
                Some(text) if stale => text.as_str(),
                _ => "Unable to delete this story spoiler!",
            };
            message(StatusCode::BAD_REQUEST, text)
        }
    }
}

fn render(stories: &[&StubStory]) -> Value {
    Value::Array(
        stories
            .iter()
            .map(|story| {
                json!({ "id": story.id, "title": story.title, "description": story.description })
            })
            .collect(),
    )
}

async fn list_stories(State(state): State<StubState>, headers: HeaderMap) -> Reply {
    if let Err(rejected) = admit(&state, &headers) {
        return rejected;
    }
    let Ok(store) = state.store.lock() else {
        return message(StatusCode::INTERNAL_SERVER_ERROR, "store poisoned");
    };
    let stories: Vec<&StubStory> = store.stories.iter().collect();
    reply(StatusCode::OK, render(&stories))
}

#[derive(Deserialize)]
struct SearchQuery {
    keyword: Option<String>,
}

async fn search_stories(
    State(state): State<StubState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Reply {
    if let Err(rejected) = admit(&state, &headers) {
        return rejected;
    }
    let keyword = query.keyword.unwrap_or_default();
    let Ok(store) = state.store.lock() else {
        return message(StatusCode::INTERNAL_SERVER_ERROR, "store poisoned");
    };
    let matches: Vec<&StubStory> = store
        .stories
        .iter()
        .filter(|story| !keyword.is_empty() && story.title.contains(&keyword))
        .filter(|story| !(state.options.search_skips_locked && story.locked))
        .collect();
    if matches.is_empty() {
        let status = StatusCode::from_u16(state.options.empty_search_status)
            .unwrap_or(StatusCode::NOT_FOUND);
        return message(status, "No spoilers...");
    }
    reply(StatusCode::OK, render(&matches))
}
