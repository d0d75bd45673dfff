//! End-to-end tests for the bearer token hooks.
//!
//! A mock backend (axum) on a random port issues a token from its login
//! endpoint and records every `Authorization` header it sees. Requests go
//! through the real `HookedClient` with both token hooks registered.

use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use pretty_assertions::assert_eq;
use serde::Deserialize;

use bearer_hooks::config::{ClientConfig, TokenConfig};
use bearer_hooks::{
    Error, FileStore, HookError, HookedClient, MemoryStore, Request, VariableStore,
};

const ISSUED_TOKEN: &str = "jwt-xyz";

// ---------------------------------------------------------------------------
// Mock backend
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct MockState {
    /// `Authorization` values per request, in arrival order. Trailing
    /// whitespace is dropped on the wire, so an empty token reads `Bearer`.
    seen_auth: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockState {
    fn record(&self, headers: &HeaderMap) {
        let values = headers
            .get_all("authorization")
            .iter()
            .map(|v| v.to_str().unwrap_or_default().trim_end().to_string())
            .collect();
        self.seen_auth.lock().unwrap().push(values);
    }

    fn seen(&self) -> Vec<Vec<String>> {
        self.seen_auth.lock().unwrap().clone()
    }
}

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

fn mock_router(state: MockState) -> Router {
    Router::new()
        .route("/api/users/login", post(mock_login))
        .route("/api/users/me", get(mock_profile))
        .route("/api/broken", get(mock_broken))
        .with_state(state)
}

async fn mock_login(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<LoginBody>,
) -> impl IntoResponse {
    state.record(&headers);
    if body.username == "ada" && body.password == "hunter22" {
        (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": 200,
                "message": "Login successful",
                "token": ISSUED_TOKEN,
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "status": 401, "message": "Invalid credentials" })),
        )
    }
}

async fn mock_profile(State(state): State<MockState>, headers: HeaderMap) -> impl IntoResponse {
    state.record(&headers);
    let expected = format!("Bearer {ISSUED_TOKEN}");
    let authorized = headers
        .get_all("authorization")
        .iter()
        .any(|v| v.as_bytes() == expected.as_bytes());
    if authorized {
        (
            StatusCode::OK,
            Json(serde_json::json!({ "user": { "id": 1, "username": "ada" } })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "status": 401, "message": "No token provided" })),
        )
    }
}

/// 200 with a body that is not JSON.
async fn mock_broken(State(state): State<MockState>, headers: HeaderMap) -> impl IntoResponse {
    state.record(&headers);
    (StatusCode::OK, "<html>maintenance</html>")
}

/// Start the mock server on a random port and return the base URL.
async fn start_mock_server(state: MockState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}/", addr);

    let router = mock_router(state);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    base_url
}

async fn client_for(base_url: &str, store: Arc<dyn VariableStore>) -> HookedClient {
    let config = ClientConfig {
        base_url: Some(url::Url::parse(base_url).unwrap()),
        ..ClientConfig::default()
    };
    HookedClient::with_bearer_hooks(&config, &TokenConfig::default(), store)
        .await
        .unwrap()
}

fn login(password: &str) -> Request {
    Request::post("/api/users/login")
        .header("Content-Type", "application/json")
        .body(format!(
            r#"{{"username": "ada", "password": "{password}"}}"#
        ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_request_carries_empty_bearer() {
    let state = MockState::default();
    let base = start_mock_server(state.clone()).await;
    let store = Arc::new(MemoryStore::new());
    let client = client_for(&base, store.clone()).await;

    let response = client.send(Request::get("/api/users/me")).await.unwrap();

    assert_eq!(response.status_code, 401);
    assert_eq!(state.seen(), vec![vec!["Bearer".to_string()]]);
    assert_eq!(store.get("auth_token").await.unwrap(), Some(String::new()));
}

#[tokio::test]
async fn login_token_is_sent_on_next_request() {
    let state = MockState::default();
    let base = start_mock_server(state.clone()).await;
    let store = Arc::new(MemoryStore::new());
    let client = client_for(&base, store.clone()).await;

    let response = client.send(login("hunter22")).await.unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(
        store.get("auth_token").await.unwrap().as_deref(),
        Some(ISSUED_TOKEN)
    );

    let response = client.send(Request::get("/api/users/me")).await.unwrap();
    assert_eq!(response.status_code, 200);

    assert_eq!(
        state.seen(),
        vec![
            vec!["Bearer".to_string()],
            vec![format!("Bearer {ISSUED_TOKEN}")],
        ]
    );
}

#[tokio::test]
async fn failed_login_keeps_previous_token() {
    let state = MockState::default();
    let base = start_mock_server(state.clone()).await;
    let store = Arc::new(MemoryStore::with_vars([("auth_token", "abc123")]));
    let client = client_for(&base, store.clone()).await;

    let response = client.send(login("wrong")).await.unwrap();

    assert_eq!(response.status_code, 401);
    assert_eq!(
        store.get("auth_token").await.unwrap().as_deref(),
        Some("abc123")
    );
    assert_eq!(state.seen(), vec![vec!["Bearer abc123".to_string()]]);
}

#[tokio::test]
async fn success_without_token_field_is_an_error() {
    let state = MockState::default();
    let base = start_mock_server(state.clone()).await;
    let store = Arc::new(MemoryStore::with_vars([("auth_token", ISSUED_TOKEN)]));
    let client = client_for(&base, store.clone()).await;

    // Authorized profile response: 200 but no `token` key.
    let err = client
        .send(Request::get("/api/users/me"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Hook(HookError::MissingToken { .. })));

    let err = client.send(Request::get("/api/broken")).await.unwrap_err();
    assert!(matches!(err, Error::Hook(HookError::InvalidJson(_))));

    assert_eq!(
        store.get("auth_token").await.unwrap().as_deref(),
        Some(ISSUED_TOKEN)
    );
}

#[tokio::test]
async fn token_persists_across_clients_with_file_store() {
    let state = MockState::default();
    let base = start_mock_server(state.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("variables.json");

    {
        let store = Arc::new(FileStore::open(&path).await.unwrap());
        let client = client_for(&base, store).await;
        client.send(login("hunter22")).await.unwrap();
    }

    let store = Arc::new(FileStore::open(&path).await.unwrap());
    let client = client_for(&base, store).await;
    let response = client.send(Request::get("/api/users/me")).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(
        state.seen().last().unwrap(),
        &vec![format!("Bearer {ISSUED_TOKEN}")]
    );
}

#[tokio::test]
async fn placeholders_expand_from_variables() {
    let state = MockState::default();
    let base = start_mock_server(state.clone()).await;
    let store = Arc::new(MemoryStore::with_vars([
        ("user", "ada"),
        ("pass", "hunter22"),
        ("section", "users"),
    ]));
    let client = client_for(&base, store.clone()).await;

    let response = client
        .send(
            Request::post("/api/${section}/login")
                .header("Content-Type", "application/json")
                .body(r#"{"username": "$user", "password": "$pass"}"#),
        )
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(
        store.get("auth_token").await.unwrap().as_deref(),
        Some(ISSUED_TOKEN)
    );
}
