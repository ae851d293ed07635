//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use spellbee_core::clock::SystemClock;
use spellbee_core::rng::DeterministicRng;
use spellbee_core::store::SessionStore;
use spellbee_corpus::Corpus;
use spellbee_game::application::command_handlers::GameSettings;
use spellbee_session_store::InMemorySessionStore;
use spellbee_test_support::{MockRng, StaticAudioProvider};
use tower::ServiceExt;

use spellbee_api::app::build_router;
use spellbee_api::state::AppState;

/// Vocabulary used across the integration tests. Sorted by length, the
/// game order is `cat`, `bird`, `horse`.
pub const WORDS: [&str; 3] = ["horse", "cat", "bird"];

/// The corpus over [`WORDS`]. `bird` has no definition.
pub fn test_corpus() -> Corpus {
    let mut definitions = HashMap::new();
    definitions.insert(
        "cat".to_owned(),
        vec![
            "a small domesticated feline".to_owned(),
            "a jazz enthusiast".to_owned(),
        ],
    );
    definitions.insert("horse".to_owned(), vec!["a large hoofed mammal".to_owned()]);
    Corpus::new(WORDS.iter().map(|w| (*w).to_owned()).collect(), definitions)
}

/// Build the full app router over `corpus`, with a process-local session
/// store. Uses the same router as `main.rs`.
pub fn build_test_app_with(
    corpus: Corpus,
    static_dir: Option<&Path>,
) -> (Router, Arc<dyn SessionStore>) {
    let corpus = Arc::new(corpus);
    let audio = StaticAudioProvider::new()
        .with("cat", b"cat-clip".to_vec())
        .with("bird", b"bird-clip".to_vec());
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(Arc::new(SystemClock)));
    let settings = GameSettings {
        word_count: 10,
        session_ttl: Duration::from_secs(600),
    };

    let state = AppState::new(
        settings,
        corpus.clone(),
        corpus,
        Arc::new(audio),
        rng,
        store.clone(),
    );

    (build_router(state, static_dir), store)
}

/// Build the full app router over [`WORDS`].
pub fn build_test_app() -> Router {
    build_test_app_with(test_corpus(), None).0
}

/// Start a game and return its session id.
pub async fn start_game(app: &Router) -> String {
    let (status, json) = post_empty(app.clone(), "/start").await;
    assert_eq!(status, StatusCode::OK);
    json["user_id"].as_str().unwrap().to_owned()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send_json(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send_json(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send_json(app, request).await
}

/// Send a GET request and return the raw body with its content type.
pub async fn get_bytes(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, content_type, body_bytes.to_vec())
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}
