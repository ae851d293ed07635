//! Routes for playing a game.
//!
//! Each route maps to one game session operation. Routes that name a
//! session hold that session's lock from load to store.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use spellbee_game::application::command_handlers::{self, DefinitionView};
use spellbee_game::application::query_handlers::{self, GameView};
use spellbee_game::domain::commands;
use spellbee_game::domain::guess::GuessResult;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string naming the player's session.
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    /// The session id returned by POST /start.
    pub user_id: String,
}

/// Request body for POST /guess.
#[derive(Debug, Deserialize)]
pub struct GuessRequest {
    /// The player's session.
    pub user_id: String,
    /// The spelling to check.
    pub guess: String,
}

/// Response body for POST /start.
#[derive(Debug, Serialize)]
pub struct StartResponse {
    /// Session id to pass on every later request.
    pub user_id: String,
    /// Confirmation text.
    pub message: &'static str,
}

/// Response body for POST /reset.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Confirmation text.
    pub message: &'static str,
}

/// POST /start
#[instrument(skip(state))]
async fn start_game(State(state): State<AppState>) -> Result<Json<StartResponse>, ApiError> {
    let command = commands::StartGame {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling start_game command");

    let started = command_handlers::handle_start_game(
        &command,
        &state.settings,
        &*state.word_supplier,
        &state.rng,
        &*state.session_store,
    )
    .await?;

    Ok(Json(StartResponse {
        user_id: started.session_id,
        message: "Game started",
    }))
}

/// GET /definition
#[instrument(skip(state, query), fields(user_id = %query.user_id))]
async fn show_definition(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<DefinitionView>, ApiError> {
    let _guard = state.session_locks.acquire(&query.user_id).await;
    let command = commands::ShowDefinition {
        correlation_id: Uuid::new_v4(),
        session_id: query.user_id,
    };

    let view = command_handlers::handle_show_definition(
        &command,
        &state.settings,
        &*state.definition_provider,
        &*state.session_store,
    )
    .await?;

    Ok(Json(view))
}

/// GET /cycle-definition
#[instrument(skip(state, query), fields(user_id = %query.user_id))]
async fn cycle_definition(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<DefinitionView>, ApiError> {
    let _guard = state.session_locks.acquire(&query.user_id).await;
    let command = commands::CycleDefinition {
        correlation_id: Uuid::new_v4(),
        session_id: query.user_id,
    };

    let view = command_handlers::handle_cycle_definition(
        &command,
        &state.settings,
        &*state.definition_provider,
        &*state.session_store,
    )
    .await?;

    Ok(Json(view))
}

/// GET /audio
#[instrument(skip(state, query), fields(user_id = %query.user_id))]
async fn audio(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Response, ApiError> {
    let _guard = state.session_locks.acquire(&query.user_id).await;

    let clip = query_handlers::get_audio(
        &query.user_id,
        &*state.audio_provider,
        &*state.session_store,
    )
    .await?;

    Ok(([(header::CONTENT_TYPE, clip.media_type)], clip.bytes).into_response())
}

/// POST /guess
#[instrument(skip(state, request), fields(user_id = %request.user_id))]
async fn submit_guess(
    State(state): State<AppState>,
    Json(request): Json<GuessRequest>,
) -> Result<Json<GuessResult>, ApiError> {
    let _guard = state.session_locks.acquire(&request.user_id).await;
    let command = commands::SubmitGuess {
        correlation_id: Uuid::new_v4(),
        session_id: request.user_id,
        guess: request.guess,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_guess command");

    let result =
        command_handlers::handle_submit_guess(&command, &state.settings, &*state.session_store)
            .await?;

    Ok(Json(result))
}

/// POST /reset
#[instrument(skip(state, query), fields(user_id = %query.user_id))]
async fn reset_game(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let _guard = state.session_locks.acquire(&query.user_id).await;
    let command = commands::ResetGame {
        correlation_id: Uuid::new_v4(),
        session_id: query.user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling reset_game command");

    command_handlers::handle_reset_game(
        &command,
        &state.settings,
        &*state.word_supplier,
        &state.rng,
        &*state.session_store,
    )
    .await?;

    Ok(Json(MessageResponse {
        message: "Game reset successfully",
    }))
}

/// GET /state
#[instrument(skip(state, query), fields(user_id = %query.user_id))]
async fn game_state(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<GameView>, ApiError> {
    let _guard = state.session_locks.acquire(&query.user_id).await;

    let view = query_handlers::get_game_view(&query.user_id, &*state.session_store).await?;

    Ok(Json(view))
}

/// Returns the router for game play.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start_game))
        .route("/definition", get(show_definition))
        .route("/cycle-definition", get(cycle_definition))
        .route("/audio", get(audio))
        .route("/guess", post(submit_guess))
        .route("/reset", post(reset_game))
        .route("/state", get(game_state))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use spellbee_core::provider::{AudioProvider, WordSupplier};
    use spellbee_core::rng::DeterministicRng;
    use spellbee_core::store::SessionStore;
    use spellbee_game::application::command_handlers::GameSettings;
    use spellbee_test_support::{
        FailingAudioProvider, FailingSessionStore, MemorySessionStore, MockRng,
        StaticAudioProvider, StaticDefinitionProvider, StaticWordSupplier,
    };
    use tower::ServiceExt;

    use super::*;

    fn app_state_with(
        words: Arc<dyn WordSupplier>,
        audio: Arc<dyn AudioProvider>,
        store: Arc<dyn SessionStore>,
    ) -> AppState {
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
        let definitions = StaticDefinitionProvider::new().with("cat", &["feline", "jazz fan"]);
        AppState::new(
            GameSettings::default(),
            words,
            Arc::new(definitions),
            audio,
            rng,
            store,
        )
    }

    fn test_app_state() -> AppState {
        app_state_with(
            Arc::new(StaticWordSupplier::new(&["dog", "cat"])),
            Arc::new(StaticAudioProvider::new().with("dog", b"woof".to_vec())),
            Arc::new(MemorySessionStore::new()),
        )
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    fn post(uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method("POST").uri(uri);
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn start(state: &AppState) -> String {
        let (status, body) = send(router().with_state(state.clone()), post("/start", None)).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        json["user_id"].as_str().unwrap().to_owned()
    }

    #[tokio::test]
    async fn test_start_returns_user_id_and_message() {
        // Arrange
        let app = router().with_state(test_app_state());

        // Act
        let (status, body) = send(app, post("/start", None)).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(Uuid::parse_str(json["user_id"].as_str().unwrap()).is_ok());
        assert_eq!(json["message"], "Game started");
    }

    #[tokio::test]
    async fn test_start_with_empty_vocabulary_returns_503() {
        let state = app_state_with(
            Arc::new(StaticWordSupplier::new(&[])),
            Arc::new(FailingAudioProvider),
            Arc::new(MemorySessionStore::new()),
        );

        let (status, body) = send(router().with_state(state), post("/start", None)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "empty_vocabulary");
    }

    #[tokio::test]
    async fn test_guess_returns_result_body() {
        // Arrange
        let state = test_app_state();
        let user_id = start(&state).await;
        let body = serde_json::json!({ "user_id": user_id, "guess": "DOG" });

        // Act
        let (status, body) = send(router().with_state(state), post("/guess", Some(body))).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["correct"], true);
        assert_eq!(json["score"], 1);
        assert_eq!(json["lives"], 3);
        assert_eq!(json["target_word"], "cat");
        assert_eq!(json["end_game"], false);
    }

    #[tokio::test]
    async fn test_guess_for_unknown_session_returns_404() {
        let app = router().with_state(test_app_state());
        let body = serde_json::json!({ "user_id": "nobody", "guess": "dog" });

        let (status, body) = send(app, post("/guess", Some(body))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "session_not_found");
    }

    #[tokio::test]
    async fn test_definition_without_user_id_returns_400() {
        let app = router().with_state(test_app_state());

        let (status, _) = send(app, get("/definition")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_audio_returns_bytes_with_media_type() {
        // Arrange
        let state = test_app_state();
        let user_id = start(&state).await;
        let app = router().with_state(state);

        // Act
        let response = app
            .oneshot(get(&format!("/audio?user_id={user_id}")))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"woof");
    }

    #[tokio::test]
    async fn test_audio_failure_returns_502() {
        let state = app_state_with(
            Arc::new(StaticWordSupplier::new(&["dog"])),
            Arc::new(FailingAudioProvider),
            Arc::new(MemorySessionStore::new()),
        );
        let user_id = start(&state).await;

        let (status, body) = send(
            router().with_state(state),
            get(&format!("/audio?user_id={user_id}")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "audio_unavailable");
    }

    #[tokio::test]
    async fn test_store_failure_returns_500() {
        let state = app_state_with(
            Arc::new(StaticWordSupplier::new(&["dog"])),
            Arc::new(FailingAudioProvider),
            Arc::new(FailingSessionStore),
        );

        let (status, body) = send(router().with_state(state), post("/start", None)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "infrastructure_error");
    }

    #[tokio::test]
    async fn test_reset_returns_message() {
        let state = test_app_state();
        let user_id = start(&state).await;

        let (status, body) = send(
            router().with_state(state),
            post(&format!("/reset?user_id={user_id}"), None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Game reset successfully");
    }
}
