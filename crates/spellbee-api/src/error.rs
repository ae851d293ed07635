//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use spellbee_core::error::DomainError;
use spellbee_corpus::CorpusError;
use thiserror::Error;
use tracing::{error, warn};

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The word or definition corpus could not be loaded.
    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The session store could not be initialised.
    #[error("session store error: {0}")]
    SessionStore(#[from] DomainError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            // The client starts over whichever way the session was lost.
            err if err.is_session_unusable() => (StatusCode::NOT_FOUND, "session_not_found"),
            DomainError::SessionNotFound(_)
            | DomainError::SessionExpired(_)
            | DomainError::Serialization(_) => (StatusCode::NOT_FOUND, "session_not_found"),
            DomainError::GameOver => (StatusCode::CONFLICT, "game_over"),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::EmptyVocabulary => (StatusCode::SERVICE_UNAVAILABLE, "empty_vocabulary"),
            DomainError::AudioUnavailable { .. } => (StatusCode::BAD_GATEWAY, "audio_unavailable"),
            DomainError::DefinitionUnavailable(_) => {
                (StatusCode::BAD_GATEWAY, "definition_unavailable")
            }
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        if status.is_server_error() {
            error!(error = %self.0, code = error_code, "request failed");
        } else {
            warn!(error = %self.0, code = error_code, "request rejected");
        }

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
