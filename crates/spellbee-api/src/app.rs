//! Router assembly shared by the server binary and integration tests.

use std::path::Path;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

/// Builds the full application router.
///
/// When `static_dir` is set, paths no route matches are served from that
/// directory, so the browser front-end and the API share one origin.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let router = Router::new()
        .merge(routes::health::router())
        .merge(routes::game::router());

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
