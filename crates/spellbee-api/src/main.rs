//! Spellbee API server entry point.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use spellbee_api::app::build_router;
use spellbee_api::config::{AppConfig, SessionBackend};
use spellbee_api::error::AppError;
use spellbee_api::state::AppState;
use spellbee_core::clock::{Clock, SystemClock};
use spellbee_core::rng::{DeterministicRng, SystemRng};
use spellbee_core::store::SessionStore;
use spellbee_corpus::{Corpus, DirectoryAudioProvider};
use spellbee_session_store::{InMemorySessionStore, PgSessionStore, RedisSessionStore};

/// How often expired sessions are swept from stores without native expiry.
const PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Spellbee API server");

    let config = AppConfig::from_env()?;

    let corpus = Arc::new(Corpus::load(&config.words_file, &config.definitions_file)?);
    if corpus.is_empty() {
        tracing::warn!("vocabulary is empty; every new game will be refused");
    }

    let audio = Arc::new(DirectoryAudioProvider::new(
        &config.audio_dir,
        config.audio_voice.clone(),
        config.audio_extension.clone(),
    ));

    let session_store = build_session_store(&config).await?;

    let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
        Arc::new(Mutex::new(SystemRng::from_entropy()));

    let app_state = AppState::new(
        config.game_settings(),
        corpus.clone(),
        corpus,
        audio,
        rng,
        session_store,
    );

    let app = build_router(app_state, config.static_dir.as_deref());

    // Start server.
    let addr = config.bind_addr()?;
    tracing::info!(backend = config.backend.name(), "Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects the configured session store. Stores that do not expire
/// entries on their own get a background sweep.
async fn build_session_store(config: &AppConfig) -> Result<Arc<dyn SessionStore>, AppError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    match &config.backend {
        SessionBackend::Memory => {
            let store = Arc::new(InMemorySessionStore::new(clock));
            let sweeper = store.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(PURGE_INTERVAL);
                loop {
                    interval.tick().await;
                    let removed = sweeper.purge_expired().await;
                    if removed > 0 {
                        tracing::debug!(removed, "purged expired sessions");
                    }
                }
            });
            Ok(store)
        }
        SessionBackend::Postgres { database_url } => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await?;
            let store = Arc::new(PgSessionStore::new(pool, clock));
            store.migrate().await?;

            let sweeper = store.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(PURGE_INTERVAL);
                loop {
                    interval.tick().await;
                    match sweeper.purge_expired().await {
                        Ok(0) => {}
                        Ok(removed) => tracing::debug!(removed, "purged expired sessions"),
                        Err(e) => tracing::warn!(error = %e, "session purge failed"),
                    }
                }
            });
            Ok(store)
        }
        SessionBackend::Redis { redis_url } => {
            let store = RedisSessionStore::connect(redis_url).await?;
            Ok(Arc::new(store))
        }
    }
}
