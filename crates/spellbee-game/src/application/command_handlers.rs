//! Command handlers for the game session context.
//!
//! Each handler loads the session from the store, invokes one operation on
//! it, and writes it back. Handlers never hold a session across requests;
//! per-session serialization of concurrent requests is the caller's job.

use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;
use spellbee_core::command::Command;
use spellbee_core::error::DomainError;
use spellbee_core::provider::{DefinitionProvider, WordSupplier};
use spellbee_core::rng::DeterministicRng;
use spellbee_core::store::{DEFAULT_SESSION_TTL, SessionStore};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::commands::{CycleDefinition, ResetGame, ShowDefinition, StartGame, SubmitGuess};
use crate::domain::guess::GuessResult;
use crate::domain::session::{DEFAULT_WORD_COUNT, GameSession};

/// Per-deployment game settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    /// Words drawn for each new game.
    pub word_count: usize,
    /// Time-to-live applied on every session write.
    pub session_ttl: Duration,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            word_count: DEFAULT_WORD_COUNT,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

/// A freshly started game.
#[derive(Debug)]
pub struct StartedGame {
    /// The identifier the player uses for every later request.
    pub session_id: String,
    /// The new session, as stored.
    pub session: GameSession,
}

/// The definition shown to the player and how many exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionView {
    /// Selected definition text.
    pub definition: String,
    /// Number of definitions available for the current word.
    pub count: usize,
}

/// Loads and decodes the session stored under `session_id`.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` if nothing is stored,
/// `DomainError::SessionExpired` if the store reports expiry, and
/// `DomainError::Serialization` if the stored payload is unreadable.
pub async fn load_session(
    session_id: &str,
    store: &dyn SessionStore,
) -> Result<GameSession, DomainError> {
    let Some(payload) = store.get(session_id).await? else {
        return Err(DomainError::SessionNotFound(session_id.to_owned()));
    };
    GameSession::from_bytes(&payload).inspect_err(|e| {
        warn!(session_id, error = %e, "discarding unreadable session");
    })
}

/// Encodes and stores `session`, restarting its time-to-live.
///
/// # Errors
///
/// Returns `DomainError` if encoding or the store write fails.
pub async fn save_session(
    session_id: &str,
    session: &GameSession,
    ttl: Duration,
    store: &dyn SessionStore,
) -> Result<(), DomainError> {
    let payload = session.to_bytes()?;
    store.put(session_id, payload, ttl).await
}

fn draw_session(
    supplier: &dyn WordSupplier,
    rng: &Mutex<dyn DeterministicRng + Send>,
    word_count: usize,
) -> Result<GameSession, DomainError> {
    // Lock the RNG only for the synchronous draw, never across an await.
    let mut rng_guard = rng
        .lock()
        .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
    GameSession::initialize(supplier, &mut *rng_guard, word_count)
}

/// Handles the `StartGame` command: draws a new word list, stores the
/// session under a new identifier, and returns it.
///
/// # Errors
///
/// Returns `DomainError::EmptyVocabulary` if no words are available, or a
/// store error if persisting fails.
pub async fn handle_start_game(
    command: &StartGame,
    settings: &GameSettings,
    supplier: &dyn WordSupplier,
    rng: &Mutex<dyn DeterministicRng + Send>,
    store: &dyn SessionStore,
) -> Result<StartedGame, DomainError> {
    let session = draw_session(supplier, rng, settings.word_count)?;
    let session_id = Uuid::new_v4().to_string();

    save_session(&session_id, &session, settings.session_ttl, store).await?;
    debug!(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        session_id = %session_id,
        "game started"
    );

    Ok(StartedGame {
        session_id,
        session,
    })
}

/// Handles the `ShowDefinition` command: returns the selected definition of
/// the current word. The session is written back only when the definitions
/// had to be fetched, so the provider is asked once per word.
///
/// # Errors
///
/// Returns session load errors, a definition provider failure other than
/// `DefinitionUnavailable` (nothing is written), or a store error if
/// persisting fails.
pub async fn handle_show_definition(
    command: &ShowDefinition,
    settings: &GameSettings,
    provider: &dyn DefinitionProvider,
    store: &dyn SessionStore,
) -> Result<DefinitionView, DomainError> {
    let mut session = load_session(&command.session_id, store).await?;

    let fetched = session.load_definitions(provider).await?;
    let definition = session.current_definition(provider).await?;
    let count = session.definition_count(provider).await?;

    if fetched {
        save_session(&command.session_id, &session, settings.session_ttl, store).await?;
    }

    Ok(DefinitionView { definition, count })
}

/// Handles the `CycleDefinition` command: advances to the next definition
/// of the current word and persists the new cursor.
///
/// # Errors
///
/// Returns session load errors, a definition provider failure other than
/// `DefinitionUnavailable` (nothing is written), or a store error if
/// persisting fails.
pub async fn handle_cycle_definition(
    command: &CycleDefinition,
    settings: &GameSettings,
    provider: &dyn DefinitionProvider,
    store: &dyn SessionStore,
) -> Result<DefinitionView, DomainError> {
    let mut session = load_session(&command.session_id, store).await?;

    let definition = session.cycle_definition(provider).await?;
    let count = session.definition_count(provider).await?;

    save_session(&command.session_id, &session, settings.session_ttl, store).await?;

    Ok(DefinitionView { definition, count })
}

/// Handles the `SubmitGuess` command: scores the guess and persists the
/// updated session.
///
/// # Errors
///
/// Returns session load errors, `DomainError::GameOver` for a finished game
/// (nothing is written), or a store error if persisting fails.
pub async fn handle_submit_guess(
    command: &SubmitGuess,
    settings: &GameSettings,
    store: &dyn SessionStore,
) -> Result<GuessResult, DomainError> {
    let mut session = load_session(&command.session_id, store).await?;

    let result = session.submit_guess(&command.guess)?;

    save_session(&command.session_id, &session, settings.session_ttl, store).await?;
    debug!(
        correlation_id = %command.correlation_id,
        correct = result.correct,
        end_game = result.end_game,
        "guess scored"
    );

    Ok(result)
}

/// Handles the `ResetGame` command: replaces the session's game with a new
/// draw under the same identifier.
///
/// # Errors
///
/// Returns session load errors, `DomainError::EmptyVocabulary`, or a store
/// error if persisting fails.
pub async fn handle_reset_game(
    command: &ResetGame,
    settings: &GameSettings,
    supplier: &dyn WordSupplier,
    rng: &Mutex<dyn DeterministicRng + Send>,
    store: &dyn SessionStore,
) -> Result<GameSession, DomainError> {
    // Only an existing session may be reset.
    load_session(&command.session_id, store).await?;

    let session = draw_session(supplier, rng, settings.word_count)?;

    save_session(&command.session_id, &session, settings.session_ttl, store).await?;

    Ok(session)
}
