//! Query handlers for the game session context.
//!
//! These load a session and read from it without writing it back.

use serde::Serialize;
use spellbee_core::error::DomainError;
use spellbee_core::provider::AudioProvider;
use spellbee_core::store::SessionStore;

use crate::application::command_handlers::load_session;
use crate::domain::session::GameSession;

/// Read-only view of a game's progress.
///
/// The current target word is deliberately absent: the player only hears
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    /// Words spelled correctly so far.
    pub score: u32,
    /// Lives remaining.
    pub lives: u32,
    /// Words already completed.
    pub words_completed: usize,
    /// Words in this game.
    pub words_total: usize,
    /// `active`, `exhausted` or `failed`.
    pub status: &'static str,
}

impl From<&GameSession> for GameView {
    fn from(session: &GameSession) -> Self {
        Self {
            score: session.score(),
            lives: session.lives(),
            words_completed: session.current_index(),
            words_total: session.target_words().len(),
            status: session.status().as_str(),
        }
    }
}

/// Encoded pronunciation audio plus its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// The encoded audio.
    pub bytes: Vec<u8>,
    /// MIME type for the response.
    pub media_type: &'static str,
}

/// Retrieves the progress view of a session.
///
/// # Errors
///
/// Returns session load errors.
pub async fn get_game_view(
    session_id: &str,
    store: &dyn SessionStore,
) -> Result<GameView, DomainError> {
    let session = load_session(session_id, store).await?;
    Ok(GameView::from(&session))
}

/// Retrieves pronunciation audio for a session's current word.
///
/// # Errors
///
/// Returns session load errors, or `DomainError::AudioUnavailable` from the
/// provider.
pub async fn get_audio(
    session_id: &str,
    provider: &dyn AudioProvider,
    store: &dyn SessionStore,
) -> Result<AudioClip, DomainError> {
    let session = load_session(session_id, store).await?;
    let bytes = session.audio_bytes(provider).await?;
    Ok(AudioClip {
        bytes,
        media_type: provider.media_type(),
    })
}
