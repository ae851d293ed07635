//! Shared application state.

use std::sync::{Arc, Mutex};

use spellbee_core::provider::{AudioProvider, DefinitionProvider, WordSupplier};
use spellbee_core::rng::DeterministicRng;
use spellbee_core::store::SessionStore;
use spellbee_game::application::command_handlers::GameSettings;

use crate::locks::SessionLocks;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Word count and session time-to-live.
    pub settings: GameSettings,
    /// Source of target words.
    pub word_supplier: Arc<dyn WordSupplier>,
    /// Dictionary used for definition hints.
    pub definition_provider: Arc<dyn DefinitionProvider>,
    /// Source of pronunciation clips.
    pub audio_provider: Arc<dyn AudioProvider>,
    /// RNG behind every word draw.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Where sessions live between requests.
    pub session_store: Arc<dyn SessionStore>,
    /// One lock per session id being served.
    pub session_locks: Arc<SessionLocks>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        settings: GameSettings,
        word_supplier: Arc<dyn WordSupplier>,
        definition_provider: Arc<dyn DefinitionProvider>,
        audio_provider: Arc<dyn AudioProvider>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        session_store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            settings,
            word_supplier,
            definition_provider,
            audio_provider,
            rng,
            session_store,
            session_locks: Arc::new(SessionLocks::new()),
        }
    }
}
