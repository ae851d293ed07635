//! Collaborator interfaces the game session calls through.
//!
//! Word and definition data come from a read-only corpus shared by every
//! session; audio comes from whatever backend holds the pronunciation clips.
//! The session never mutates any of them.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::rng::DeterministicRng;

/// Supplies candidate target words.
pub trait WordSupplier: Send + Sync {
    /// Draws up to `count` distinct words, without replacement, in random
    /// order. Returns fewer words only when the vocabulary is smaller than
    /// `count`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyVocabulary` if the backing vocabulary is
    /// empty or unavailable.
    fn sample(
        &self,
        count: usize,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Vec<String>, DomainError>;
}

/// Maps a word to its dictionary definitions.
#[async_trait]
pub trait DefinitionProvider: Send + Sync {
    /// Looks up the definitions for `word`, most common sense first.
    ///
    /// An empty list means the word has no definition. Must be
    /// deterministic for a given corpus snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DefinitionUnavailable` (or an infrastructure
    /// error) if the lookup cannot be performed.
    async fn lookup(&self, word: &str) -> Result<Vec<String>, DomainError>;
}

/// Maps a word to pronunciation audio.
#[async_trait]
pub trait AudioProvider: Send + Sync {
    /// Fetches the encoded audio clip for `word`. The bytes are opaque.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AudioUnavailable` on any lookup or synthesis
    /// failure.
    async fn fetch(&self, word: &str) -> Result<Vec<u8>, DomainError>;

    /// Media type of the bytes returned by [`AudioProvider::fetch`].
    fn media_type(&self) -> &'static str {
        "audio/mpeg"
    }
}
