//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The word supplier had no words to hand out.
    #[error("word supplier returned no words")]
    EmptyVocabulary,

    /// No dictionary definition exists for a word. Recovered by the game
    /// session, which substitutes the sentinel definition.
    #[error("no definition available for {0:?}")]
    DefinitionUnavailable(String),

    /// Pronunciation audio could not be produced for a word.
    #[error("audio unavailable for {word:?}: {reason}")]
    AudioUnavailable {
        /// The word whose audio was requested.
        word: String,
        /// Why the lookup or synthesis failed.
        reason: String,
    },

    /// No session is stored under the given identifier.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// The session existed but its time-to-live has elapsed.
    #[error("session expired: {0}")]
    SessionExpired(String),

    /// Persisted session state is corrupted or uses an unknown schema.
    #[error("session state could not be decoded: {0}")]
    Serialization(String),

    /// A guess was submitted after the game reached a terminal state.
    #[error("game is over; no further guesses are accepted")]
    GameOver,

    /// A validation error in request or domain input.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Returns `true` when the error means the caller has no usable session
    /// and must start a new game.
    #[must_use]
    pub fn is_session_unusable(&self) -> bool {
        matches!(
            self,
            Self::SessionNotFound(_) | Self::SessionExpired(_) | Self::Serialization(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_expired_and_corrupt_sessions_are_unusable() {
        assert!(DomainError::SessionNotFound("a".into()).is_session_unusable());
        assert!(DomainError::SessionExpired("a".into()).is_session_unusable());
        assert!(DomainError::Serialization("bad".into()).is_session_unusable());
    }

    #[test]
    fn test_collaborator_failures_are_not_session_errors() {
        assert!(!DomainError::EmptyVocabulary.is_session_unusable());
        assert!(!DomainError::GameOver.is_session_unusable());
        assert!(
            !DomainError::AudioUnavailable {
                word: "cat".into(),
                reason: "missing".into(),
            }
            .is_session_unusable()
        );
    }

    #[test]
    fn test_audio_unavailable_message_names_word() {
        let err = DomainError::AudioUnavailable {
            word: "cat".into(),
            reason: "no such clip".into(),
        };
        assert_eq!(err.to_string(), "audio unavailable for \"cat\": no such clip");
    }
}
