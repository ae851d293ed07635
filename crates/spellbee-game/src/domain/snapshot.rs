//! Persisted form of a game session.
//!
//! Sessions are stored as a JSON envelope carrying an explicit
//! `schema_version`. Version 2 is written; version 1 (no definition cursor,
//! lives stored as a signed `lifes` counter) is upgraded on read. Anything
//! else is rejected, as is any payload whose decoded state breaks the
//! session invariants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use spellbee_core::error::DomainError;

use super::session::{GameSession, STARTING_LIVES};

/// Schema version written by [`encode`].
pub const SCHEMA_VERSION: u64 = 2;

#[derive(Debug, Serialize, Deserialize)]
struct SessionRecordV2 {
    target_words: Vec<String>,
    current_index: usize,
    target_word: String,
    lives: u32,
    score: u32,
    definitions_cache: BTreeMap<String, Vec<String>>,
    definition_cursor: BTreeMap<String, usize>,
}

#[derive(Debug, Deserialize)]
struct SessionRecordV1 {
    target_words: Vec<String>,
    current_target_word_index: usize,
    target_word: String,
    lifes: i64,
    score: u32,
    #[serde(default)]
    definitions: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Serialize)]
struct EnvelopeOut<'a> {
    schema_version: u64,
    session: &'a SessionRecordV2,
}

#[derive(Debug, Deserialize)]
struct EnvelopeIn {
    schema_version: u64,
    session: serde_json::Value,
}

impl From<&GameSession> for SessionRecordV2 {
    fn from(session: &GameSession) -> Self {
        Self {
            target_words: session.target_words.clone(),
            current_index: session.current_index,
            target_word: session.target_word.clone(),
            lives: session.lives,
            score: session.score,
            definitions_cache: session.definitions_cache.clone(),
            definition_cursor: session.definition_cursor.clone(),
        }
    }
}

impl From<SessionRecordV1> for SessionRecordV2 {
    fn from(old: SessionRecordV1) -> Self {
        let definition_cursor = old.definitions.keys().map(|w| (w.clone(), 0)).collect();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let lives = old.lifes.clamp(0, i64::from(STARTING_LIVES)) as u32;
        Self {
            target_words: old.target_words,
            current_index: old.current_target_word_index,
            target_word: old.target_word,
            lives,
            score: old.score,
            definitions_cache: old.definitions,
            definition_cursor,
        }
    }
}

/// Serializes a session into the current schema.
///
/// # Errors
///
/// Returns `DomainError::Serialization` if JSON encoding fails.
pub fn encode(session: &GameSession) -> Result<Vec<u8>, DomainError> {
    let record = SessionRecordV2::from(session);
    serde_json::to_vec(&EnvelopeOut {
        schema_version: SCHEMA_VERSION,
        session: &record,
    })
    .map_err(|e| DomainError::Serialization(format!("session encoding failed: {e}")))
}

/// Restores a session from bytes produced by [`encode`] or by the version 1
/// layout.
///
/// # Errors
///
/// Returns `DomainError::Serialization` if the payload is not a recognised
/// envelope, names an unknown schema version, or decodes to a state that
/// violates the session invariants.
pub fn decode(bytes: &[u8]) -> Result<GameSession, DomainError> {
    let envelope: EnvelopeIn = serde_json::from_slice(bytes)
        .map_err(|e| DomainError::Serialization(format!("malformed session envelope: {e}")))?;

    let record = match envelope.schema_version {
        1 => serde_json::from_value::<SessionRecordV1>(envelope.session).map(SessionRecordV2::from),
        2 => serde_json::from_value::<SessionRecordV2>(envelope.session),
        other => {
            return Err(DomainError::Serialization(format!(
                "unsupported schema version {other}"
            )));
        }
    }
    .map_err(|e| DomainError::Serialization(format!("malformed session body: {e}")))?;

    validate(&record)?;

    Ok(GameSession {
        target_words: record.target_words,
        current_index: record.current_index,
        target_word: record.target_word,
        lives: record.lives,
        score: record.score,
        definitions_cache: record.definitions_cache,
        definition_cursor: record.definition_cursor,
    })
}

fn validate(record: &SessionRecordV2) -> Result<(), DomainError> {
    let invalid = |msg: String| Err(DomainError::Serialization(msg));

    let total = record.target_words.len();
    if total == 0 {
        return invalid("session has no target words".to_owned());
    }
    if record.current_index > total {
        return invalid(format!(
            "current index {} beyond {total} words",
            record.current_index
        ));
    }
    let expected = &record.target_words[record.current_index.min(total - 1)];
    if &record.target_word != expected {
        return invalid(format!(
            "target word {:?} does not match word list at index {}",
            record.target_word, record.current_index
        ));
    }
    if record.lives > STARTING_LIVES {
        return invalid(format!("lives {} above maximum", record.lives));
    }
    if let Some((word, _)) = record.definitions_cache.iter().find(|(_, d)| d.is_empty()) {
        return invalid(format!("empty definition list for {word:?}"));
    }
    for (word, &cursor) in &record.definition_cursor {
        let Some(defs) = record.definitions_cache.get(word) else {
            return invalid(format!("cursor for uncached word {word:?}"));
        };
        if cursor >= defs.len() {
            return invalid(format!("cursor {cursor} out of range for {word:?}"));
        }
    }
    Ok(())
}

impl GameSession {
    /// Serializes this session. See [`encode`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Serialization` if JSON encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DomainError> {
        encode(self)
    }

    /// Restores a session. See [`decode`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Serialization` for unreadable payloads.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DomainError> {
        decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use spellbee_test_support::{MockRng, StaticDefinitionProvider, StaticWordSupplier};

    fn played_session() -> GameSession {
        let supplier = StaticWordSupplier::new(&["cat", "dog", "emu", "horse"]);
        GameSession::initialize(&supplier, &mut MockRng, 1000).unwrap()
    }

    #[tokio::test]
    async fn test_round_trip_preserves_every_field() {
        // Arrange
        let mut session = played_session();
        let provider = StaticDefinitionProvider::new()
            .with("cat", &["feline", "jazz fan"])
            .with("dog", &["canine"]);
        session.cycle_definition(&provider).await.unwrap();
        session.submit_guess("cat").unwrap();
        session.submit_guess("dgo").unwrap();
        session.current_definition(&provider).await.unwrap();

        // Act
        let restored = GameSession::from_bytes(&session.to_bytes().unwrap()).unwrap();

        // Assert
        assert_eq!(restored, session);
        assert_eq!(restored.lives(), 2);
        assert_eq!(restored.score(), 1);
        assert_eq!(restored.definition_cursor("cat"), 1);
    }

    #[test]
    fn test_encode_writes_schema_version() {
        let bytes = played_session().to_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["schema_version"], SCHEMA_VERSION);
        assert_eq!(json["session"]["target_word"], "cat");
    }

    #[test]
    fn test_round_trip_of_exhausted_session() {
        let supplier = StaticWordSupplier::new(&["ox"]);
        let mut session = GameSession::initialize(&supplier, &mut MockRng, 10).unwrap();
        session.submit_guess("ox").unwrap();

        let restored = GameSession::from_bytes(&session.to_bytes().unwrap()).unwrap();

        assert_eq!(restored, session);
        assert_eq!(restored.current_index(), 1);
        assert_eq!(restored.target_word(), "ox");
    }

    #[test]
    fn test_version_one_payload_is_upgraded() {
        // Arrange
        let payload = serde_json::json!({
            "schema_version": 1,
            "session": {
                "target_words": ["cat", "dog"],
                "current_target_word_index": 1,
                "target_word": "dog",
                "lifes": -2,
                "score": 1,
                "definitions": { "cat": ["feline", "jazz fan"] }
            }
        });

        // Act
        let session = GameSession::from_bytes(&serde_json::to_vec(&payload).unwrap()).unwrap();

        // Assert
        assert_eq!(session.lives(), 0);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.definition_cursor("cat"), 0);
        assert_eq!(session.cached_definitions("cat").unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_schema_version_is_rejected() {
        let payload = serde_json::json!({ "schema_version": 9, "session": {} });

        let result = GameSession::from_bytes(&serde_json::to_vec(&payload).unwrap());

        match result {
            Err(DomainError::Serialization(msg)) => assert!(msg.contains("version 9")),
            other => panic!("expected Serialization, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let result = GameSession::from_bytes(b"\x80\x04pickle");

        assert!(matches!(result, Err(DomainError::Serialization(_))));
    }

    #[test]
    fn test_payload_without_envelope_is_rejected() {
        let payload = serde_json::json!({ "target_words": ["cat"], "lives": 3 });

        let result = GameSession::from_bytes(&serde_json::to_vec(&payload).unwrap());

        assert!(matches!(result, Err(DomainError::Serialization(_))));
    }

    #[test]
    fn test_mismatched_target_word_is_rejected() {
        let mut json: serde_json::Value =
            serde_json::from_slice(&played_session().to_bytes().unwrap()).unwrap();
        json["session"]["target_word"] = "zebra".into();

        let result = GameSession::from_bytes(&serde_json::to_vec(&json).unwrap());

        assert!(matches!(result, Err(DomainError::Serialization(_))));
    }

    #[test]
    fn test_out_of_range_cursor_is_rejected() {
        let mut json: serde_json::Value =
            serde_json::from_slice(&played_session().to_bytes().unwrap()).unwrap();
        json["session"]["definitions_cache"] = serde_json::json!({ "cat": ["feline"] });
        json["session"]["definition_cursor"] = serde_json::json!({ "cat": 1 });

        let result = GameSession::from_bytes(&serde_json::to_vec(&json).unwrap());

        assert!(matches!(result, Err(DomainError::Serialization(_))));
    }

    #[test]
    fn test_index_past_end_is_rejected() {
        let mut json: serde_json::Value =
            serde_json::from_slice(&played_session().to_bytes().unwrap()).unwrap();
        json["session"]["current_index"] = 5.into();

        let result = GameSession::from_bytes(&serde_json::to_vec(&json).unwrap());

        assert!(matches!(result, Err(DomainError::Serialization(_))));
    }
}
