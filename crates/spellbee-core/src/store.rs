//! Session store abstraction.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::DomainError;

/// Default time-to-live of a persisted session, measured from its last write.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// Persists serialized game sessions keyed by an opaque session identifier.
///
/// The store owns expiry. Callers must serialize read-modify-write cycles
/// per session id; the store itself provides no locking across a get/put
/// pair.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the payload stored under `session_id`.
    ///
    /// Returns `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionExpired` when the store can tell the
    /// entry outlived its time-to-live, or `DomainError::Infrastructure` on
    /// backend failure.
    async fn get(&self, session_id: &str) -> Result<Option<Vec<u8>>, DomainError>;

    /// Stores `payload` under `session_id`, replacing any previous value and
    /// restarting its time-to-live.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` on backend failure.
    async fn put(
        &self,
        session_id: &str,
        payload: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), DomainError>;

    /// Evicts the session stored under `session_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` on backend failure.
    async fn delete(&self, session_id: &str) -> Result<(), DomainError>;
}
