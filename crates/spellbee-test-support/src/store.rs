//! Mock `SessionStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use spellbee_core::error::DomainError;
use spellbee_core::store::SessionStore;

/// A session store that keeps payloads in a map, never expires them, and
/// records every write.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    ttls: Mutex<Vec<Duration>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `put` calls made so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn put_count(&self) -> usize {
        self.ttls.lock().unwrap().len()
    }

    /// TTL passed to the most recent `put`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn last_ttl(&self) -> Option<Duration> {
        self.ttls.lock().unwrap().last().copied()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<Vec<u8>>, DomainError> {
        Ok(self.entries.lock().unwrap().get(session_id).cloned())
    }

    async fn put(
        &self,
        session_id: &str,
        payload: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        self.entries
            .lock()
            .unwrap()
            .insert(session_id.to_owned(), payload);
        self.ttls.lock().unwrap().push(ttl);
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<(), DomainError> {
        self.entries.lock().unwrap().remove(session_id);
        Ok(())
    }
}

/// A session store that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingSessionStore;

#[async_trait]
impl SessionStore for FailingSessionStore {
    async fn get(&self, _session_id: &str) -> Result<Option<Vec<u8>>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn put(
        &self,
        _session_id: &str,
        _payload: Vec<u8>,
        _ttl: Duration,
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn delete(&self, _session_id: &str) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
