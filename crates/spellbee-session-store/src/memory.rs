//! Process-local session store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use spellbee_core::clock::Clock;
use spellbee_core::error::DomainError;
use spellbee_core::store::SessionStore;
use tokio::sync::RwLock;
use tracing::debug;

use crate::expiry_after;

/// Sessions kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 10_000;

#[derive(Debug, Clone)]
struct Entry {
    payload: Vec<u8>,
    expires_at: DateTime<Utc>,
}

/// Session store backed by a map in this process.
///
/// Expired entries are dropped when read or swept by
/// [`InMemorySessionStore::purge_expired`]. When the store is full, writing
/// a new session first purges expired entries and then evicts the session
/// closest to expiry.
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
    capacity: usize,
}

impl std::fmt::Debug for InMemorySessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySessionStore")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl InMemorySessionStore {
    /// Creates a store reading time from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_capacity(clock, DEFAULT_CAPACITY)
    }

    /// Creates a store holding at most `capacity` sessions.
    #[must_use]
    pub fn with_capacity(clock: Arc<dyn Clock>, capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            capacity: capacity.max(1),
        }
    }

    /// Removes every expired session and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of sessions currently held, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Reads `session_id` from the locked map, removing it only if it is still
/// expired at `now`.
fn read_or_drop_expired(
    entries: &mut HashMap<String, Entry>,
    session_id: &str,
    now: DateTime<Utc>,
) -> Result<Option<Vec<u8>>, DomainError> {
    match entries.get(session_id) {
        None => Ok(None),
        Some(entry) if entry.expires_at > now => Ok(Some(entry.payload.clone())),
        Some(_) => {
            entries.remove(session_id);
            debug!(session_id, "dropped expired session");
            Err(DomainError::SessionExpired(session_id.to_owned()))
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<Vec<u8>>, DomainError> {
        let now = self.clock.now();
        {
            let entries = self.entries.read().await;
            match entries.get(session_id) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.payload.clone())),
                Some(_) => {}
            }
        }

        // A put may have landed between releasing the read lock and taking
        // the write lock.
        let mut entries = self.entries.write().await;
        read_or_drop_expired(&mut entries, session_id, now)
    }

    async fn put(
        &self,
        session_id: &str,
        payload: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let now = self.clock.now();
        let expires_at = expiry_after(now, ttl)?;

        let mut entries = self.entries.write().await;
        if !entries.contains_key(session_id) && entries.len() >= self.capacity {
            entries.retain(|_, entry| entry.expires_at > now);
            if entries.len() >= self.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.expires_at)
                    .map(|(id, _)| id.clone());
                if let Some(id) = oldest {
                    debug!(session_id = %id, "evicting session at capacity");
                    entries.remove(&id);
                }
            }
        }
        entries.insert(
            session_id.to_owned(),
            Entry {
                payload,
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<(), DomainError> {
        self.entries.write().await.remove(session_id);
        Ok(())
    }
}
