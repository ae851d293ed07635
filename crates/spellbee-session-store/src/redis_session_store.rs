//! Redis implementation of the `SessionStore` trait.
//!
//! Redis enforces the time-to-live itself (`SET ... EX`), so an expired
//! session simply reads back as absent.

use std::time::Duration;

use async_trait::async_trait;
use redis::Client;
use redis::aio::ConnectionManager;
use spellbee_core::error::DomainError;
use spellbee_core::store::SessionStore;

/// Key namespace used when none is given.
pub const DEFAULT_KEY_PREFIX: &str = "spellbee:session:";

fn redis_error(context: &str, e: &redis::RedisError) -> DomainError {
    DomainError::Infrastructure(format!("{context}: {e}"))
}

/// Redis key holding the session `session_id`.
#[must_use]
pub fn session_key(prefix: &str, session_id: &str) -> String {
    format!("{prefix}{session_id}")
}

/// Whole seconds for `SET ... EX`; Redis rejects zero.
#[must_use]
pub fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// Redis-backed session store.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
    prefix: String,
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl RedisSessionStore {
    /// Connects to `redis_url` and verifies the connection.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the URL is invalid or the
    /// server cannot be reached.
    pub async fn connect(redis_url: &str) -> Result<Self, DomainError> {
        let client =
            Client::open(redis_url).map_err(|e| redis_error("invalid Redis URL", &e))?;
        let mut conn = client
            .get_connection_manager()
            .await
            .map_err(|e| redis_error("unable to connect to Redis", &e))?;

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("Redis ping failed", &e))?;

        Ok(Self {
            conn,
            prefix: DEFAULT_KEY_PREFIX.to_owned(),
        })
    }

    /// Uses `prefix` instead of [`DEFAULT_KEY_PREFIX`] for keys.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<Vec<u8>>, DomainError> {
        let mut conn = self.conn.clone();
        redis::cmd("GET")
            .arg(session_key(&self.prefix, session_id))
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("loading session failed", &e))
    }

    async fn put(
        &self,
        session_id: &str,
        payload: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        let (): () = redis::cmd("SET")
            .arg(session_key(&self.prefix, session_id))
            .arg(payload)
            .arg("EX")
            .arg(ttl_seconds(ttl))
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("saving session failed", &e))?;
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        let _: i64 = redis::cmd("DEL")
            .arg(session_key(&self.prefix, session_id))
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("deleting session failed", &e))?;
        Ok(())
    }
}
