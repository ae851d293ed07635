//! `PostgreSQL` implementation of the `SessionStore` trait.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use spellbee_core::clock::Clock;
use spellbee_core::error::DomainError;
use spellbee_core::store::SessionStore;
use tracing::debug;

use crate::expiry_after;

fn db_error(context: &str, e: &sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("{context}: {e}"))
}

/// PostgreSQL-backed session store using the `game_sessions` table.
pub struct PgSessionStore {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for PgSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgSessionStore")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl PgSessionStore {
    /// Creates a new `PgSessionStore`.
    #[must_use]
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Applies the bundled schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if a migration fails.
    pub async fn migrate(&self) -> Result<(), DomainError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("migration failed: {e}")))
    }

    /// Deletes every expired session and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` on query failure.
    pub async fn purge_expired(&self) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM game_sessions WHERE expires_at <= $1")
            .bind(self.clock.now())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("purging expired sessions failed", &e))?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<Vec<u8>>, DomainError> {
        let row: Option<(Vec<u8>, DateTime<Utc>)> =
            sqlx::query_as("SELECT payload, expires_at FROM game_sessions WHERE session_id = $1")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("loading session failed", &e))?;

        match row {
            None => Ok(None),
            Some((_, expires_at)) if expires_at <= self.clock.now() => {
                self.delete(session_id).await?;
                debug!(session_id, "dropped expired session");
                Err(DomainError::SessionExpired(session_id.to_owned()))
            }
            Some((payload, _)) => Ok(Some(payload)),
        }
    }

    async fn put(
        &self,
        session_id: &str,
        payload: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let expires_at = expiry_after(self.clock.now(), ttl)?;
        sqlx::query(
            "INSERT INTO game_sessions (session_id, payload, expires_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (session_id) \
             DO UPDATE SET payload = EXCLUDED.payload, expires_at = EXCLUDED.expires_at",
        )
        .bind(session_id)
        .bind(payload)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("saving session failed", &e))?;
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM game_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting session failed", &e))?;
        Ok(())
    }
}
