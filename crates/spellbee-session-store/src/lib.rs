//! Session stores for the Spellbee server.
//!
//! Every store keeps opaque session payloads under a session id and
//! enforces a time-to-live measured from the last write. Pick one per
//! deployment: in-memory for a single process, `PostgreSQL` or Redis when
//! several server processes share sessions.

pub mod memory;
pub mod pg_session_store;
pub mod redis_session_store;

use std::time::Duration;

use chrono::{DateTime, Utc};
use spellbee_core::error::DomainError;

pub use memory::InMemorySessionStore;
pub use pg_session_store::PgSessionStore;
pub use redis_session_store::RedisSessionStore;

/// Absolute expiry of an entry written at `now` with `ttl`.
///
/// # Errors
///
/// Returns `DomainError::Validation` if `ttl` does not fit a timestamp.
pub fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, DomainError> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| DomainError::Validation(format!("session ttl {ttl:?} out of range")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_expiry_after_adds_ttl() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();

        let expiry = expiry_after(now, Duration::from_secs(3600)).unwrap();

        assert_eq!(expiry, Utc.with_ymd_and_hms(2026, 1, 15, 11, 0, 0).unwrap());
    }

    #[test]
    fn test_expiry_after_rejects_absurd_ttl() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();

        let result = expiry_after(now, Duration::from_secs(u64::MAX));

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
