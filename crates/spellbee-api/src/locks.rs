//! Per-session request serialization.
//!
//! Every handler that touches a session does load, mutate, store. Two
//! requests for the same session must not interleave those steps, or one
//! update is lost. Requests for different sessions never wait on each other.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<String, Arc<Mutex<()>>>;

/// Held for the duration of one session's read-modify-write.
///
/// Dropping it releases the session and, when no other request holds or
/// waits on the same session, removes its entry from the registry.
#[derive(Debug)]
pub struct SessionGuard {
    _guard: OwnedMutexGuard<()>,
    _release: Release,
}

#[derive(Debug)]
struct Release {
    locks: Arc<LockMap>,
    session_id: String,
}

impl Drop for Release {
    fn drop(&mut self) {
        // The map's own reference is the only one left once every holder
        // and waiter is gone.
        self.locks
            .remove_if(&self.session_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Registry of one async mutex per session id with a request in flight.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: Arc<LockMap>,
}

impl SessionLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other request holds `session_id`, then holds it until
    /// the returned guard is dropped.
    pub async fn acquire(&self, session_id: &str) -> SessionGuard {
        let lock = self
            .locks
            .entry(session_id.to_owned())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        let release = Release {
            locks: Arc::clone(&self.locks),
            session_id: session_id.to_owned(),
        };

        SessionGuard {
            _guard: lock.lock_owned().await,
            _release: release,
        }
    }

    /// Number of sessions with a request holding or waiting on their lock.
    #[must_use]
    pub fn active(&self) -> usize {
        self.locks.len()
    }
}
