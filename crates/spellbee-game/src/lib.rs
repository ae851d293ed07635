//! Game session bounded context.
//!
//! Owns the per-player state machine (lives, score, word progression and
//! definition cycling), its versioned persisted form, and the application
//! handlers that load, mutate and store a session per request.

pub mod application;
pub mod domain;
