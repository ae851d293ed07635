//! Spellbee HTTP API.
//!
//! Exposes the game session operations over HTTP. Every request that names
//! a session loads it from the configured store, runs one operation, and
//! writes it back while holding that session's lock.

pub mod app;
pub mod config;
pub mod error;
pub mod locks;
pub mod routes;
pub mod state;
