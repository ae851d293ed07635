//! Shared domain abstractions for the Spellbee server.
//!
//! This crate defines the error taxonomy, the determinism seams (clock and
//! RNG), and the narrow collaborator interfaces the game session calls
//! through. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod provider;
pub mod rng;
pub mod store;
