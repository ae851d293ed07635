//! Domain layer for the game session context.

pub mod commands;
pub mod guess;
pub mod session;
pub mod snapshot;
