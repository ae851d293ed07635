//! Shared test mocks and utilities for the Spellbee server.

mod clock;
mod provider;
mod rng;
mod store;

pub use clock::AdjustableClock;
pub use provider::{
    FailingAudioProvider, FailingDefinitionProvider, FlakyDefinitionProvider, StaticAudioProvider,
    StaticDefinitionProvider, StaticWordSupplier,
};
pub use rng::{MockRng, SequenceRng};
pub use store::{FailingSessionStore, MemorySessionStore};
