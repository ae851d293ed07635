//! The word, definition and audio sources behind a game session.
//!
//! A [`Corpus`] is loaded once at startup from two JSON files (the
//! vocabulary and its definitions) and then shared read-only by every
//! session, acting as both the word supplier and the definition provider.
//! [`DirectoryAudioProvider`] serves pronunciation clips generated ahead of
//! time.

pub mod audio;
pub mod corpus;
pub mod error;

pub use audio::DirectoryAudioProvider;
pub use corpus::Corpus;
pub use error::CorpusError;
