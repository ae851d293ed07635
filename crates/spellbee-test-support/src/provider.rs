//! In-memory word, definition and audio sources.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use spellbee_core::error::DomainError;
use spellbee_core::provider::{AudioProvider, DefinitionProvider, WordSupplier};
use spellbee_core::rng::DeterministicRng;

/// A word supplier that hands out a fixed list in the given order, ignoring
/// the RNG. Lets tests pin the "random" draw.
#[derive(Debug, Clone)]
pub struct StaticWordSupplier {
    words: Vec<String>,
}

impl StaticWordSupplier {
    /// Creates a supplier over `words`.
    #[must_use]
    pub fn new(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|w| (*w).to_owned()).collect(),
        }
    }
}

impl WordSupplier for StaticWordSupplier {
    fn sample(
        &self,
        count: usize,
        _rng: &mut dyn DeterministicRng,
    ) -> Result<Vec<String>, DomainError> {
        if self.words.is_empty() {
            return Err(DomainError::EmptyVocabulary);
        }
        Ok(self.words.iter().take(count).cloned().collect())
    }
}

/// A definition provider backed by a map. Unknown words have no
/// definitions. Counts lookups so tests can assert caching.
#[derive(Debug, Default)]
pub struct StaticDefinitionProvider {
    definitions: HashMap<String, Vec<String>>,
    lookups: AtomicUsize,
}

impl StaticDefinitionProvider {
    /// Creates a provider that knows no words.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds definitions for `word`.
    #[must_use]
    pub fn with(mut self, word: &str, definitions: &[&str]) -> Self {
        self.definitions.insert(
            word.to_owned(),
            definitions.iter().map(|d| (*d).to_owned()).collect(),
        );
        self
    }

    /// Number of `lookup` calls made so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DefinitionProvider for StaticDefinitionProvider {
    async fn lookup(&self, word: &str) -> Result<Vec<String>, DomainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.definitions.get(word).cloned().unwrap_or_default())
    }
}

/// A definition provider that always fails.
#[derive(Debug)]
pub struct FailingDefinitionProvider;

#[async_trait]
impl DefinitionProvider for FailingDefinitionProvider {
    async fn lookup(&self, word: &str) -> Result<Vec<String>, DomainError> {
        Err(DomainError::DefinitionUnavailable(word.to_owned()))
    }
}

/// A definition provider whose first `failures` lookups fail with an
/// infrastructure error; later lookups are answered by `inner`.
#[derive(Debug)]
pub struct FlakyDefinitionProvider {
    inner: StaticDefinitionProvider,
    failures_left: AtomicUsize,
}

impl FlakyDefinitionProvider {
    /// Wraps `inner`, failing the next `failures` lookups.
    #[must_use]
    pub fn new(inner: StaticDefinitionProvider, failures: usize) -> Self {
        Self {
            inner,
            failures_left: AtomicUsize::new(failures),
        }
    }
}

#[async_trait]
impl DefinitionProvider for FlakyDefinitionProvider {
    async fn lookup(&self, word: &str) -> Result<Vec<String>, DomainError> {
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(DomainError::Infrastructure("connection reset".to_owned()));
        }
        self.inner.lookup(word).await
    }
}

/// An audio provider backed by a map of word to clip bytes.
#[derive(Debug, Default)]
pub struct StaticAudioProvider {
    clips: HashMap<String, Vec<u8>>,
}

impl StaticAudioProvider {
    /// Creates a provider with no clips.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the clip for `word`.
    #[must_use]
    pub fn with(mut self, word: &str, bytes: Vec<u8>) -> Self {
        self.clips.insert(word.to_owned(), bytes);
        self
    }
}

#[async_trait]
impl AudioProvider for StaticAudioProvider {
    async fn fetch(&self, word: &str) -> Result<Vec<u8>, DomainError> {
        self.clips
            .get(word)
            .cloned()
            .ok_or_else(|| DomainError::AudioUnavailable {
                word: word.to_owned(),
                reason: "no clip recorded".to_owned(),
            })
    }
}

/// An audio provider that always fails.
#[derive(Debug)]
pub struct FailingAudioProvider;

#[async_trait]
impl AudioProvider for FailingAudioProvider {
    async fn fetch(&self, word: &str) -> Result<Vec<u8>, DomainError> {
        Err(DomainError::AudioUnavailable {
            word: word.to_owned(),
            reason: "synthesis backend unreachable".to_owned(),
        })
    }
}
