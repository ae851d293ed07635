//! In-memory vocabulary and dictionary.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use spellbee_core::error::DomainError;
use spellbee_core::provider::{DefinitionProvider, WordSupplier};
use spellbee_core::rng::DeterministicRng;
use tracing::info;

use crate::error::CorpusError;

/// A dictionary entry as stored on disk: one definition or several.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DefinitionEntry {
    One(String),
    Many(Vec<String>),
}

impl From<DefinitionEntry> for Vec<String> {
    fn from(entry: DefinitionEntry) -> Self {
        match entry {
            DefinitionEntry::One(text) => vec![text],
            DefinitionEntry::Many(list) => list,
        }
    }
}

/// The read-only word list and definitions shared by all sessions.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    words: Vec<String>,
    definitions: HashMap<String, Vec<String>>,
}

impl Corpus {
    /// Builds a corpus from already-loaded data. Repeated words keep only
    /// their first occurrence, so a game never draws the same word twice.
    #[must_use]
    pub fn new(mut words: Vec<String>, definitions: HashMap<String, Vec<String>>) -> Self {
        let mut seen = HashSet::with_capacity(words.len());
        words.retain(|word| seen.insert(word.clone()));
        Self { words, definitions }
    }

    /// Loads the vocabulary (a JSON array of strings) and the definitions (a
    /// JSON object mapping each word to a string or an array of strings).
    ///
    /// # Errors
    ///
    /// Returns `CorpusError` if either file is unreadable or malformed.
    pub fn load(words_path: &Path, definitions_path: &Path) -> Result<Self, CorpusError> {
        let words: Vec<String> = read_json(words_path)?;
        let raw: HashMap<String, DefinitionEntry> = read_json(definitions_path)?;
        let definitions: HashMap<String, Vec<String>> =
            raw.into_iter().map(|(w, e)| (w, e.into())).collect();

        info!(
            words = words.len(),
            defined = definitions.len(),
            "corpus loaded"
        );
        Ok(Self::new(words, definitions))
    }

    /// Number of words in the vocabulary.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the vocabulary is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Definitions stored for `word`, if any.
    #[must_use]
    pub fn definitions_of(&self, word: &str) -> Option<&[String]> {
        self.definitions.get(word).map(Vec::as_slice)
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, CorpusError> {
    let bytes = std::fs::read(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| CorpusError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl WordSupplier for Corpus {
    /// Partial Fisher-Yates shuffle over word indices: the first `count`
    /// positions end up holding a uniform sample without replacement.
    fn sample(
        &self,
        count: usize,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Vec<String>, DomainError> {
        if self.words.is_empty() {
            return Err(DomainError::EmptyVocabulary);
        }
        let total = u32::try_from(self.words.len()).map_err(|_| {
            DomainError::Infrastructure(format!("vocabulary too large: {}", self.words.len()))
        })?;
        let take = count.min(self.words.len());

        let mut indices: Vec<u32> = (0..total).collect();
        for i in 0..take {
            #[allow(clippy::cast_possible_truncation)]
            let j = rng.next_u32_range(i as u32, total - 1) as usize;
            indices.swap(i, j);
        }

        Ok(indices[..take]
            .iter()
            .map(|&i| self.words[i as usize].clone())
            .collect())
    }
}

#[async_trait]
impl DefinitionProvider for Corpus {
    async fn lookup(&self, word: &str) -> Result<Vec<String>, DomainError> {
        Ok(self.definitions.get(word).cloned().unwrap_or_default())
    }
}
