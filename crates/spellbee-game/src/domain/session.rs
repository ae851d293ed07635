//! The game session aggregate.
//!
//! A `GameSession` is one player's round: an ordered list of target words,
//! the position of the active word, lives, score, and the per-word
//! definition cache with its cycling cursor. It is a plain owned value;
//! loading and saving it is the application layer's job.

use std::collections::BTreeMap;

use spellbee_core::error::DomainError;
use spellbee_core::provider::{AudioProvider, DefinitionProvider, WordSupplier};
use spellbee_core::rng::DeterministicRng;
use tracing::{debug, warn};

use super::guess::GuessResult;

/// Lives a player starts every game with.
pub const STARTING_LIVES: u32 = 3;

/// Number of target words drawn for a new game.
pub const DEFAULT_WORD_COUNT: usize = 1000;

/// Upper bound on definitions kept per word.
pub const MAX_DEFINITIONS: usize = 3;

/// Text shown when the dictionary has nothing for a word.
pub const DEFINITION_NOT_FOUND: &str = "Definition not found.";

/// Where a game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Lives remain and words remain.
    Active,
    /// Every target word was spelled correctly.
    Exhausted,
    /// Lives ran out.
    Failed,
}

impl GameStatus {
    /// Returns `true` for `Exhausted` and `Failed`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }

    /// Lowercase name used in views and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Exhausted => "exhausted",
            Self::Failed => "failed",
        }
    }
}

/// One player's in-progress game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    /// Target words, shortest first.
    pub(crate) target_words: Vec<String>,
    /// Position of the active word; equals `target_words.len()` once exhausted.
    pub(crate) current_index: usize,
    /// Cached `target_words[current_index]`, or the last word once exhausted.
    pub(crate) target_word: String,
    pub(crate) lives: u32,
    pub(crate) score: u32,
    /// Definitions fetched so far, keyed by word. Never invalidated.
    pub(crate) definitions_cache: BTreeMap<String, Vec<String>>,
    /// Index of the displayed definition per word.
    pub(crate) definition_cursor: BTreeMap<String, usize>,
}

impl GameSession {
    /// Starts a new game with `word_count` words drawn from `supplier`.
    ///
    /// The supplier's draw is sorted by ascending length so the game ramps
    /// from short words to long ones. The sort is stable: words of equal
    /// length keep the supplier's random order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyVocabulary` if the supplier yields no
    /// words, and propagates any other supplier failure.
    pub fn initialize(
        supplier: &dyn WordSupplier,
        rng: &mut dyn DeterministicRng,
        word_count: usize,
    ) -> Result<Self, DomainError> {
        let mut target_words = supplier.sample(word_count, rng)?;
        if target_words.is_empty() {
            return Err(DomainError::EmptyVocabulary);
        }
        target_words.sort_by_key(|word| word.chars().count());

        let target_word = target_words[0].clone();
        debug!(words = target_words.len(), "initialized game session");

        Ok(Self {
            target_words,
            current_index: 0,
            target_word,
            lives: STARTING_LIVES,
            score: 0,
            definitions_cache: BTreeMap::new(),
            definition_cursor: BTreeMap::new(),
        })
    }

    /// Replaces the whole game with a fresh draw. On error the current
    /// state is left untouched.
    ///
    /// # Errors
    ///
    /// Same as [`GameSession::initialize`].
    pub fn reset(
        &mut self,
        supplier: &dyn WordSupplier,
        rng: &mut dyn DeterministicRng,
        word_count: usize,
    ) -> Result<(), DomainError> {
        *self = Self::initialize(supplier, rng, word_count)?;
        Ok(())
    }

    /// Current game status.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        if self.lives == 0 {
            GameStatus::Failed
        } else if self.current_index >= self.target_words.len() {
            GameStatus::Exhausted
        } else {
            GameStatus::Active
        }
    }

    /// The word being guessed, or the last word once the game has ended.
    #[must_use]
    pub fn target_word(&self) -> &str {
        &self.target_word
    }

    /// All target words in play order.
    #[must_use]
    pub fn target_words(&self) -> &[String] {
        &self.target_words
    }

    /// Position of the active word.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Definitions cached for `word`, if they have been fetched.
    #[must_use]
    pub fn cached_definitions(&self, word: &str) -> Option<&[String]> {
        self.definitions_cache.get(word).map(Vec::as_slice)
    }

    /// Cursor position for `word`; 0 if it has never been cycled.
    #[must_use]
    pub fn definition_cursor(&self, word: &str) -> usize {
        self.definition_cursor.get(word).copied().unwrap_or(0)
    }

    /// Makes sure the definitions for the target word are cached.
    ///
    /// Returns `true` if the provider was consulted (the session changed and
    /// should be saved). An empty answer or `DefinitionUnavailable` caches
    /// the sentinel definition.
    ///
    /// # Errors
    ///
    /// Propagates any other provider error; nothing is cached in that case.
    pub async fn load_definitions(
        &mut self,
        provider: &dyn DefinitionProvider,
    ) -> Result<bool, DomainError> {
        if self.definitions_cache.contains_key(&self.target_word) {
            return Ok(false);
        }

        let definitions = match provider.lookup(&self.target_word).await {
            Ok(mut defs) if !defs.is_empty() => {
                defs.truncate(MAX_DEFINITIONS);
                defs
            }
            Ok(_) => {
                debug!(word = %self.target_word, "no definition in corpus");
                vec![DEFINITION_NOT_FOUND.to_owned()]
            }
            Err(DomainError::DefinitionUnavailable(reason)) => {
                debug!(word = %self.target_word, %reason, "definition unavailable");
                vec![DEFINITION_NOT_FOUND.to_owned()]
            }
            Err(e) => {
                warn!(word = %self.target_word, error = %e, "definition lookup failed");
                return Err(e);
            }
        };

        self.definitions_cache
            .insert(self.target_word.clone(), definitions);
        self.definition_cursor.insert(self.target_word.clone(), 0);
        Ok(true)
    }

    /// The definition currently selected for the target word, fetching the
    /// definition list on first access.
    ///
    /// # Errors
    ///
    /// Same as [`GameSession::load_definitions`].
    pub async fn current_definition(
        &mut self,
        provider: &dyn DefinitionProvider,
    ) -> Result<String, DomainError> {
        self.load_definitions(provider).await?;
        Ok(self.selected_definition())
    }

    /// Advances to the next definition of the target word, wrapping after
    /// the last one, and returns it. A single definition is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`GameSession::load_definitions`]; the cursor is not moved.
    pub async fn cycle_definition(
        &mut self,
        provider: &dyn DefinitionProvider,
    ) -> Result<String, DomainError> {
        self.load_definitions(provider).await?;

        let count = self.cached_count();
        if count > 1 {
            let cursor = self.definition_cursor(&self.target_word);
            self.definition_cursor
                .insert(self.target_word.clone(), (cursor + 1) % count);
        }
        Ok(self.selected_definition())
    }

    /// Number of definitions for the target word; at least 1 once fetched.
    ///
    /// # Errors
    ///
    /// Same as [`GameSession::load_definitions`].
    pub async fn definition_count(
        &mut self,
        provider: &dyn DefinitionProvider,
    ) -> Result<usize, DomainError> {
        self.load_definitions(provider).await?;
        Ok(self.cached_count())
    }

    /// Pronunciation audio for the target word. Works in terminal states so
    /// the answer can be reviewed.
    ///
    /// # Errors
    ///
    /// Propagates `DomainError::AudioUnavailable` from the provider.
    pub async fn audio_bytes(&self, provider: &dyn AudioProvider) -> Result<Vec<u8>, DomainError> {
        provider.fetch(&self.target_word).await
    }

    /// Scores a guess against the target word, ignoring letter case only.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GameOver` if the game is already in a terminal
    /// state; the session is not modified.
    pub fn submit_guess(&mut self, guess: &str) -> Result<GuessResult, DomainError> {
        if self.status().is_terminal() {
            return Err(DomainError::GameOver);
        }

        if guess.to_lowercase() == self.target_word.to_lowercase() {
            self.score += 1;
            self.current_index += 1;

            if self.current_index >= self.target_words.len() {
                return Ok(GuessResult::completed(
                    self.score,
                    self.lives,
                    self.target_word.clone(),
                ));
            }

            self.target_word = self.target_words[self.current_index].clone();
            return Ok(GuessResult::advanced(
                self.score,
                self.lives,
                self.target_word.clone(),
            ));
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            Ok(GuessResult::failed(
                self.score,
                self.lives,
                self.target_word.clone(),
            ))
        } else {
            Ok(GuessResult::missed(self.score, self.lives))
        }
    }

    fn cached_count(&self) -> usize {
        self.definitions_cache
            .get(&self.target_word)
            .map_or(0, Vec::len)
    }

    fn selected_definition(&self) -> String {
        let cursor = self.definition_cursor(&self.target_word);
        self.definitions_cache
            .get(&self.target_word)
            .and_then(|defs| defs.get(cursor).or_else(|| defs.first()))
            .cloned()
            .unwrap_or_else(|| DEFINITION_NOT_FOUND.to_owned())
    }
}
