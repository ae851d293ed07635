//! Outcome of a single guess.

use serde::Serialize;

/// What the player learns after submitting a guess.
///
/// `target_word` is present in three cases only: after a correct guess it
/// names the next word (or the completed one when the list is exhausted),
/// and after the losing guess it reveals the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuessResult {
    /// Whether the guess matched the target word.
    pub correct: bool,
    /// Score after the guess.
    pub score: u32,
    /// Lives after the guess.
    pub lives: u32,
    /// `lives` again, under the key the bundled front-end reads.
    lifes: u32,
    /// Word disclosed by this guess, if any.
    pub target_word: Option<String>,
    /// Whether the game reached a terminal state with this guess.
    pub end_game: bool,
}

impl GuessResult {
    pub(crate) fn advanced(score: u32, lives: u32, next_word: String) -> Self {
        Self {
            correct: true,
            score,
            lives,
            lifes: lives,
            target_word: Some(next_word),
            end_game: false,
        }
    }

    pub(crate) fn completed(score: u32, lives: u32, last_word: String) -> Self {
        Self {
            correct: true,
            score,
            lives,
            lifes: lives,
            target_word: Some(last_word),
            end_game: true,
        }
    }

    pub(crate) fn missed(score: u32, lives: u32) -> Self {
        Self {
            correct: false,
            score,
            lives,
            lifes: lives,
            target_word: None,
            end_game: false,
        }
    }

    pub(crate) fn failed(score: u32, lives: u32, answer: String) -> Self {
        Self {
            correct: false,
            score,
            lives,
            lifes: lives,
            target_word: Some(answer),
            end_game: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missed_guess_serializes_null_target_word() {
        let json = serde_json::to_value(GuessResult::missed(4, 2)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "correct": false,
                "score": 4,
                "lives": 2,
                "lifes": 2,
                "target_word": null,
                "end_game": false,
            })
        );
    }

    #[test]
    fn test_failed_guess_reveals_answer() {
        let result = GuessResult::failed(1, 0, "quixotic".to_owned());

        assert!(result.end_game);
        assert_eq!(result.target_word.as_deref(), Some("quixotic"));
    }
}
