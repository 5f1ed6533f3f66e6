use thiserror::Error;

use crate::constants::DEFAULT_PUZZLE;
use crate::db::models::day::{DayKey, DayKeyErr};

pub mod calendar;

pub use calendar::{PuzzleCalendar, StaticCalendar};

pub type PuzzleResult<T> = core::result::Result<T, PuzzleErr>;

#[derive(Debug, Error)]
pub enum PuzzleErr {
    #[error("no puzzle published for {0}")]
    NoPuzzle(DayKey),

    #[error("a word chain needs at least two words, got {0}")]
    TooShort(usize),

    #[error("word {0} of the chain is empty")]
    EmptyWord(usize),

    #[error("bad calendar day: {0}")]
    BadDay(#[from] DayKeyErr),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A word chain. The first and last words are shown to the player; everything between them is
/// guessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    words: Vec<String>,
}

impl Puzzle {
    pub fn new<I, W>(words: I) -> PuzzleResult<Self>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .collect();

        if words.len() < 2 {
            return Err(PuzzleErr::TooShort(words.len()));
        }

        if let Some(idx) = words.iter().position(|w| w.is_empty()) {
            return Err(PuzzleErr::EmptyWord(idx));
        }

        Ok(Self { words })
    }

    pub fn default_chain() -> Self {
        Self {
            words: DEFAULT_PUZZLE.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn first(&self) -> &str {
        &self.words[0]
    }

    pub fn last(&self) -> &str {
        &self.words[self.words.len() - 1]
    }

    /// The words between the given endpoints.
    pub fn targets(&self) -> &[String] {
        &self.words[1..self.words.len() - 1]
    }

    /// Opening letter of each target, used to seed the guess inputs.
    pub fn hints(&self) -> Vec<String> {
        self.targets()
            .iter()
            .map(|w| w.chars().next().map(String::from).unwrap_or_default())
            .collect()
    }

    /// Whether `guess` matches target `index` (0-based over [`Puzzle::targets`]).
    pub fn check_guess(&self, index: usize, guess: &str) -> bool {
        self.targets()
            .get(index)
            .is_some_and(|target| target.eq_ignore_ascii_case(guess.trim()))
    }

    pub fn is_solved<S: AsRef<str>>(&self, guesses: &[S]) -> bool {
        guesses.len() == self.targets().len()
            && guesses
                .iter()
                .enumerate()
                .all(|(idx, guess)| self.check_guess(idx, guess.as_ref()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_chain_shape() {
        let puzzle = Puzzle::new(["sun", "flower", "pot", "luck"]).unwrap();

        assert_eq!(puzzle.first(), "sun");
        assert_eq!(puzzle.last(), "luck");
        assert_eq!(puzzle.targets(), &["flower".to_string(), "pot".to_string()]);
        assert_eq!(puzzle.hints(), vec!["f".to_string(), "p".to_string()]);
    }

    #[test]
    fn test_guessing() {
        let puzzle = Puzzle::new(["sun", "flower", "pot", "luck"]).unwrap();

        assert!(puzzle.check_guess(0, "flower"));
        assert!(puzzle.check_guess(0, " Flower "));
        assert!(!puzzle.check_guess(0, "pot"));
        assert!(!puzzle.check_guess(5, "pot"));

        assert!(puzzle.is_solved(&["flower", "POT"]));
        assert!(!puzzle.is_solved(&["flower"]));
        assert!(!puzzle.is_solved(&["flower", "pan"]));
    }

    #[test]
    fn test_rejects_degenerate_chains() {
        assert!(matches!(Puzzle::new(["only"]), Err(PuzzleErr::TooShort(1))));
        assert!(matches!(Puzzle::new(["a", " ", "b"]), Err(PuzzleErr::EmptyWord(1))));

        let pair = Puzzle::new(["fire", "place"]).unwrap();
        assert!(pair.targets().is_empty());
        assert!(pair.is_solved::<&str>(&[]));
    }

    #[test]
    fn test_default_chain_is_valid() {
        let puzzle = Puzzle::default_chain();
        assert!(Puzzle::new(puzzle.words()).is_ok());
        assert!(!puzzle.targets().is_empty());
    }
}
