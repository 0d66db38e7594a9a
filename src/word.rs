use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};
use crate::crossword::CrosswordError;

/// Represents a cell of the [grid](crate::crossword::Grid), the first character of a [placement](crate::placed_word::Placement) lives here
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Default, Debug, Serialize, Deserialize)]
pub struct Position
{
    pub row: usize,
    pub col: usize,
}

impl Position
{
    pub fn new(row: usize, col: usize) -> Position
    {
        Position { row, col }
    }

    /// Returns the position `steps` cells further along `dir`
    pub fn step(&self, dir: Direction, steps: usize) -> Position
    {
        match dir
        {
            Direction::Across => Position { row: self.row, col: self.col + steps },
            Direction::Down => Position { row: self.row + steps, col: self.col },
        }
    }
}

/// Represents the direction of a [placement](crate::placed_word::Placement) on the [grid](crate::crossword::Grid)
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction
{
    #[default]
    Across,
    Down,
}

impl Direction
{
    pub fn opposite(&self) -> Direction
    {
        match *self
        {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
        }
    }

    /// Row and column deltas of one step along the direction
    pub(crate) fn delta(&self) -> (i64, i64)
    {
        match *self
        {
            Direction::Across => (0, 1),
            Direction::Down => (1, 0),
        }
    }
}

/// Represents a word/clue pair outside of a [grid](crate::crossword::Grid), it has no position until a generator places it
///
/// Entries are compared by value, a list handed to a [driver](crate::search::SearchDriver) can't contain the same word twice.
#[derive(Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Default, Debug, Serialize, Deserialize)]
pub struct WordEntry
{
    pub word: String,
    pub clue: String,
}

impl WordEntry
{
    pub fn new(word: impl Into<String>, clue: impl Into<String>) -> WordEntry
    {
        WordEntry { word: word.into(), clue: clue.into() }
    }

    pub fn len(&self) -> usize
    {
        self.word.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.word.is_empty()
    }

    fn normalized(&self) -> WordEntry
    {
        WordEntry { word: self.word.trim().to_uppercase(), clue: self.clue.trim().to_owned() }
    }
}

/// Normalizes the entries (trimmed, upper case words) and checks that they can be handed to a generator
///
/// # Errors
///
/// [CrosswordError::TooFewWords] - less than two entries
/// [CrosswordError::EmptyWord] - an entry has no letters
/// [CrosswordError::InvalidCharacters] - a word has something other than the letters A to Z
/// [CrosswordError::DuplicateWord] - two entries have the same word (after normalization)
/// [CrosswordError::WordTooLong] - a word doesn't fit into a grid of `max_len` cells
/// [CrosswordError::EmptyClue] - an entry has a blank clue
///
/// ```
/// # use crossword_layout::word::{validate_words, WordEntry};
/// let words = validate_words(&[WordEntry::new(" cat", "Feline"), WordEntry::new("Dog", "Canine")], 15).unwrap();
/// assert_eq!(words[0].word, "CAT");
/// assert!(validate_words(&[WordEntry::new("cat", "Feline"), WordEntry::new("CAT", "Again")], 15).is_err());
/// ```
pub fn validate_words(entries: &[WordEntry], max_len: usize) -> Result<Vec<WordEntry>, CrosswordError>
{
    if entries.len() < 2 { return Err(CrosswordError::TooFewWords { count: entries.len() }); }

    let mut seen = BTreeSet::new();
    let mut words = Vec::with_capacity(entries.len());

    for entry in entries.iter().map(WordEntry::normalized)
    {
        if entry.is_empty() { return Err(CrosswordError::EmptyWord); }
        if !entry.word.bytes().all(|b| b.is_ascii_uppercase())
        {
            return Err(CrosswordError::InvalidCharacters { word: entry.word });
        }
        if entry.len() > max_len
        {
            return Err(CrosswordError::WordTooLong { len: entry.len(), max: max_len, word: entry.word });
        }
        if entry.clue.is_empty() { return Err(CrosswordError::EmptyClue { word: entry.word }); }
        if !seen.insert(entry.word.clone()) { return Err(CrosswordError::DuplicateWord { word: entry.word }); }

        words.push(entry);
    }

    Ok(words)
}
