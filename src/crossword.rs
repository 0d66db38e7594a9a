use std::{collections::{BTreeMap, BTreeSet}, fmt};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use crate::{placed_word::Placement, word::{Direction, Position, WordEntry}};

/// Error type for possible errors when preparing a crossword generation
#[derive(Error, Debug)]
pub enum CrosswordError
{
    #[error("At least two words are needed to build a crossword, got {count}.")]
    TooFewWords { count: usize },
    #[error("A word can't be empty.")]
    EmptyWord,
    #[error("The word \"{word}\" has characters other than A-Z.")]
    InvalidCharacters { word: String },
    #[error("The word \"{word}\" is given more than once.")]
    DuplicateWord { word: String },
    #[error("The word \"{word}\" has {len} letters, the grid only fits {max}.")]
    WordTooLong { word: String, len: usize, max: usize },
    #[error("The word \"{word}\" has no clue.")]
    EmptyClue { word: String },
    #[error("Invalid grid size bounds: min {min}, max {max}.")]
    InvalidGridSize { min: usize, max: usize },
    #[error("Invalid generation settings: {reason}.")]
    InvalidGeneration { reason: String },
    #[error("Line {line} of the word list is not in WORD;clue form: \"{content}\".")]
    MalformedPresetLine { line: usize, content: String },
    #[error("A grid of size {size} needs {expected} cells, got {cells}.")]
    InvalidGrid { size: usize, expected: usize, cells: usize },
    #[error("Can't read the configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// # Represents the square letter grid of a crossword
///
/// Every cell is either empty or holds a single upper case letter.
/// Positions outside of the grid are treated as empty cells by the lookups.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "GridCells")]
pub struct Grid
{
    size: usize,
    cells: Vec<Option<char>>,
}

#[derive(Deserialize)]
struct GridCells
{
    size: usize,
    cells: Vec<Option<char>>,
}

impl TryFrom<GridCells> for Grid
{
    type Error = CrosswordError;

    fn try_from(value: GridCells) -> Result<Self, Self::Error>
    {
        let expected = value.size * value.size;
        if value.cells.len() != expected
        {
            return Err(CrosswordError::InvalidGrid { size: value.size, expected, cells: value.cells.len() });
        }
        Ok(Grid { size: value.size, cells: value.cells })
    }
}

impl Grid
{
    /// Creates an empty grid with `size` rows and `size` columns
    pub fn new(size: usize) -> Grid
    {
        Grid { size, cells: vec![None; size * size] }
    }

    pub fn size(&self) -> usize
    {
        self.size
    }

    /// Returns the letter at the position, None for empty cells and positions outside of the grid
    pub fn get(&self, pos: Position) -> Option<char>
    {
        if pos.row >= self.size || pos.col >= self.size { return None; }
        self.cells.get(pos.row * self.size + pos.col).copied().flatten()
    }

    fn get_signed(&self, row: i64, col: i64) -> Option<char>
    {
        if row < 0 || col < 0 { return None; }
        self.get(Position::new(row as usize, col as usize))
    }

    fn set(&mut self, pos: Position, letter: char)
    {
        let size = self.size;
        if let Some(cell) = self.cells.get_mut(pos.row * size + pos.col)
        {
            *cell = Some(letter);
        }
    }

    /// Empties every cell
    pub fn clear(&mut self)
    {
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }

    pub fn filled_count(&self) -> usize
    {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Checks if `word` can be written on the grid starting at `start` in direction `dir`
    ///
    /// The word is allowed if:
    /// - it fits into the grid,
    /// - every occupied cell it covers already has the same letter (a crossing),
    /// - every empty cell it covers has empty neighbours on both sides across the word's direction,
    /// - the cells right before its first and right after its last letter are empty (or outside of the grid).
    ///
    /// # Example
    ///
    /// ```
    /// # use crossword_layout::crossword::CrosswordResult;
    /// # use crossword_layout::word::{Direction, Position, WordEntry};
    /// let mut result = CrosswordResult::new(9);
    /// result.place_word(&WordEntry::new("CAT", "Pet"), Position::new(4, 3), Direction::Across);
    ///
    /// //   0 1 2 3 4 5 6 7 8
    /// // 4 . . . C A T . . .
    /// // 5 . . . D O G . . .   <- DOG would run along CAT
    ///
    /// assert!(result.grid().can_place_word("TIGER", Position::new(4, 5), Direction::Down));
    /// assert!(!result.grid().can_place_word("DOG", Position::new(5, 3), Direction::Across));
    /// ```
    ///
    /// Diagonal touches are allowed, only shared edges of non-crossing letters are not.
    pub fn can_place_word(&self, word: &str, start: Position, dir: Direction) -> bool
    {
        let len = word.chars().count();
        if len == 0 { return false; }

        let end = start.step(dir, len - 1);
        if end.row >= self.size || end.col >= self.size { return false; }

        let (dr, dc) = dir.delta();
        let (pr, pc) = dir.opposite().delta();
        let (row, col) = (start.row as i64, start.col as i64);

        for (ind, letter) in word.chars().enumerate()
        {
            let (r, c) = (row + dr * ind as i64, col + dc * ind as i64);
            match self.get_signed(r, c)
            {
                Some(existing) if existing != letter => return false,
                Some(_) => {}
                None =>
                {
                    if self.get_signed(r + pr, c + pc).is_some() || self.get_signed(r - pr, c - pc).is_some()
                    {
                        return false;
                    }
                }
            }
        }

        let len = len as i64;
        self.get_signed(row - dr, col - dc).is_none() && self.get_signed(row + dr * len, col + dc * len).is_none()
    }

    /// Reads `len` letters starting from `start` in direction `dir`, None if any of the cells is empty
    pub fn read_word(&self, start: Position, dir: Direction, len: usize) -> Option<String>
    {
        (0..len).map(|ind| self.get(start.step(dir, ind))).collect()
    }

    /// Returns a matrix of the cells, row by row
    pub fn rows(&self) -> Vec<Vec<Option<char>>>
    {
        if self.size == 0 { return vec![]; }
        self.cells.chunks(self.size).map(|row| row.to_vec()).collect()
    }
}

impl fmt::Display for Grid
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        for row in self.rows()
        {
            let line: Vec<String> = row.iter().map(|cell| cell.unwrap_or('.').to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// # Represents the output of one generation attempt
///
/// Holds the [grid](Grid), the [placements](Placement) in the order they were made, and the clue numbering.
/// Numbers are given in placement order starting from 1, and the start cell of every placement is mapped to its number
/// (when two placements start in the same cell the cell keeps the first number).
///
/// The same result can be reused for several attempts, [CrosswordResult::reset] brings it back to the empty state.
///
/// # Example
///
/// ```
/// # use crossword_layout::crossword::CrosswordResult;
/// # use crossword_layout::word::{Direction, Position, WordEntry};
/// let mut result = CrosswordResult::new(7);
/// result.place_word(&WordEntry::new("HELLO", "Greeting"), Position::new(1, 0), Direction::Across);
/// result.place_word(&WordEntry::new("WORLD", "Earth"), Position::new(0, 4), Direction::Down);
///
/// // . . . . W . .
/// // H E L L O . .
/// // . . . . R . .
/// // . . . . L . .
/// // . . . . D . .
///
/// assert_eq!(result.number_at(Position::new(0, 4)), Some(2));
/// assert_eq!(result.grid().read_word(Position::new(0, 4), Direction::Down, 5).as_deref(), Some("WORLD"));
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct CrosswordResult
{
    grid: Grid,
    placements: Vec<Placement>,
    placed_words: BTreeSet<String>,
    next_number: u32,
    #[serde(with = "number_map")]
    word_numbers: BTreeMap<Position, u32>,
    requested: usize,
}

/// Keeps the start cell numbers as a list of `[position, number]` pairs, JSON maps only have string keys
mod number_map
{
    use super::*;

    pub fn serialize<S: Serializer>(map: &BTreeMap<Position, u32>, serializer: S) -> Result<S::Ok, S::Error>
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeMap<Position, u32>, D::Error>
    {
        Ok(Vec::<(Position, u32)>::deserialize(deserializer)?.into_iter().collect())
    }
}

impl CrosswordResult
{
    /// Creates a new empty result on a `size` x `size` grid
    pub fn new(size: usize) -> CrosswordResult
    {
        CrosswordResult
        {
            grid: Grid::new(size),
            placements: vec![],
            placed_words: BTreeSet::new(),
            next_number: 1,
            word_numbers: BTreeMap::new(),
            requested: 0,
        }
    }

    /// Clears the grid and forgets every placement, keeps the grid size
    pub fn reset(&mut self)
    {
        self.grid.clear();
        self.placements.clear();
        self.placed_words.clear();
        self.word_numbers.clear();
        self.next_number = 1;
        self.requested = 0;
    }

    pub fn grid(&self) -> &Grid
    {
        &self.grid
    }

    pub fn placements(&self) -> &[Placement]
    {
        &self.placements
    }

    pub fn placed_words(&self) -> &BTreeSet<String>
    {
        &self.placed_words
    }

    pub fn next_number(&self) -> u32
    {
        self.next_number
    }

    pub fn is_placed(&self, word: &str) -> bool
    {
        self.placed_words.contains(word)
    }

    /// Writes the [word](WordEntry) on the grid and records its [placement](Placement) with the next clue number
    ///
    /// The placement is not checked, call [Grid::can_place_word] first.
    pub fn place_word(&mut self, entry: &WordEntry, position: Position, direction: Direction) -> &Placement
    {
        for (ind, letter) in entry.word.chars().enumerate()
        {
            self.grid.set(position.step(direction, ind), letter);
        }

        let number = self.next_number;
        self.next_number += 1;
        self.word_numbers.entry(position).or_insert(number);
        self.placed_words.insert(entry.word.clone());
        self.placements.push(Placement::new(entry, position, direction, number));

        &self.placements[self.placements.len() - 1]
    }

    /// Returns the clue number of the placement starting at the position
    pub fn number_at(&self, pos: Position) -> Option<u32>
    {
        self.word_numbers.get(&pos).copied()
    }

    /// Reads the letters of the placement back from the grid
    pub fn read_word(&self, placement: &Placement) -> Option<String>
    {
        self.grid.read_word(placement.position, placement.direction, placement.len())
    }

    pub fn placed_count(&self) -> usize
    {
        self.placed_words.len()
    }

    pub fn requested_count(&self) -> usize
    {
        self.requested
    }

    pub(crate) fn set_requested(&mut self, requested: usize)
    {
        self.requested = requested;
    }

    /// True if every requested word is placed
    pub fn is_complete(&self) -> bool
    {
        self.requested > 0 && self.placed_count() >= self.requested
    }

    /// Returns the across clues in number order
    pub fn across(&self) -> impl Iterator<Item = &Placement>
    {
        self.placements.iter().filter(|p| p.direction == Direction::Across)
    }

    /// Returns the down clues in number order
    pub fn down(&self) -> impl Iterator<Item = &Placement>
    {
        self.placements.iter().filter(|p| p.direction == Direction::Down)
    }
}
