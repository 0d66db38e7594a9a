use itertools::Itertools;
use serde::{Deserialize, Serialize};
use crate::{crossword::Grid, word::{Direction, Position, WordEntry}};

/// Returns every pair of indices `(index_in_a, index_in_b)` where the two words have the same letter
///
/// Pairs are ordered by the index in `a`, then by the index in `b`.
///
/// ## Examples
/// ```
/// # use crossword_layout::placed_word::find_intersections;
/// assert_eq!(find_intersections("CAT", "ACT"), vec![(0, 1), (1, 0), (2, 2)]);
/// assert!(find_intersections("CAT", "DOG").is_empty());
/// ```
pub fn find_intersections(a: &str, b: &str) -> Vec<(usize, usize)>
{
    a.bytes().enumerate()
        .cartesian_product(b.bytes().enumerate())
        .filter_map(|((a_ind, a_char), (b_ind, b_char))| (a_char == b_char).then_some((a_ind, b_ind)))
        .collect()
}

/// A legal position for a word that crosses an already placed word
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Candidate
{
    pub position: Position,
    pub direction: Direction,
}

/// Represents a [word](WordEntry) fixed on the [grid](Grid), with the clue number it got when placed
#[derive(Clone, Eq, PartialEq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Placement
{
    pub word: String,
    pub clue: String,
    pub position: Position,
    pub direction: Direction,
    pub number: u32,
}

impl Placement
{
    pub fn new(entry: &WordEntry, position: Position, direction: Direction, number: u32) -> Placement
    {
        Placement { word: entry.word.clone(), clue: entry.clue.clone(), position, direction, number }
    }

    pub fn len(&self) -> usize
    {
        self.word.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.word.is_empty()
    }

    /// Returns the cells covered by the placement, in reading order
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_
    {
        (0..self.len()).map(|ind| self.position.step(self.direction, ind))
    }

    /// Returns all legal ways to add `word` on the `grid` crossing this placement
    ///
    /// The new word always goes in the opposite direction and passes through a shared letter.
    /// Positions that leave the grid or break the [legality rules](Grid::can_place_word) are dropped.
    ///
    /// ## Examples
    /// ```
    /// # use crossword_layout::crossword::CrosswordResult;
    /// # use crossword_layout::placed_word::Candidate;
    /// # use crossword_layout::word::{Direction, Position, WordEntry};
    /// let mut result = CrosswordResult::new(9);
    /// result.place_word(&WordEntry::new("CAT", "Pet"), Position::new(4, 3), Direction::Across);
    ///
    /// //  . . . . . . . . .
    /// //  . . . . . . . . .
    /// //  . . . . . . . . .
    /// //  . . . . . . . . .
    /// //  . . . C A T . . .
    /// //  . . . . . I . . .
    /// //  . . . . . G . . .
    /// //  . . . . . E . . .
    /// //  . . . . . R . . .
    ///
    /// let cat = &result.placements()[0];
    /// assert_eq!(cat.calculate_intersection_placements(result.grid(), "TIGER"), vec![
    ///     Candidate { position: Position::new(4, 5), direction: Direction::Down }
    /// ]);
    /// ```
    pub fn calculate_intersection_placements(&self, grid: &Grid, word: &str) -> Vec<Candidate>
    {
        let direction = self.direction.opposite();
        let len = word.len();

        find_intersections(word, &self.word)
            .into_iter()
            .filter_map(|(word_ind, self_ind)|
            {
                let cross = self.position.step(self.direction, self_ind);
                let position = match direction
                {
                    Direction::Across => Position { row: cross.row, col: cross.col.checked_sub(word_ind)? },
                    Direction::Down => Position { row: cross.row.checked_sub(word_ind)?, col: cross.col },
                };
                let end = position.step(direction, len - 1);
                (end.row < grid.size() && end.col < grid.size()).then_some(Candidate { position, direction })
            })
            .filter(|c| grid.can_place_word(word, c.position, c.direction))
            .collect()
    }
}
