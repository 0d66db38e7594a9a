use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::{crossword::CrosswordResult, word::Position};

/// Points for every placed word
pub const PLACEMENT_POINTS: f64 = 100.0;
/// Scale of the density term, a fully packed bounding box earns this much
pub const DENSITY_POINTS: f64 = 50.0;

/// The smallest rectangle holding every placed letter
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct BoundingBox
{
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl BoundingBox
{
    pub fn area(&self) -> usize
    {
        (self.bottom - self.top + 1) * (self.right - self.left + 1)
    }
}

/// Summary numbers of a [result](CrosswordResult)
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ResultStats
{
    pub placed: usize,
    pub requested: usize,
    /// Cells shared by two placements
    pub crossings: usize,
    /// Filled cells divided by the bounding box area
    pub density: f64,
    pub bounding_box: Option<BoundingBox>,
}

impl ResultStats
{
    pub fn of(result: &CrosswordResult) -> ResultStats
    {
        let mut coverage: BTreeMap<Position, usize> = BTreeMap::new();
        for cell in result.placements().iter().flat_map(|p| p.cells())
        {
            *coverage.entry(cell).or_default() += 1;
        }

        let bounding_box = coverage.keys().fold(None, |bbox: Option<BoundingBox>, pos| Some(match bbox
        {
            None => BoundingBox { top: pos.row, left: pos.col, bottom: pos.row, right: pos.col },
            Some(b) => BoundingBox
            {
                top: b.top.min(pos.row),
                left: b.left.min(pos.col),
                bottom: b.bottom.max(pos.row),
                right: b.right.max(pos.col),
            },
        }));

        let density = bounding_box.map_or(0.0, |b| coverage.len() as f64 / b.area() as f64);

        ResultStats
        {
            placed: result.placed_count(),
            requested: result.requested_count(),
            crossings: coverage.values().filter(|count| **count > 1).count(),
            density,
            bounding_box,
        }
    }
}

/// Rates a [result](CrosswordResult): `100 * placed words + 50 * density`
///
/// More placed words always win, the density term (at most 50) only orders results with the same word count.
///
/// ```
/// # use crossword_layout::crossword::CrosswordResult;
/// # use crossword_layout::score::score;
/// # use crossword_layout::word::{Direction, Position, WordEntry};
/// let mut result = CrosswordResult::new(5);
/// result.place_word(&WordEntry::new("CAT", "Pet"), Position::new(0, 0), Direction::Across);
/// assert_eq!(score(&result), 150.0);
/// ```
pub fn score(result: &CrosswordResult) -> f64
{
    let stats = ResultStats::of(result);
    PLACEMENT_POINTS * result.placements().len() as f64 + DENSITY_POINTS * stats.density
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::word::{Direction, WordEntry};

    fn cat_result() -> CrosswordResult
    {
        let mut result = CrosswordResult::new(9);
        result.place_word(&WordEntry::new("CAT", "Pet"), Position::new(4, 3), Direction::Across);
        result
    }

    #[test]
    fn test_score_more_words_win() {
        let one = cat_result();
        let mut two = cat_result();
        two.place_word(&WordEntry::new("TIGER", "Big cat"), Position::new(4, 5), Direction::Down);

        assert!(score(&two) > score(&one));
    }

    #[test]
    fn test_score_prefers_compact() {
        // C A T        C A T
        //   C              I
        //   T              G
        //                  E
        //                  R
        let mut compact = cat_result();
        compact.place_word(&WordEntry::new("ACT", "Perform"), Position::new(4, 4), Direction::Down);
        let mut sparse = cat_result();
        sparse.place_word(&WordEntry::new("TIGER", "Big cat"), Position::new(4, 5), Direction::Down);

        assert!(score(&compact) > score(&sparse));
    }

    #[test]
    fn test_stats() {
        let mut result = cat_result();
        result.place_word(&WordEntry::new("TIGER", "Big cat"), Position::new(4, 5), Direction::Down);
        let stats = ResultStats::of(&result);

        assert_eq!(stats.placed, 2);
        assert_eq!(stats.crossings, 1);
        assert_eq!(stats.bounding_box, Some(BoundingBox { top: 4, left: 3, bottom: 8, right: 5 }));
        assert!((stats.density - 7.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_stats_empty() {
        let stats = ResultStats::of(&CrosswordResult::new(5));

        assert_eq!(stats.bounding_box, None);
        assert_eq!(stats.density, 0.0);
        assert_eq!(score(&CrosswordResult::new(5)), 0.0);
    }
}
