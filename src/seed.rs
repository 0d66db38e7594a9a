use itertools::Itertools;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use crate::{config::GenerationMode, word::{Direction, Position, WordEntry}};

/// How many seeds a random mode search prepares
pub const RANDOM_SEED_COUNT: usize = 1000;
/// How many shuffled word orders a max overlap search tries after the sorted ones
pub const SHUFFLED_ORDER_COUNT: u64 = 4;
/// Distance of the shifted start positions from the grid center
pub const START_OFFSET: i64 = 2;

/// A way to order the words before an attempt, the first word of the order is the one placed without crossing
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum WordOrder
{
    LongestFirst,
    ShortestFirst,
    Alphabetical,
    ReverseAlphabetical,
    /// Deterministic shuffle keyed by the number
    Shuffled(u64),
}

impl WordOrder
{
    /// Returns the words in this order, sorting is stable so equal keys keep the input order
    pub fn apply(&self, words: &[WordEntry]) -> Vec<WordEntry>
    {
        let mut ordered = words.to_vec();
        match *self
        {
            WordOrder::LongestFirst => ordered.sort_by(|a, b| b.len().cmp(&a.len())),
            WordOrder::ShortestFirst => ordered.sort_by_key(WordEntry::len),
            WordOrder::Alphabetical => ordered.sort_by(|a, b| a.word.cmp(&b.word)),
            WordOrder::ReverseAlphabetical => ordered.sort_by(|a, b| b.word.cmp(&a.word)),
            WordOrder::Shuffled(seed) => shuffle(&mut ordered, seed),
        }
        ordered
    }
}

pub(crate) fn shuffle<T>(items: &mut [T], seed: u64)
{
    items.shuffle(&mut StdRng::seed_from_u64(seed));
}

/// Where the first word of an attempt goes
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum StartPoint
{
    /// The word is centered on the grid
    Center,
    TopLeft,
    /// Shifted from the centered position, rows first
    Offset(i64, i64),
}

/// Where and in which direction the first word of an attempt goes
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct StartPosition
{
    pub point: StartPoint,
    pub direction: Direction,
}

impl Default for StartPosition
{
    fn default() -> Self
    {
        StartPosition { point: StartPoint::Center, direction: Direction::Across }
    }
}

impl StartPosition
{
    pub fn new(point: StartPoint, direction: Direction) -> StartPosition
    {
        StartPosition { point, direction }
    }

    /// Returns the first cell of a word with `word_len` letters, moved back into the grid if it wouldn't fit
    ///
    /// ```
    /// # use crossword_layout::seed::{StartPoint, StartPosition};
    /// # use crossword_layout::word::{Direction, Position};
    /// let center = StartPosition::new(StartPoint::Center, Direction::Across);
    /// assert_eq!(center.resolve(15, 5), Position::new(7, 5));
    ///
    /// let shifted = StartPosition::new(StartPoint::Offset(0, 2), Direction::Across);
    /// assert_eq!(shifted.resolve(7, 7), Position::new(3, 0));
    /// ```
    pub fn resolve(&self, grid_size: usize, word_len: usize) -> Position
    {
        let size = grid_size as i64;
        let len = word_len.min(grid_size) as i64;
        let (center_row, center_col) = match self.direction
        {
            Direction::Across => (size / 2, (size - len) / 2),
            Direction::Down => ((size - len) / 2, size / 2),
        };
        let (row, col) = match self.point
        {
            StartPoint::Center => (center_row, center_col),
            StartPoint::TopLeft => (0, 0),
            StartPoint::Offset(rows, cols) => (center_row + rows, center_col + cols),
        };
        let (max_row, max_col) = match self.direction
        {
            Direction::Across => (size - 1, size - len),
            Direction::Down => (size - len, size - 1),
        };

        Position::new(row.clamp(0, max_row.max(0)) as usize, col.clamp(0, max_col.max(0)) as usize)
    }
}

/// The input that makes one attempt different from another
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum Seed
{
    /// Words in a fixed order, the first one placed at the start position
    Ordered { word_order: Vec<WordEntry>, start: StartPosition },
    /// Words shuffled by `word_order_seed`, `random_seed` drives the order placed words are scanned in
    Random { random_seed: u64, word_order_seed: u64 },
}

impl Seed
{
    /// Longest words first, starting from the grid center
    pub fn default_for(words: &[WordEntry]) -> Seed
    {
        Seed::Ordered { word_order: WordOrder::LongestFirst.apply(words), start: StartPosition::default() }
    }
}

/// Word orders a max overlap search goes through
pub fn word_orders() -> Vec<WordOrder>
{
    [WordOrder::LongestFirst, WordOrder::ShortestFirst, WordOrder::Alphabetical, WordOrder::ReverseAlphabetical].into_iter()
        .chain((1..=SHUFFLED_ORDER_COUNT).map(WordOrder::Shuffled))
        .collect()
}

/// Start positions a max overlap search goes through, the shifted ones only if `with_offsets` is set
pub fn start_positions(with_offsets: bool) -> Vec<StartPosition>
{
    let mut starts = vec![
        StartPosition::new(StartPoint::Center, Direction::Across),
        StartPosition::new(StartPoint::TopLeft, Direction::Across),
        StartPosition::new(StartPoint::Center, Direction::Down),
    ];

    if with_offsets
    {
        let offsets = [(-START_OFFSET, 0), (START_OFFSET, 0), (0, -START_OFFSET), (0, START_OFFSET)];
        starts.extend(offsets.into_iter()
            .cartesian_product([Direction::Across, Direction::Down])
            .map(|((rows, cols), dir)| StartPosition::new(StartPoint::Offset(rows, cols), dir)));
    }

    starts
}

/// Builds every seed of a search up front
///
/// Random mode draws [RANDOM_SEED_COUNT] seed pairs from `master_seed`.
/// Max overlap mode goes through every [word order](word_orders) for every [start position](start_positions) and doesn't use `master_seed`.
pub fn build_seeds(words: &[WordEntry], mode: GenerationMode, master_seed: u64, with_offsets: bool) -> Vec<Seed>
{
    match mode
    {
        GenerationMode::Random =>
        {
            let mut rng = StdRng::seed_from_u64(master_seed);
            (0..RANDOM_SEED_COUNT)
                .map(|_| Seed::Random { random_seed: rng.gen(), word_order_seed: rng.gen() })
                .collect()
        }
        GenerationMode::MaxOverlap =>
        {
            word_orders().into_iter()
                .cartesian_product(start_positions(with_offsets))
                .map(|(order, start)| Seed::Ordered { word_order: order.apply(words), start })
                .collect()
        }
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    fn words() -> Vec<WordEntry>
    {
        ["DOG", "TIGER", "CAT", "ANTELOPE"].iter().map(|w| WordEntry::new(*w, "Animal")).collect()
    }

    fn names(words: &[WordEntry]) -> Vec<&str>
    {
        words.iter().map(|w| w.word.as_str()).collect()
    }

    #[test]
    fn test_word_orders() {
        let words = words();

        assert_eq!(names(&WordOrder::LongestFirst.apply(&words)), vec!["ANTELOPE", "TIGER", "DOG", "CAT"]);
        assert_eq!(names(&WordOrder::ShortestFirst.apply(&words)), vec!["DOG", "CAT", "TIGER", "ANTELOPE"]);
        assert_eq!(names(&WordOrder::Alphabetical.apply(&words)), vec!["ANTELOPE", "CAT", "DOG", "TIGER"]);
        assert_eq!(names(&WordOrder::ReverseAlphabetical.apply(&words)), vec!["TIGER", "DOG", "CAT", "ANTELOPE"]);
    }

    #[test]
    fn test_shuffled_order_is_deterministic() {
        let words = words();
        let first = WordOrder::Shuffled(7).apply(&words);

        assert_eq!(first, WordOrder::Shuffled(7).apply(&words));

        let mut sorted = names(&first);
        sorted.sort();
        assert_eq!(sorted, vec!["ANTELOPE", "CAT", "DOG", "TIGER"]);
    }

    #[test]
    fn test_resolve_start() {
        assert_eq!(StartPosition::new(StartPoint::Center, Direction::Down).resolve(15, 5), Position::new(5, 7));
        assert_eq!(StartPosition::new(StartPoint::TopLeft, Direction::Down).resolve(15, 5), Position::new(0, 0));
        assert_eq!(StartPosition::new(StartPoint::Offset(-2, 0), Direction::Across).resolve(15, 5), Position::new(5, 5));
        assert_eq!(StartPosition::new(StartPoint::Offset(0, 2), Direction::Down).resolve(9, 9), Position::new(0, 6));
    }

    #[test]
    fn test_build_seeds() {
        let words = words();

        let overlap = build_seeds(&words, GenerationMode::MaxOverlap, 0, true);
        assert_eq!(overlap.len(), 8 * 11);
        assert_eq!(overlap[0], Seed::default_for(&words));
        assert_eq!(build_seeds(&words, GenerationMode::MaxOverlap, 0, false).len(), 8 * 3);

        let random = build_seeds(&words, GenerationMode::Random, 42, true);
        assert_eq!(random.len(), RANDOM_SEED_COUNT);
        assert_eq!(random, build_seeds(&words, GenerationMode::Random, 42, true));
        assert_ne!(random, build_seeds(&words, GenerationMode::Random, 43, true));
    }
}
