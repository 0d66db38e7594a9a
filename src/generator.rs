use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{config::GenerationMode, crossword::CrosswordResult, placed_word::{find_intersections, Candidate}, seed::{shuffle, Seed, StartPosition}, word::WordEntry};

/// Runs single greedy attempts: the first word of the seed's order is placed at the start position,
/// then every other word is crossed with an already placed word as long as that is possible
///
/// Placements are never taken back, a word that gets blocked by earlier placements stays out of the attempt.
///
/// # Example
/// ```
/// use crossword_layout::config::GenerationMode;
/// use crossword_layout::generator::CrosswordGenerator;
/// use crossword_layout::seed::Seed;
/// use crossword_layout::word::{Direction, Position, WordEntry};
///
/// let words = vec![WordEntry::new("HELLO", "Greeting"), WordEntry::new("WORLD", "Earth")];
/// let generator = CrosswordGenerator::new(7, GenerationMode::MaxOverlap);
/// let result = generator.generate(&words, &Seed::default_for(&words));
///
/// // . . . . . . .
/// // . . . . . . .
/// // . . . . . W .
/// // . H E L L O .
/// // . . . . . R .
/// // . . . . . L .
/// // . . . . . D .
///
/// assert!(result.is_complete());
/// assert_eq!(result.placements()[1].position, Position::new(2, 5));
/// assert_eq!(result.placements()[1].direction, Direction::Down);
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct CrosswordGenerator
{
    pub grid_size: usize,
    pub mode: GenerationMode,
}

impl CrosswordGenerator
{
    pub fn new(grid_size: usize, mode: GenerationMode) -> CrosswordGenerator
    {
        CrosswordGenerator { grid_size, mode }
    }

    /// Runs one attempt on a fresh [result](CrosswordResult)
    pub fn generate(&self, words: &[WordEntry], seed: &Seed) -> CrosswordResult
    {
        let mut result = CrosswordResult::new(self.grid_size);
        self.generate_into(words, seed, &mut result);
        result
    }

    /// Runs one attempt reusing `result`, which is reset first
    ///
    /// [Seed::Ordered] seeds bring their own word order, [Seed::Random] seeds shuffle `words`.
    pub fn generate_into(&self, words: &[WordEntry], seed: &Seed, result: &mut CrosswordResult)
    {
        if result.grid().size() == self.grid_size { result.reset(); }
        else { *result = CrosswordResult::new(self.grid_size); }
        result.set_requested(words.len());

        let (mut remaining, start, mut rng) = match seed
        {
            Seed::Ordered { word_order, start } => (word_order.clone(), *start, None),
            Seed::Random { random_seed, word_order_seed } =>
            {
                let mut order = words.to_vec();
                shuffle(&mut order, *word_order_seed);
                (order, StartPosition::default(), Some(StdRng::seed_from_u64(*random_seed)))
            }
        };

        if remaining.is_empty() { return; }
        let first = remaining.remove(0);
        let position = start.resolve(self.grid_size, first.len());
        if !result.grid().can_place_word(&first.word, position, start.direction) { return; }
        result.place_word(&first, position, start.direction);

        while !remaining.is_empty()
        {
            let mut progress = false;
            let mut ind = 0;

            while ind < remaining.len()
            {
                let mut scan_order: Vec<usize> = (0..result.placements().len()).collect();
                if let Some(rng) = rng.as_mut() { scan_order.shuffle(rng); }

                match self.select_candidate(result, &remaining[ind].word, &scan_order)
                {
                    Some(candidate) =>
                    {
                        let entry = remaining.remove(ind);
                        result.place_word(&entry, candidate.position, candidate.direction);
                        progress = true;
                    }
                    None => ind += 1,
                }
            }

            if !progress { break; }
        }
    }

    /// Picks where `word` goes, scanning the placements in `scan_order`
    ///
    /// Max overlap takes the first legal crossing of the placement sharing the most letter pairs with the word
    /// (the earliest one scanned on ties), random takes the first legal crossing found.
    fn select_candidate(&self, result: &CrosswordResult, word: &str, scan_order: &[usize]) -> Option<Candidate>
    {
        let placements = result.placements();

        match self.mode
        {
            GenerationMode::Random => scan_order.iter()
                .find_map(|&ind| placements[ind].calculate_intersection_placements(result.grid(), word).into_iter().next()),
            GenerationMode::MaxOverlap =>
            {
                let mut best: Option<(usize, Candidate)> = None;
                for &ind in scan_order
                {
                    let placed = &placements[ind];
                    let overlap = find_intersections(word, &placed.word).len();
                    if best.is_some_and(|(best_overlap, _)| overlap <= best_overlap) { continue; }

                    if let Some(candidate) = placed.calculate_intersection_placements(result.grid(), word).into_iter().next()
                    {
                        best = Some((overlap, candidate));
                    }
                }
                best.map(|(_, candidate)| candidate)
            }
        }
    }
}
