use std::{pin::Pin, task::{Context, Poll}, time::Instant};

use futures::StreamExt;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::{sync::mpsc::{self, error::TryRecvError, Receiver, Sender}, task};
use tokio_stream::Stream;

use crate::{config::CrosswordConfig, crossword::{CrosswordError, CrosswordResult}, generator::CrosswordGenerator, score::score, seed::{build_seeds, Seed}, traits::{ProgressFn, StopFn}, word::{validate_words, WordEntry}};

/// A progress report is made after every this many attempts
pub const PROGRESS_INTERVAL: usize = 10;

/// Represents the state of a running search
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SearchProgress
{
    pub attempts_run: usize,
    pub best_score: f64,
    pub best_placed: usize,
    pub elapsed_seconds: f64,
}

/// Represents the outcome of a search
///
/// `result` is None only if no attempt placed a single word.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SearchOutcome
{
    pub result: Option<CrosswordResult>,
    pub attempts_run: usize,
    pub perfect_solution_found: bool,
    pub elapsed_seconds: f64,
    pub best_score: f64,
    pub requested_words: usize,
}

impl SearchOutcome
{
    pub fn placed_words(&self) -> usize
    {
        self.result.as_ref().map_or(0, CrosswordResult::placed_count)
    }
}

/// Represents a search for the best layout of a word list
///
/// Without `enforce_all_words` a single attempt is made (longest words first, starting from the center).
/// Otherwise seeds are tried one by one until every word is placed, the seeds run out,
/// `max_attempts` attempts are made or `timeout_seconds` pass, whichever comes first.
/// The timeout is checked before every attempt after the first, a running attempt is never interrupted.
///
/// # Example
/// ```
/// use crossword_layout::config::CrosswordConfig;
/// use crossword_layout::search::SearchDriver;
/// use crossword_layout::word::WordEntry;
///
/// let words = vec![WordEntry::new("cat", "Pet"), WordEntry::new("tiger", "Striped cat"), WordEntry::new("dog", "Barks")];
/// let driver = SearchDriver::new(&words, CrosswordConfig::default()).unwrap();
/// let outcome = driver.generate();
///
/// assert!(outcome.perfect_solution_found);
/// assert_eq!(outcome.placed_words(), 3);
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct SearchDriver
{
    words: Vec<WordEntry>,
    config: CrosswordConfig,
}

impl SearchDriver
{
    /// Validates the configuration and the words
    ///
    /// # Errors
    ///
    /// Any error of [CrosswordConfig::validate] or [validate_words]
    pub fn new(words: &[WordEntry], config: CrosswordConfig) -> Result<SearchDriver, CrosswordError>
    {
        config.validate()?;
        let words = validate_words(words, config.effective_grid_size())?;
        Ok(SearchDriver { words, config })
    }

    pub fn words(&self) -> &[WordEntry]
    {
        &self.words
    }

    pub fn config(&self) -> &CrosswordConfig
    {
        &self.config
    }

    pub fn generate(&self) -> SearchOutcome
    {
        self.run(|_: &SearchProgress| {}, || false)
    }

    /// Same as [SearchDriver::generate], `on_progress` is called after every [PROGRESS_INTERVAL] attempts
    pub fn generate_with_progress(&self, on_progress: impl ProgressFn) -> SearchOutcome
    {
        self.run(on_progress, || false)
    }

    /// Runs the search on the blocking thread pool of the tokio runtime and reports it as a [stream](SearchStream)
    ///
    /// # Example
    /// ```
    /// use crossword_layout::config::CrosswordConfig;
    /// use crossword_layout::search::{SearchDriver, SearchEvent};
    /// use crossword_layout::word::WordEntry;
    ///
    /// use tokio_stream::StreamExt;
    ///
    /// #[tokio::main(flavor = "current_thread")]
    /// async fn main()
    /// {
    ///     let words = vec![WordEntry::new("HELLO", "Greeting"), WordEntry::new("WORLD", "Earth")];
    ///     let driver = SearchDriver::new(&words, CrosswordConfig::default()).unwrap();
    ///
    ///     let events: Vec<SearchEvent> = driver.search_stream().collect().await;
    ///     assert!(matches!(events.last(), Some(SearchEvent::Finished(outcome)) if outcome.perfect_solution_found));
    /// }
    /// ```
    pub fn search_stream(&self) -> SearchStream
    {
        let driver = self.clone();

        SearchStream::new(move |mut requests, events|
        {
            let progress_events = events.clone();
            let outcome = driver.run(
                move |progress: &SearchProgress|
                {
                    // a slow reader misses progress reports, not the outcome
                    let _ = progress_events.try_send(SearchEvent::Progress(progress.clone()));
                },
                move || !matches!(requests.try_recv(), Err(TryRecvError::Empty)),
            );
            if events.blocking_send(SearchEvent::Finished(outcome)).is_err()
            {
                debug!("search stream dropped before the outcome was read");
            }
        })
    }

    fn seeds(&self) -> Vec<Seed>
    {
        let generation = &self.config.generation;
        let master_seed = generation.seed.unwrap_or_else(|| rand::thread_rng().gen());
        build_seeds(&self.words, generation.mode, master_seed, generation.explore_offsets)
    }

    fn run(&self, mut on_progress: impl ProgressFn, mut should_stop: impl StopFn) -> SearchOutcome
    {
        let started = Instant::now();
        let generation = &self.config.generation;
        let generator = CrosswordGenerator::new(self.config.effective_grid_size(), generation.mode);

        if !generation.enforce_all_words
        {
            let result = generator.generate(&self.words, &Seed::default_for(&self.words));
            return self.finish(Some(result), 1, started);
        }

        let mut scratch = CrosswordResult::new(generator.grid_size);
        let mut best: Option<CrosswordResult> = None;
        let mut best_score = f64::NEG_INFINITY;
        let mut attempts_run = 0;

        for seed in self.seeds().iter()
        {
            if attempts_run >= generation.max_attempts { break; }
            if attempts_run > 0 && started.elapsed().as_secs_f64() > generation.timeout_seconds
            {
                debug!("search timed out after {attempts_run} attempts");
                break;
            }
            if should_stop()
            {
                debug!("search stopped after {attempts_run} attempts");
                break;
            }

            generator.generate_into(&self.words, seed, &mut scratch);
            attempts_run += 1;

            if scratch.is_complete()
            {
                best = Some(scratch.clone());
                break;
            }

            let attempt_score = score(&scratch);
            if !scratch.placements().is_empty() && attempt_score > best_score
            {
                debug!("attempt {attempts_run} placed {}/{} words, score {attempt_score:.2}", scratch.placed_count(), self.words.len());
                best_score = attempt_score;
                best = Some(scratch.clone());
            }

            if attempts_run % PROGRESS_INTERVAL == 0
            {
                on_progress(&SearchProgress
                {
                    attempts_run,
                    best_score: best.as_ref().map_or(0.0, |_| best_score),
                    best_placed: best.as_ref().map_or(0, CrosswordResult::placed_count),
                    elapsed_seconds: started.elapsed().as_secs_f64(),
                });
            }
        }

        self.finish(best, attempts_run, started)
    }

    fn finish(&self, result: Option<CrosswordResult>, attempts_run: usize, started: Instant) -> SearchOutcome
    {
        let outcome = SearchOutcome
        {
            best_score: result.as_ref().map_or(0.0, score),
            perfect_solution_found: result.as_ref().is_some_and(CrosswordResult::is_complete),
            result,
            attempts_run,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            requested_words: self.words.len(),
        };

        info!("search finished: {} attempts, {}/{} words placed, perfect: {}, {:.3}s",
            outcome.attempts_run, outcome.placed_words(), outcome.requested_words, outcome.perfect_solution_found, outcome.elapsed_seconds);

        outcome
    }
}

/// Validates the input and runs a [search](SearchDriver) with the configuration
pub fn generate(words: &[WordEntry], config: &CrosswordConfig) -> Result<SearchOutcome, CrosswordError>
{
    Ok(SearchDriver::new(words, config.clone())?.generate())
}


/// Represents a request to a [SearchStream]
#[derive(Clone, Eq, PartialEq, PartialOrd, Ord, Default, Debug, Serialize, Deserialize)]
pub enum SearchRequest
{
    /// Request to stop the search before its next attempt, the best result so far is still reported.
    #[default]
    Stop,
}

/// Represents an item of a [SearchStream]
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum SearchEvent
{
    Progress(SearchProgress),
    /// Always the last item
    Finished(SearchOutcome),
}

pub struct SearchStream
{
    request_sender: Sender<SearchRequest>,
    event_receiver: Receiver<SearchEvent>,
}

impl SearchStream
{
    pub fn new<F>(search_func: F) -> SearchStream
    where
        F: FnOnce(Receiver<SearchRequest>, Sender<SearchEvent>) + Send + 'static
    {
        let (rs, rr) = mpsc::channel(100);
        let (es, er) = mpsc::channel(100);

        task::spawn_blocking(move || search_func(rr, es));

        SearchStream { request_sender: rs, event_receiver: er }
    }

    /// Sends a request to the search, it's ignored if the search has already finished.
    ///
    /// Dropping the stream stops the search as well.
    pub async fn request(&self, req: SearchRequest)
    {
        if self.request_sender.send(req).await.is_err()
        {
            debug!("search already finished, request ignored");
        }
    }

    /// Skips the progress reports and returns the outcome
    pub async fn outcome(mut self) -> Option<SearchOutcome>
    {
        while let Some(event) = self.next().await
        {
            if let SearchEvent::Finished(outcome) = event { return Some(outcome); }
        }
        None
    }
}

impl Stream for SearchStream
{
    type Item = SearchEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context) -> Poll<Option<Self::Item>>
    {
        self.event_receiver.poll_recv(cx)
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::{config::GenerationMode, seed::RANDOM_SEED_COUNT, word::{Direction, Position}};

    fn init_logger()
    {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn entries(words: &[&str]) -> Vec<WordEntry>
    {
        words.iter().map(|w| WordEntry::new(*w, format!("Clue for {w}"))).collect()
    }

    fn config(mode: GenerationMode, max_attempts: usize) -> CrosswordConfig
    {
        let mut config = CrosswordConfig::default();
        config.generation.mode = mode;
        config.generation.max_attempts = max_attempts;
        config.generation.seed = Some(7);
        config
    }

    #[test]
    fn test_single_attempt_without_enforce_all_words() {
        init_logger();
        let mut config = config(GenerationMode::MaxOverlap, 500);
        config.generation.enforce_all_words = false;

        let outcome = generate(&entries(&["CAT", "DOG", "EMU"]), &config).unwrap();

        assert_eq!(outcome.attempts_run, 1);
        assert_eq!(outcome.placed_words(), 1);
        assert_eq!(outcome.requested_words, 3);
        assert!(!outcome.perfect_solution_found);
    }

    #[test]
    fn test_stops_on_perfect_solution() {
        init_logger();
        let outcome = generate(&entries(&["CAT", "TIGER", "DOG"]), &config(GenerationMode::MaxOverlap, 1000)).unwrap();

        assert_eq!(outcome.attempts_run, 1);
        assert!(outcome.perfect_solution_found);
        assert_eq!(outcome.placed_words(), 3);
        assert!(outcome.best_score > 300.0);
    }

    #[test]
    fn test_keeps_best_partial_result() {
        init_logger();
        let outcome = generate(&entries(&["TIGER", "CAT", "ZZZ"]), &config(GenerationMode::MaxOverlap, 1000)).unwrap();

        // every word order for every start position, none of them places ZZZ
        assert_eq!(outcome.attempts_run, 8 * 11);
        assert!(!outcome.perfect_solution_found);
        assert_eq!(outcome.placed_words(), 2);
        assert!(!outcome.result.as_ref().unwrap().is_placed("ZZZ"));
    }

    #[test]
    fn test_equal_scores_keep_first_attempt() {
        init_logger();
        let outcome = generate(&entries(&["CAT", "DOG"]), &config(GenerationMode::MaxOverlap, 1000)).unwrap();
        let result = outcome.result.as_ref().unwrap();

        // every attempt places a single word with the same score, the first one (CAT centered across) stays
        assert_eq!(outcome.attempts_run, 8 * 11);
        assert_eq!(result.placements().len(), 1);
        assert_eq!(result.placements()[0].word, "CAT");
        assert_eq!(result.placements()[0].position, Position::new(7, 6));
        assert_eq!(result.placements()[0].direction, Direction::Across);
    }

    #[test]
    fn test_max_attempts_bound() {
        init_logger();
        let words = entries(&["CAT", "DOG"]);

        assert_eq!(generate(&words, &config(GenerationMode::MaxOverlap, 5)).unwrap().attempts_run, 5);
        assert_eq!(generate(&words, &config(GenerationMode::Random, 20)).unwrap().attempts_run, 20);
        assert_eq!(generate(&words, &config(GenerationMode::Random, 1_000_000)).unwrap().attempts_run, RANDOM_SEED_COUNT);
    }

    #[test]
    fn test_timeout_bound() {
        init_logger();
        let mut config = config(GenerationMode::Random, 1_000_000);
        config.generation.timeout_seconds = 1e-6;

        let outcome = generate(&entries(&["CAT", "DOG", "EMU"]), &config).unwrap();

        assert!(outcome.attempts_run >= 1);
        assert!(outcome.attempts_run < RANDOM_SEED_COUNT);
        assert!(outcome.elapsed_seconds < 1.0);
        assert!(outcome.result.is_some());
    }

    #[test]
    fn test_random_mode_is_deterministic_with_seed() {
        init_logger();
        let words = entries(&["ALPACA", "CAT", "TIGER", "DOG", "GOAT", "RAT", "OTTER", "LLAMA"]);
        let config = config(GenerationMode::Random, 50);

        let first = generate(&words, &config).unwrap();
        let second = generate(&words, &config).unwrap();

        assert_eq!(first.attempts_run, second.attempts_run);
        assert_eq!(first.result, second.result);
    }

    #[test]
    fn test_progress_reports() {
        init_logger();
        let driver = SearchDriver::new(&entries(&["CAT", "DOG", "EMU"]), config(GenerationMode::MaxOverlap, 1000)).unwrap();
        let mut reports = vec![];

        let outcome = driver.generate_with_progress(|progress: &SearchProgress| reports.push(progress.attempts_run));

        assert_eq!(outcome.attempts_run, 88);
        assert_eq!(reports, vec![10, 20, 30, 40, 50, 60, 70, 80]);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let mut small = CrosswordConfig::default();
        small.grid_size.default = 5;

        assert!(matches!(SearchDriver::new(&entries(&["CAT"]), CrosswordConfig::default()), Err(CrosswordError::TooFewWords { count: 1 })));
        assert!(matches!(SearchDriver::new(&entries(&["CAT", "ELEPHANT"]), small), Err(CrosswordError::WordTooLong { .. })));

        let mut broken = CrosswordConfig::default();
        broken.generation.max_attempts = 0;
        assert!(matches!(generate(&entries(&["CAT", "DOG"]), &broken), Err(CrosswordError::InvalidGeneration { .. })));
    }

    #[tokio::test]
    async fn test_search_stream() {
        init_logger();
        let driver = SearchDriver::new(&entries(&["CAT", "DOG", "EMU"]), config(GenerationMode::MaxOverlap, 1000)).unwrap();

        let events: Vec<SearchEvent> = driver.search_stream().collect().await;

        assert_eq!(events.iter().filter(|e| matches!(e, SearchEvent::Progress(_))).count(), 8);
        assert!(matches!(events.last(), Some(SearchEvent::Finished(outcome)) if outcome.attempts_run == 88));
    }

    #[cfg(feature = "multi-thread")]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_search_stream_multi_thread() {
        init_logger();
        let driver = SearchDriver::new(&entries(&["CAT", "TIGER", "DOG"]), config(GenerationMode::MaxOverlap, 1000)).unwrap();

        let outcome = driver.search_stream().outcome().await.unwrap();

        assert!(outcome.perfect_solution_found);
        assert_eq!(outcome.attempts_run, 1);
    }

    #[tokio::test]
    async fn test_search_stream_stop() {
        init_logger();
        let driver = SearchDriver::new(&entries(&["CAT", "DOG", "EMU"]), config(GenerationMode::Random, 1000)).unwrap();

        let stream = driver.search_stream();
        stream.request(SearchRequest::Stop).await;
        let outcome = stream.outcome().await.unwrap();

        assert!(outcome.attempts_run <= RANDOM_SEED_COUNT);
        assert_eq!(outcome.requested_words, 3);
    }
}
