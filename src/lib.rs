//! Lays out word/clue pairs on a square grid so that the words cross like in a crossword.
//!
//! A [search](search::SearchDriver) runs many greedy [attempts](generator::CrosswordGenerator), each one with a
//! different [seed](seed::Seed), and keeps the best [scoring](score::score) [result](crossword::CrosswordResult).

pub mod traits;
pub mod word;
pub mod placed_word;
pub mod crossword;
pub mod score;
pub mod seed;
pub mod generator;
pub mod search;
pub mod config;
pub mod preset;
