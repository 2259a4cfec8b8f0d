//! This crate solves induction-style logic puzzles: who has which job and
//! lives in which colored house, given a handful of English sentences.

/// Errors raised while reading a malformed puzzle.
pub mod error;

/// The sentence grammar, the puzzle reader and the answer writer.
pub mod puzzle;

/// The constraint solver: relation store, propagation, consistency checks
/// and case-split search.
pub mod solver;
