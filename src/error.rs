//! Errors raised while reading a puzzle.

use thiserror::Error;

/// A malformed puzzle. Solving never starts once one of these is raised.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("a line contained an incomplete sentence (line {line})")]
    IncompleteSentence { line: usize },

    #[error("assertions must precede questions")]
    AssertionAfterQuestion,

    #[error("an assertion is unformatted: \"{0}\"")]
    UnformattedAssertion(String),

    #[error("a question is unformatted: \"{0}\"")]
    UnformattedQuestion(String),

    #[error("you asked about something random: \"{0}\"")]
    UnknownTopic(String),

    #[error("keywords, people, occupations, and colors must have unique spellings: \"{0}\"")]
    NameCollision(String),

    #[error("could not read puzzle: {0}")]
    Io(#[from] std::io::Error),
}

pub type PuzzleResult<T> = Result<T, PuzzleError>;
