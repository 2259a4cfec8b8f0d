//! The puzzle front end: sentence grammar, the puzzle reader and the answer
//! writer.

pub mod answer;
pub mod parser;
pub mod sentence;

pub use answer::Transcript;
pub use parser::{Puzzle, Statement};
pub use sentence::{Assertion, Question};
