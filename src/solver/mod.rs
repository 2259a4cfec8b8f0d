//! The constraint solver: three pairwise relations between people, jobs and
//! colors, driven to a fixed point and, when that is not enough, split on
//! the least determined person.

pub mod configs;
pub mod consistency;
pub mod entity;
pub mod propagation;
pub mod relation;
pub mod search;
pub mod state;

pub use configs::SearchConfig;
pub use entity::{Entity, Kind, Pairing, Relation};
pub use search::Hypothesis;
pub use state::{Attribute, SolutionStats, Solver};
