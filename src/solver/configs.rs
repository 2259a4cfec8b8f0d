#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Tuning knobs for the case-split search.

/// How far and how the case-split search may branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchConfig {
    /// Levels of case splitting. `1` splits once on the guidance person and
    /// never again; `0` disables the search.
    pub depth: usize,
    /// Evaluate hypotheses on the rayon thread pool.
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 1,
            parallel: false,
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub const fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
