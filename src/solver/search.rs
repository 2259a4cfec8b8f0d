#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Guided case splitting.
//!
//! When propagation stalls short of a full solution, the search picks the
//! least determined person (the *guidance* person) and tries every
//! `(job, color)` pair still open for them on an independent clone of the
//! solver. A hypothesis is accepted only if it is the single one that
//! survives propagation; otherwise the caller keeps its partial result.
//!
//! Branches never share state, so they can be evaluated on the rayon pool
//! without changing which hypothesis wins.

use crate::solver::configs::SearchConfig;
use crate::solver::entity::{Entity, Kind, Pairing, Relation};
use crate::solver::state::Solver;
use itertools::iproduct;
use rayon::prelude::*;
use smallvec::{SmallVec, smallvec};
use tracing::{debug, trace};

/// One tentative `(person, job, color)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hypothesis {
    pub person: usize,
    pub job: usize,
    pub color: usize,
}

impl Hypothesis {
    /// The associations that assert the triple, in the order they are
    /// applied.
    #[must_use]
    pub fn associations(&self) -> SmallVec<[Pairing; 3]> {
        smallvec![
            Pairing::new(self.job, self.color, Relation::JobColor),
            Pairing::new(self.person, self.job, Relation::PersonJob),
            Pairing::new(self.person, self.color, Relation::PersonColor),
        ]
    }
}

/// Outcome of splitting on one guidance person.
#[derive(Debug)]
enum Split {
    /// Exactly one hypothesis survived.
    Decided(Solver),
    /// Every hypothesis failed.
    AllImpossible,
    /// Several hypotheses survived, or there was nothing to split on.
    Ambiguous,
}

impl Solver {
    /// The person to branch on: the one with the fewest open
    /// `(job, color)` combinations, ignoring people already settled.
    ///
    /// Ties go to the person scanned last. Returns `None` when every person
    /// is settled.
    #[must_use]
    pub fn guidance_person(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for index in 0..self.complexity() {
            let person = Entity::new(Kind::Person, index);
            let product = self.store.candidate_count(person, Relation::PersonJob)
                * self.store.candidate_count(person, Relation::PersonColor);
            if product == 1 {
                continue;
            }
            if best.is_none_or(|(min, _)| product <= min) {
                best = Some((product, index));
            }
        }
        best.map(|(_, index)| index)
    }

    /// Every open `(job, color)` pair of `person`, jobs-major.
    #[must_use]
    pub fn hypotheses(&self, person: usize) -> Vec<Hypothesis> {
        let entity = Entity::new(Kind::Person, person);
        let jobs = self.store.candidates(entity, Relation::PersonJob);
        let colors = self.store.candidates(entity, Relation::PersonColor);
        iproduct!(jobs, colors)
            .map(|(job, color)| Hypothesis { person, job, color })
            .collect()
    }

    /// Runs the case-split search and returns the decided state, if any.
    ///
    /// `self` is never changed apart from its statistics. `None` means the
    /// search could not single out a hypothesis and the current partial
    /// state is the best answer.
    pub fn explore_branches(&mut self, config: &SearchConfig) -> Option<Self> {
        if self.impossible || self.is_solved() || config.depth == 0 {
            return None;
        }
        match self.split(config.depth, config.parallel) {
            Split::Decided(winner) => Some(winner),
            Split::AllImpossible | Split::Ambiguous => None,
        }
    }

    fn split(&mut self, depth: usize, parallel: bool) -> Split {
        let Some(person) = self.guidance_person() else {
            return Split::Ambiguous;
        };
        let hypotheses = self.hypotheses(person);
        self.stats.hypotheses += hypotheses.len();
        debug!(
            person = self.people.name(person),
            hypotheses = hypotheses.len(),
            depth,
            "splitting on guidance person"
        );

        let this = &*self;
        let outcomes: Vec<Option<Self>> = if parallel {
            hypotheses
                .par_iter()
                .map(|h| this.evaluate(h, depth, parallel))
                .collect()
        } else {
            hypotheses
                .iter()
                .map(|h| this.evaluate(h, depth, parallel))
                .collect()
        };

        let mut survivors = outcomes.into_iter().flatten();
        match (survivors.next(), survivors.next()) {
            (None, _) => Split::AllImpossible,
            (Some(mut winner), None) => {
                winner.stats.decisions += 1;
                Split::Decided(winner)
            }
            (Some(_), Some(_)) => Split::Ambiguous,
        }
    }

    /// Applies one hypothesis to a clone and propagates it. `None` if the
    /// hypothesis is impossible.
    fn evaluate(&self, hypothesis: &Hypothesis, depth: usize, parallel: bool) -> Option<Self> {
        let mut branch = self.clone();
        for pairing in hypothesis.associations() {
            branch.associate(pairing);
        }
        branch.propagate();
        trace!(
            person = branch.people.name(hypothesis.person),
            job = branch.jobs.name(hypothesis.job),
            color = branch.colors.name(hypothesis.color),
            impossible = branch.impossible,
            "hypothesis evaluated"
        );
        if branch.impossible {
            return None;
        }

        if depth > 1 && !branch.is_solved() {
            match branch.split(depth - 1, parallel) {
                Split::AllImpossible => return None,
                Split::Decided(deeper) => return Some(deeper),
                Split::Ambiguous => {}
            }
        }
        Some(branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(solver: &Solver, a: (Kind, &str), b: (Kind, &str)) -> Pairing {
        let a = solver.entity(a.0, a.1).unwrap();
        let b = solver.entity(b.0, b.1).unwrap();
        Pairing::between(a, b).unwrap()
    }

    /// Ann's job and color each have two candidates, but the vet's colors
    /// share none with hers, which propagation alone does not notice.
    fn stalled() -> Solver {
        let mut s = Solver::new();
        s.seed(
            ["ann", "bea", "cid", "dee"],
            ["vet", "cook", "spy", "pilot"],
            ["red", "green", "blue", "black"],
        );
        let facts = [
            ((Kind::Person, "ann"), (Kind::Job, "spy")),
            ((Kind::Person, "ann"), (Kind::Job, "pilot")),
            ((Kind::Person, "ann"), (Kind::Color, "blue")),
            ((Kind::Person, "ann"), (Kind::Color, "black")),
            ((Kind::Job, "vet"), (Kind::Color, "red")),
            ((Kind::Job, "vet"), (Kind::Color, "green")),
            ((Kind::Job, "cook"), (Kind::Color, "green")),
        ];
        for (a, b) in facts {
            s.disassociate(pair(&s, a, b));
        }
        s.propagate();
        s
    }

    #[test]
    fn test_stalled_state_needs_a_split() {
        let s = stalled();
        assert!(!s.is_impossible());
        assert!(s.associations().is_empty());
        assert_eq!(s.guidance_person(), s.entity(Kind::Person, "ann").map(|e| e.index));
    }

    #[test]
    fn test_hypotheses_are_jobs_major() {
        let s = stalled();
        let ann = s.guidance_person().unwrap();
        let names = s
            .hypotheses(ann)
            .iter()
            .map(|h| (s.jobs().name(h.job), s.colors().name(h.color)))
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![("vet", "red"), ("vet", "green"), ("cook", "red"), ("cook", "green")]
        );
    }

    #[test]
    fn test_unique_survivor_is_accepted() {
        let mut s = stalled();
        let winner = s.explore_branches(&SearchConfig::default()).unwrap();

        assert!(!winner.is_impossible());
        for expected in [
            pair(&winner, (Kind::Person, "ann"), (Kind::Job, "cook")),
            pair(&winner, (Kind::Person, "ann"), (Kind::Color, "red")),
            pair(&winner, (Kind::Job, "cook"), (Kind::Color, "red")),
        ] {
            assert!(winner.store().is_associated(&expected));
        }
        assert_eq!(winner.stats().decisions, 1);
        assert_eq!(s.stats().hypotheses, 4);
        assert!(s.associations().is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut sequential = stalled();
        let mut parallel = stalled();
        let a = sequential.explore_branches(&SearchConfig::default()).unwrap();
        let b = parallel
            .explore_branches(&SearchConfig::default().with_parallel(true))
            .unwrap();
        assert_eq!(a.associations(), b.associations());
        assert_eq!(a.disassociations(), b.disassociations());
    }

    #[test]
    fn test_deeper_search_keeps_the_decision() {
        let mut s = stalled();
        let winner = s
            .explore_branches(&SearchConfig::default().with_depth(2))
            .unwrap();
        let ann_cook = pair(&winner, (Kind::Person, "ann"), (Kind::Job, "cook"));
        assert!(winner.store().is_associated(&ann_cook));
    }

    #[test]
    fn test_no_survivors_decide_nothing() {
        let mut s = stalled();
        s.disassociate(pair(&s, (Kind::Job, "cook"), (Kind::Color, "red")));
        s.propagate();
        assert!(!s.is_impossible());
        assert!(s.associations().is_empty());

        let before = s.clone();
        assert!(matches!(s.split(1, false), Split::AllImpossible));
        assert!(s.explore_branches(&SearchConfig::default()).is_none());
        assert_eq!(s.associations(), before.associations());
        assert_eq!(s.disassociations(), before.disassociations());
        assert!(!s.is_impossible());
        assert_eq!(s.stats().hypotheses, 8);
    }

    #[test]
    fn test_several_survivors_decide_nothing() {
        let mut s = Solver::new();
        s.seed(["joe", "tom", "bob"], ["plumber", "electrician", "carpenter"], ["yellow"]);
        for (a, b) in [
            ((Kind::Person, "joe"), (Kind::Job, "plumber")),
            ((Kind::Person, "tom"), (Kind::Job, "electrician")),
        ] {
            s.disassociate(pair(&s, a, b));
        }
        s.associate(pair(&s, (Kind::Person, "bob"), (Kind::Job, "carpenter")));
        s.associate(pair(&s, (Kind::Person, "joe"), (Kind::Color, "yellow")));
        s.propagate();

        assert!(!s.is_solved());
        assert_eq!(s.guidance_person(), Some(2));
        assert!(s.explore_branches(&SearchConfig::default()).is_none());
    }

    #[test]
    fn test_solved_state_is_not_searched() {
        let mut s = Solver::new();
        s.seed(["sue"], ["professor"], ["brown"]);
        s.propagate();
        assert!(s.is_solved());
        assert_eq!(s.guidance_person(), None);
        assert!(s.explore_branches(&SearchConfig::default()).is_none());
    }
}
