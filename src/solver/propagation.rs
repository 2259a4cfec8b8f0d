#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Fixed-point propagation over the relation store.
//!
//! Every new association or disassociation enqueues an [`Event`]. Draining
//! the queue applies three families of inference:
//!
//! 1. **Direct closure**: an association excludes every other entity of the
//!    same kind from the partner under the same relation.
//! 2. **Cross-relation closure**: the relations compose
//!    (person-job ∘ job-color ≡ person-color), so a known pair prunes and
//!    completes the other two relations through the third kind.
//! 3. **Elimination closure**: singleton candidate sets become associations,
//!    and two entities sharing the same two candidates claim them
//!    exclusively.
//!
//! Propagation runs in passes. Each pass re-enqueues every recorded fact so
//! rules whose premises changed after their first firing get another look.
//! The loop stops after a pass that adds nothing, plus one confirming pass.

use crate::solver::consistency::{contradictory, overconstrained};
use crate::solver::entity::{Entity, Pairing, Relation};
use crate::solver::state::Solver;
use itertools::Itertools;
use smallvec::SmallVec;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// A newly recorded fact that has not been propagated yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Event {
    Associated(Pairing),
    Disassociated(Pairing),
}

/// FIFO work queue of pending propagation events.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropagationQueue(VecDeque<Event>);

impl PropagationQueue {
    pub fn push(&mut self, event: Event) {
        self.0.push_back(event);
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.0.pop_front()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Extend<Event> for PropagationQueue {
    fn extend<T: IntoIterator<Item = Event>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

/// Which side of a candidate matrix a scan walks over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Rows,
    Columns,
}

impl Side {
    const BOTH: [Self; 2] = [Self::Rows, Self::Columns];

    /// The pairing between line `line` and value `value` on this side.
    const fn pairing(self, relation: Relation, line: usize, value: usize) -> Pairing {
        match self {
            Self::Rows => Pairing::new(line, value, relation),
            Self::Columns => Pairing::new(value, line, relation),
        }
    }
}

impl Solver {
    /// Drives the state to a fixed point, then runs the full contradiction
    /// scan.
    ///
    /// Stops early once the state is overconstrained.
    pub fn propagate(&mut self) {
        let mut updating = true;
        let mut final_check = true;

        while !self.impossible && (updating || final_check) {
            final_check = updating;
            let before = self.fact_count();
            self.stats.passes += 1;

            self.queue.clear();
            self.queue.extend(
                self.store
                    .associations()
                    .iter()
                    .copied()
                    .map(Event::Associated)
                    .chain(
                        self.store
                            .disassociations()
                            .iter()
                            .copied()
                            .map(Event::Disassociated),
                    ),
            );
            self.drain();
            if self.impossible {
                break;
            }

            self.exclusive_pairs();
            self.forced_associations();
            self.drain();

            updating = self.fact_count() != before;
            trace!(
                pass = self.stats.passes,
                associations = self.store.associations().len(),
                disassociations = self.store.disassociations().len(),
                "propagation pass finished"
            );
        }

        self.impossible =
            self.impossible || overconstrained(&self.store) || contradictory(&self.store);
        debug!(
            passes = self.stats.passes,
            impossible = self.impossible,
            solved = self.is_solved(),
            "propagation reached a fixed point"
        );
    }

    fn fact_count(&self) -> (usize, usize) {
        (
            self.store.associations().len(),
            self.store.disassociations().len(),
        )
    }

    /// Processes queued events until the queue is empty or the state is
    /// overconstrained.
    fn drain(&mut self) {
        while let Some(event) = self.queue.pop() {
            if overconstrained(&self.store) {
                self.impossible = true;
                self.queue.clear();
                return;
            }
            self.stats.propagations += 1;
            match event {
                Event::Associated(pairing) => {
                    self.direct_closure(pairing);
                    self.cross_closure(pairing);
                }
                Event::Disassociated(pairing) => self.exclusion_closure(pairing),
            }
        }
    }

    /// An association is a bijection edge: nobody else of either kind may
    /// share it.
    fn direct_closure(&mut self, pairing: Pairing) {
        let Pairing {
            left,
            right,
            relation,
        } = pairing;
        for other in 0..self.complexity() {
            if other != left {
                self.disassociate(Pairing::new(other, right, relation));
            }
            if other != right {
                self.disassociate(Pairing::new(left, other, relation));
            }
        }
    }

    /// Pushes a known pair `(a, b)` through every entity `z` of the third
    /// kind: `z` excluded from one side is excluded from the other, and a
    /// known `z` on one side becomes known on the other.
    fn cross_closure(&mut self, pairing: Pairing) {
        let a = pairing.left_entity();
        let b = pairing.right_entity();
        let third = pairing.relation.third();

        for index in 0..self.complexity() {
            let z = Entity::new(third, index);
            let (Some(az), Some(bz)) = (Pairing::between(a, z), Pairing::between(b, z)) else {
                continue;
            };

            if !self.store.possible(a, z) {
                self.disassociate(bz);
            }
            if !self.store.possible(b, z) {
                self.disassociate(az);
            }
            if self.store.is_associated(&az) {
                self.associate(bz);
            }
            if self.store.is_associated(&bz) {
                self.associate(az);
            }
        }
    }

    /// For an excluded pair `(a, b)`: any `z` of the third kind whose only
    /// remaining candidate is `a` cannot go with `b`, and vice versa.
    fn exclusion_closure(&mut self, pairing: Pairing) {
        let a = pairing.left_entity();
        let b = pairing.right_entity();
        let third = pairing.relation.third();

        for index in 0..self.complexity() {
            let z = Entity::new(third, index);
            let (Some(az), Some(bz)) = (Pairing::between(a, z), Pairing::between(b, z)) else {
                continue;
            };

            if self.store.sole_candidate(z, az.relation) == Some(a.index) {
                self.disassociate(bz);
            }
            if self.store.sole_candidate(z, bz.relation) == Some(b.index) {
                self.disassociate(az);
            }
        }
    }

    /// Every candidate set with exactly one member becomes an association.
    fn forced_associations(&mut self) {
        let store = &self.store;
        let forced = Relation::ALL
            .iter()
            .flat_map(move |&relation| {
                let matrix = &store[relation];
                let n = matrix.size();
                let rows = (0..n)
                    .filter_map(move |l| matrix.sole_in_row(l).map(|r| Pairing::new(l, r, relation)));
                let columns = (0..n).filter_map(move |r| {
                    matrix
                        .sole_in_column(r)
                        .map(|l| Pairing::new(l, r, relation))
                });
                rows.chain(columns)
            })
            .collect_vec();

        for pairing in forced {
            self.associate(pairing);
        }
    }

    /// Two entities of the same kind with the same two candidates must take
    /// those two values between them, so every other entity of that kind
    /// loses both.
    fn exclusive_pairs(&mut self) {
        let mut exclusions = Vec::new();

        for relation in Relation::ALL {
            let matrix = &self.store[relation];
            let n = matrix.size();

            for side in Side::BOTH {
                let pairs = (0..n)
                    .filter_map(|line| {
                        let values: SmallVec<[usize; 2]> = match side {
                            Side::Rows if matrix.row_len(line) == 2 => matrix.row(line).collect(),
                            Side::Columns if matrix.col_len(line) == 2 => {
                                matrix.column(line).collect()
                            }
                            _ => return None,
                        };
                        Some((line, values))
                    })
                    .collect_vec();

                for ((first, values), (second, other)) in pairs.iter().tuple_combinations() {
                    if values != other {
                        continue;
                    }
                    for line in (0..n).filter(|l| l != first && l != second) {
                        exclusions.extend(
                            values
                                .iter()
                                .map(|&value| side.pairing(relation, line, value)),
                        );
                    }
                }
            }
        }

        for pairing in exclusions {
            self.disassociate(pairing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::entity::Kind;

    fn solver(people: &[&str], jobs: &[&str], colors: &[&str]) -> Solver {
        let mut solver = Solver::new();
        solver.seed(people.iter().copied(), jobs.iter().copied(), colors.iter().copied());
        solver
    }

    fn pair(solver: &Solver, a: (Kind, &str), b: (Kind, &str)) -> Pairing {
        let a = solver.entity(a.0, a.1).unwrap();
        let b = solver.entity(b.0, b.1).unwrap();
        Pairing::between(a, b).unwrap()
    }

    #[test]
    fn test_propagation_queue_is_fifo() {
        let mut q = PropagationQueue::default();
        let first = Event::Associated(Pairing::new(0, 0, Relation::PersonJob));
        let second = Event::Disassociated(Pairing::new(1, 0, Relation::JobColor));
        q.push(first);
        q.push(second);
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some(first));
        assert_eq!(q.pop(), Some(second));
        assert_eq!(q.pop(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn test_direct_closure_excludes_others() {
        let mut s = solver(&["ann", "bea"], &["cook", "vet"], &[]);
        let p = pair(&s, (Kind::Person, "ann"), (Kind::Job, "cook"));
        s.associate(p);
        s.propagate();

        let bea_vet = pair(&s, (Kind::Person, "bea"), (Kind::Job, "vet"));
        assert!(s.store().is_associated(&bea_vet));
        let bea_cook = pair(&s, (Kind::Person, "bea"), (Kind::Job, "cook"));
        assert!(s.store().disassociations().contains(&bea_cook));
        assert!(!s.is_impossible());
    }

    #[test]
    fn test_two_knowns_imply_the_third() {
        let mut s = solver(&["ann", "bea", "cid"], &["cook", "vet", "spy"], &["red", "tan", "sky"]);
        let ann_cook = pair(&s, (Kind::Person, "ann"), (Kind::Job, "cook"));
        let ann_red = pair(&s, (Kind::Person, "ann"), (Kind::Color, "red"));
        s.associate(ann_cook);
        s.associate(ann_red);
        s.propagate();

        let cook_red = pair(&s, (Kind::Job, "cook"), (Kind::Color, "red"));
        assert!(s.store().is_associated(&cook_red));
    }

    #[test]
    fn test_cross_closure_prunes_through_partner() {
        let mut s = solver(&["ann", "bea", "cid"], &["cook", "vet", "spy"], &["red", "tan", "sky"]);
        s.disassociate(pair(&s, (Kind::Job, "cook"), (Kind::Color, "red")));
        s.associate(pair(&s, (Kind::Person, "ann"), (Kind::Job, "cook")));
        s.propagate();

        let ann_red = pair(&s, (Kind::Person, "ann"), (Kind::Color, "red"));
        assert!(s.store().disassociations().contains(&ann_red));
    }

    #[test]
    fn test_singleton_becomes_association() {
        let mut s = solver(&["ann", "bea", "cid"], &["cook", "vet", "spy"], &[]);
        s.disassociate(pair(&s, (Kind::Person, "ann"), (Kind::Job, "cook")));
        s.disassociate(pair(&s, (Kind::Person, "ann"), (Kind::Job, "vet")));
        s.propagate();

        let ann_spy = pair(&s, (Kind::Person, "ann"), (Kind::Job, "spy"));
        assert!(s.store().is_associated(&ann_spy));
        assert!(!s.is_impossible());
    }

    #[test]
    fn test_exclusive_pair_claims_both_values() {
        let mut s = solver(&["ann", "bea", "cid", "dee"], &["cook", "vet", "spy", "pilot"], &[]);
        for person in ["ann", "bea"] {
            for job in ["spy", "pilot"] {
                s.disassociate(pair(&s, (Kind::Person, person), (Kind::Job, job)));
            }
        }
        s.propagate();

        for person in ["cid", "dee"] {
            for job in ["cook", "vet"] {
                let p = pair(&s, (Kind::Person, person), (Kind::Job, job));
                assert!(s.store().disassociations().contains(&p), "{person} {job}");
            }
        }
    }

    #[test]
    fn test_exclusion_follows_sole_candidate() {
        let mut s = solver(&["ann", "bea", "cid"], &["cook", "vet", "spy"], &["red", "tan", "sky"]);
        s.disassociate(pair(&s, (Kind::Person, "bea"), (Kind::Job, "cook")));
        s.disassociate(pair(&s, (Kind::Person, "cid"), (Kind::Job, "cook")));
        s.disassociate(pair(&s, (Kind::Person, "ann"), (Kind::Color, "red")));
        s.drain();

        // Only ann can be the cook, and ann is not in the red house.
        let cook_red = pair(&s, (Kind::Job, "cook"), (Kind::Color, "red"));
        assert!(s.store().disassociations().contains(&cook_red));
        assert!(s.associations().is_empty());
    }

    #[test]
    fn test_column_singleton_becomes_association() {
        let mut s = solver(&["ann", "bea", "cid"], &["cook", "vet", "spy"], &["red", "tan", "sky"]);
        s.disassociate(pair(&s, (Kind::Job, "vet"), (Kind::Color, "red")));
        s.disassociate(pair(&s, (Kind::Job, "spy"), (Kind::Color, "red")));
        s.forced_associations();

        let cook_red = pair(&s, (Kind::Job, "cook"), (Kind::Color, "red"));
        assert_eq!(s.associations(), [cook_red]);
    }

    #[test]
    fn test_exclusive_pair_across_columns() {
        let mut s = solver(
            &["ann", "bea", "cid", "dee", "eve"],
            &["spy", "pilot", "cook", "vet", "chef"],
            &[],
        );
        for person in ["cid", "dee", "eve"] {
            for job in ["spy", "pilot"] {
                s.disassociate(pair(&s, (Kind::Person, person), (Kind::Job, job)));
            }
        }
        s.exclusive_pairs();

        for person in ["ann", "bea"] {
            for job in ["cook", "vet", "chef"] {
                let p = pair(&s, (Kind::Person, person), (Kind::Job, job));
                assert!(s.store().disassociations().contains(&p), "{person} {job}");
            }
        }
    }

    #[test]
    fn test_drain_stops_once_overconstrained() {
        let mut s = solver(&["ann", "bea"], &["cook", "vet"], &[]);
        s.disassociate(pair(&s, (Kind::Person, "ann"), (Kind::Job, "cook")));
        s.disassociate(pair(&s, (Kind::Person, "ann"), (Kind::Job, "vet")));
        s.drain();

        assert!(s.is_impossible());
        assert_eq!(s.stats().propagations, 0);
        assert!(s.queue.is_empty());
    }

    #[test]
    fn test_conflicting_facts_are_impossible() {
        let mut s = solver(&["xavier"], &[], &["red"]);
        let p = pair(&s, (Kind::Person, "xavier"), (Kind::Color, "red"));
        s.associate(p);
        s.disassociate(p);
        s.propagate();
        assert!(s.is_impossible());
    }

    #[test]
    fn test_not_impossible_means_no_empty_sets() {
        let mut s = solver(&["ann", "bea", "cid"], &["cook", "vet"], &["red"]);
        s.disassociate(pair(&s, (Kind::Person, "ann"), (Kind::Job, "cook")));
        s.associate(pair(&s, (Kind::Person, "bea"), (Kind::Color, "red")));
        s.propagate();

        assert!(!s.is_impossible());
        for matrix in s.store().matrices() {
            for i in 0..matrix.size() {
                assert!(matrix.row_len(i) > 0);
                assert!(matrix.col_len(i) > 0);
            }
        }
    }

    #[test]
    fn test_propagate_is_stable() {
        let mut s = solver(&["ann", "bea", "cid"], &["cook", "vet"], &["red"]);
        s.associate(pair(&s, (Kind::Person, "cid"), (Kind::Job, "vet")));
        s.propagate();
        let associations = s.associations().to_vec();
        let disassociations = s.disassociations().to_vec();
        s.propagate();
        assert_eq!(s.associations(), associations.as_slice());
        assert_eq!(s.disassociations(), disassociations.as_slice());
    }
}
