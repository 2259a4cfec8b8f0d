#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Impossibility checks over a relation store.

use crate::solver::entity::Relation;
use crate::solver::relation::{CandidateMatrix, RelationStore};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

/// True iff some entity has no candidates left under a relation it takes
/// part in.
#[must_use]
pub fn overconstrained(store: &RelationStore) -> bool {
    store.size() > 0 && store.matrices().any(CandidateMatrix::has_empty_line)
}

/// Full contradiction scan, run once the store has reached a fixed point.
///
/// A store is contradictory when a pairing is both confirmed and excluded,
/// when two confirmed pairings of one relation disagree about a shared
/// entity, or when two entities claim the same sole candidate.
#[must_use]
pub fn contradictory(store: &RelationStore) -> bool {
    excluded_association(store) || conflicting_associations(store) || shared_sole_candidate(store)
}

fn excluded_association(store: &RelationStore) -> bool {
    store
        .associations()
        .iter()
        .any(|p| store.disassociations().contains(p))
}

fn conflicting_associations(store: &RelationStore) -> bool {
    let mut by_left: FxHashMap<(Relation, usize), usize> = FxHashMap::default();
    let mut by_right: FxHashMap<(Relation, usize), usize> = FxHashMap::default();

    for pairing in store.associations().iter() {
        match by_left.entry((pairing.relation, pairing.left)) {
            Entry::Occupied(seen) if *seen.get() != pairing.right => return true,
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                slot.insert(pairing.right);
            }
        }
        match by_right.entry((pairing.relation, pairing.right)) {
            Entry::Occupied(seen) if *seen.get() != pairing.left => return true,
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                slot.insert(pairing.left);
            }
        }
    }
    false
}

fn shared_sole_candidate(store: &RelationStore) -> bool {
    store.matrices().any(|matrix| {
        let n = matrix.size();
        let mut row_claims = vec![0_usize; n];
        let mut col_claims = vec![0_usize; n];
        for line in 0..n {
            if let Some(right) = matrix.sole_in_row(line) {
                row_claims[right] += 1;
            }
            if let Some(left) = matrix.sole_in_column(line) {
                col_claims[left] += 1;
            }
        }
        row_claims.iter().chain(&col_claims).any(|&claims| claims > 1)
    })
}
