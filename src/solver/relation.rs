#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The relation store: one candidate matrix per relation plus the
//! association and disassociation logs.
//!
//! Each relation is kept exactly once, as an `N x N` bit matrix whose rows
//! are indexed by the relation's left entity. Column queries are answered
//! from the same matrix, and row/column cardinalities are maintained as
//! derived counts so emptiness and singleton checks stay O(1).

use crate::solver::entity::{Entity, Pairing, Relation};
use bit_vec::BitVec;
use rustc_hash::FxHashSet;
use std::ops::Index;

/// Candidate matrix for one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMatrix {
    relation: Relation,
    rows: Vec<BitVec>,
    row_len: Vec<usize>,
    col_len: Vec<usize>,
}

impl CandidateMatrix {
    /// A fully open matrix: every left entity may pair with every right one.
    #[must_use]
    pub fn full(relation: Relation, n: usize) -> Self {
        Self {
            relation,
            rows: vec![BitVec::from_elem(n, true); n],
            row_len: vec![n; n],
            col_len: vec![n; n],
        }
    }

    #[must_use]
    pub const fn relation(&self) -> Relation {
        self.relation
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn contains(&self, left: usize, right: usize) -> bool {
        self.rows[left].get(right).unwrap_or(false)
    }

    /// Clears one cell. Returns `true` if the cell was set.
    pub fn remove(&mut self, left: usize, right: usize) -> bool {
        if !self.contains(left, right) {
            return false;
        }
        self.rows[left].set(right, false);
        self.row_len[left] -= 1;
        self.col_len[right] -= 1;
        true
    }

    /// Narrows row `left` to `{right}` and column `right` to `{left}`.
    ///
    /// The cell itself is set even if it had been cleared before, so a
    /// conflicting association leaves the matrix non-empty and is reported by
    /// the contradiction scan instead.
    pub fn restrict(&mut self, left: usize, right: usize) {
        let n = self.size();
        for other in 0..n {
            if other != right {
                self.remove(left, other);
            }
            if other != left {
                self.remove(other, right);
            }
        }
        if !self.contains(left, right) {
            self.rows[left].set(right, true);
            self.row_len[left] += 1;
            self.col_len[right] += 1;
        }
    }

    /// Candidates of a left entity, in domain order.
    pub fn row(&self, left: usize) -> impl Iterator<Item = usize> + '_ {
        self.rows[left]
            .iter()
            .enumerate()
            .filter_map(|(i, set)| set.then_some(i))
    }

    /// Candidates of a right entity, in domain order.
    pub fn column(&self, right: usize) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter_map(move |(i, row)| row.get(right).unwrap_or(false).then_some(i))
    }

    #[must_use]
    pub fn row_len(&self, left: usize) -> usize {
        self.row_len[left]
    }

    #[must_use]
    pub fn col_len(&self, right: usize) -> usize {
        self.col_len[right]
    }

    /// The only candidate of `left`, if exactly one remains.
    #[must_use]
    pub fn sole_in_row(&self, left: usize) -> Option<usize> {
        (self.row_len[left] == 1)
            .then(|| self.row(left).next())
            .flatten()
    }

    /// The only candidate of `right`, if exactly one remains.
    #[must_use]
    pub fn sole_in_column(&self, right: usize) -> Option<usize> {
        (self.col_len[right] == 1)
            .then(|| self.column(right).next())
            .flatten()
    }

    /// True if some row or column has no candidates left.
    #[must_use]
    pub fn has_empty_line(&self) -> bool {
        self.row_len.contains(&0) || self.col_len.contains(&0)
    }

    /// Number of candidate cells still set.
    #[must_use]
    pub fn open_cells(&self) -> usize {
        self.row_len.iter().sum()
    }
}

/// An insertion-ordered, deduplicated log of pairings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingLog {
    order: Vec<Pairing>,
    seen: FxHashSet<Pairing>,
}

impl PairingLog {
    /// Appends a pairing. Returns `false` if it was already recorded.
    pub fn record(&mut self, pairing: Pairing) -> bool {
        if !self.seen.insert(pairing) {
            return false;
        }
        self.order.push(pairing);
        true
    }

    #[must_use]
    pub fn contains(&self, pairing: &Pairing) -> bool {
        self.seen.contains(pairing)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pairing> {
        self.order.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Pairing] {
        &self.order
    }
}

/// The three relations and their logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationStore {
    matrices: [CandidateMatrix; 3],
    associations: PairingLog,
    disassociations: PairingLog,
}

impl Index<Relation> for RelationStore {
    type Output = CandidateMatrix;

    fn index(&self, relation: Relation) -> &Self::Output {
        &self.matrices[relation.index()]
    }
}

impl RelationStore {
    /// A store of complexity `n` in which nothing is known yet.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            matrices: Relation::ALL.map(|r| CandidateMatrix::full(r, n)),
            associations: PairingLog::default(),
            disassociations: PairingLog::default(),
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.matrices[0].size()
    }

    /// Records a confirmed pairing and narrows both candidate sets to each
    /// other. Returns `false` (and changes nothing) if already recorded.
    pub fn associate(&mut self, pairing: Pairing) -> bool {
        if !self.associations.record(pairing) {
            return false;
        }
        self.matrices[pairing.relation.index()].restrict(pairing.left, pairing.right);
        true
    }

    /// Records a confirmed exclusion and removes each entity from the other's
    /// candidate set. Returns `false` (and changes nothing) if already
    /// recorded.
    pub fn disassociate(&mut self, pairing: Pairing) -> bool {
        if !self.disassociations.record(pairing) {
            return false;
        }
        self.matrices[pairing.relation.index()].remove(pairing.left, pairing.right);
        true
    }

    #[must_use]
    pub const fn associations(&self) -> &PairingLog {
        &self.associations
    }

    #[must_use]
    pub const fn disassociations(&self) -> &PairingLog {
        &self.disassociations
    }

    #[must_use]
    pub fn is_associated(&self, pairing: &Pairing) -> bool {
        self.associations.contains(pairing)
    }

    /// True if `a` and `b` may still be paired. Entities of the same kind
    /// are never candidates of each other.
    #[must_use]
    pub fn possible(&self, a: Entity, b: Entity) -> bool {
        Pairing::between(a, b).is_some_and(|p| self[p.relation].contains(p.left, p.right))
    }

    /// Candidates of `entity` under `relation`, in domain order.
    ///
    /// # Panics
    ///
    /// If `relation` does not involve the entity's kind.
    #[must_use]
    pub fn candidates(&self, entity: Entity, relation: Relation) -> Vec<usize> {
        let matrix = &self[relation];
        if relation.left() == entity.kind {
            matrix.row(entity.index).collect()
        } else {
            assert_eq!(relation.right(), entity.kind, "{relation} has no {} side", entity.kind);
            matrix.column(entity.index).collect()
        }
    }

    /// Number of candidates of `entity` under `relation`.
    #[must_use]
    pub fn candidate_count(&self, entity: Entity, relation: Relation) -> usize {
        let matrix = &self[relation];
        if relation.left() == entity.kind {
            matrix.row_len(entity.index)
        } else {
            matrix.col_len(entity.index)
        }
    }

    /// The only remaining candidate of `entity` under `relation`, if any.
    #[must_use]
    pub fn sole_candidate(&self, entity: Entity, relation: Relation) -> Option<usize> {
        let matrix = &self[relation];
        if relation.left() == entity.kind {
            matrix.sole_in_row(entity.index)
        } else {
            matrix.sole_in_column(entity.index)
        }
    }

    pub fn matrices(&self) -> impl Iterator<Item = &CandidateMatrix> {
        self.matrices.iter()
    }
}
