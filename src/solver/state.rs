#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The solver state: padded domains, the relation store, the pending
//! propagation queue and the impossibility flag.
//!
//! A `Solver` is created empty, seeded once with the named entities of a
//! puzzle, fed associations and disassociations, and then driven to a fixed
//! point with [`Solver::propagate`]. Case splitting works on clones, so a
//! `Solver` is plain data and cheap to reason about.

use crate::solver::entity::{Domain, Entity, Kind, Pairing, Relation};
use crate::solver::propagation::{Event, PropagationQueue};
use crate::solver::relation::RelationStore;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Counters collected while solving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SolutionStats {
    /// Full propagation passes, including the confirming pass.
    pub passes: usize,
    /// Queued propagation steps processed.
    pub propagations: usize,
    /// Case-split hypotheses evaluated.
    pub hypotheses: usize,
    /// Case splits that were accepted.
    pub decisions: usize,
    /// Confirmed associations.
    pub associations: usize,
    /// Confirmed disassociations.
    pub disassociations: usize,
}

/// One attribute of a topic: its remaining candidates under one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// The kind of the candidates.
    pub kind: Kind,
    /// Candidate names in domain order.
    pub candidates: Vec<&'a str>,
    known: Option<&'a str>,
}

impl<'a> Attribute<'a> {
    /// The attribute's value if it is uniquely determined and named.
    #[must_use]
    pub const fn known(&self) -> Option<&'a str> {
        self.known
    }
}

/// The puzzle-solving engine.
#[derive(Debug, Clone)]
pub struct Solver {
    pub(crate) people: Domain,
    pub(crate) jobs: Domain,
    pub(crate) colors: Domain,
    pub(crate) store: RelationStore,
    pub(crate) queue: PropagationQueue,
    pub(crate) impossible: bool,
    pub(crate) stats: SolutionStats,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// A solver that knows nothing and has complexity zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            people: Domain::padded(Kind::Person, Vec::<String>::new(), 0),
            jobs: Domain::padded(Kind::Job, Vec::<String>::new(), 0),
            colors: Domain::padded(Kind::Color, Vec::<String>::new(), 0),
            store: RelationStore::new(0),
            queue: PropagationQueue::default(),
            impossible: false,
            stats: SolutionStats::default(),
        }
    }

    /// Seeds the domains from the named entities of a puzzle.
    ///
    /// The complexity becomes the size of the largest class; the other
    /// classes are padded with anonymous entities. Every candidate set starts
    /// out as the whole opposite domain.
    pub fn seed<P, J, C>(&mut self, people: P, jobs: J, colors: C)
    where
        P: IntoIterator,
        P::Item: Into<String>,
        J: IntoIterator,
        J::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let people = people.into_iter().map(Into::<String>::into).unique().collect_vec();
        let jobs = jobs.into_iter().map(Into::<String>::into).unique().collect_vec();
        let colors = colors.into_iter().map(Into::<String>::into).unique().collect_vec();
        let complexity = people.len().max(jobs.len()).max(colors.len());

        self.people = Domain::padded(Kind::Person, people, complexity);
        self.jobs = Domain::padded(Kind::Job, jobs, complexity);
        self.colors = Domain::padded(Kind::Color, colors, complexity);
        self.store = RelationStore::new(complexity);
        self.queue.clear();
        self.impossible = false;
        self.stats = SolutionStats::default();
    }

    /// The common size of the three domains.
    #[must_use]
    pub fn complexity(&self) -> usize {
        self.store.size()
    }

    #[must_use]
    pub const fn domain(&self, kind: Kind) -> &Domain {
        match kind {
            Kind::Person => &self.people,
            Kind::Job => &self.jobs,
            Kind::Color => &self.colors,
        }
    }

    #[must_use]
    pub fn people(&self) -> &Domain {
        &self.people
    }

    #[must_use]
    pub fn jobs(&self) -> &Domain {
        &self.jobs
    }

    #[must_use]
    pub fn colors(&self) -> &Domain {
        &self.colors
    }

    /// Looks up an entity by kind and (already normalised) name.
    #[must_use]
    pub fn entity(&self, kind: Kind, name: &str) -> Option<Entity> {
        self.domain(kind)
            .index_of(name)
            .map(|index| Entity::new(kind, index))
    }

    #[must_use]
    pub fn name(&self, entity: Entity) -> &str {
        self.domain(entity.kind).name(entity.index)
    }

    /// Records that the pairing holds. Idempotent.
    ///
    /// Inference happens on the next [`Solver::propagate`].
    pub fn associate(&mut self, pairing: Pairing) {
        if self.store.associate(pairing) {
            self.queue.push(Event::Associated(pairing));
        }
    }

    /// Records that the pairing does not hold. Idempotent.
    pub fn disassociate(&mut self, pairing: Pairing) {
        if self.store.disassociate(pairing) {
            self.queue.push(Event::Disassociated(pairing));
        }
    }

    /// True once the facts have been shown to conflict.
    #[must_use]
    pub const fn is_impossible(&self) -> bool {
        self.impossible
    }

    /// True when every entity is paired under every relation.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.store.associations().len() >= self.complexity() * 3
    }

    #[must_use]
    pub const fn store(&self) -> &RelationStore {
        &self.store
    }

    /// Confirmed associations, in the order they were made.
    #[must_use]
    pub fn associations(&self) -> &[Pairing] {
        self.store.associations().as_slice()
    }

    /// Confirmed disassociations, in the order they were made.
    #[must_use]
    pub fn disassociations(&self) -> &[Pairing] {
        self.store.disassociations().as_slice()
    }

    /// Renders a pairing with entity names, e.g. `(bob, carpenter, personJob)`.
    #[must_use]
    pub fn describe(&self, pairing: &Pairing) -> String {
        format!(
            "({}, {}, {})",
            self.name(pairing.left_entity()),
            self.name(pairing.right_entity()),
            pairing.relation
        )
    }

    /// What is currently known about `topic`: its candidates under both of
    /// the relations it takes part in, in attribute order (see
    /// [`Kind::relations`]).
    #[must_use]
    pub fn known_about(&self, topic: Entity) -> [Attribute<'_>; 2] {
        topic.kind.relations().map(|relation| self.attribute(topic, relation))
    }

    fn attribute(&self, topic: Entity, relation: Relation) -> Attribute<'_> {
        let kind = if relation.left() == topic.kind {
            relation.right()
        } else {
            relation.left()
        };
        let domain = self.domain(kind);
        let indices = self.store.candidates(topic, relation);
        let known = match indices.as_slice() {
            [only] if !domain.is_anonymous(*only) => Some(domain.name(*only)),
            _ => None,
        };

        Attribute {
            kind,
            candidates: indices.iter().map(|&i| domain.name(i)).collect(),
            known,
        }
    }

    /// Statistics gathered so far.
    #[must_use]
    pub fn stats(&self) -> SolutionStats {
        SolutionStats {
            associations: self.store.associations().len(),
            disassociations: self.store.disassociations().len(),
            ..self.stats
        }
    }
}

impl Display for Solver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for index in 0..self.complexity() {
            let person = Entity::new(Kind::Person, index);
            let [jobs, colors] = self.known_about(person);
            writeln!(
                f,
                "{}: jobs {{{}}} colors {{{}}}",
                self.name(person),
                jobs.candidates.join(", "),
                colors.candidates.join(", ")
            )?;
        }
        Ok(())
    }
}
