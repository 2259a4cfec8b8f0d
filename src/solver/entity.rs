#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Entity kinds, the three relations between them, and the padded domains.
//!
//! Every puzzle has three classes of entities (people, jobs and colors) of a
//! common size `N`. Entities are addressed by `(Kind, index)` so the solver
//! never compares names once the domains are seeded.

use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::fmt::{Display, Formatter};

/// One of the three entity classes of a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    /// A resident, named by a capitalized word in the input.
    Person,
    /// An occupation.
    Job,
    /// A house color.
    Color,
}

impl Kind {
    /// All kinds in domain order.
    pub const ALL: [Self; 3] = [Self::Person, Self::Job, Self::Color];

    /// Prefix used when naming anonymous padding entities.
    #[must_use]
    pub const fn placeholder_prefix(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Job => "job",
            Self::Color => "color",
        }
    }

    /// The two relations this kind takes part in, in attribute order.
    ///
    /// A person is described by its job then its color, a job by its person
    /// then its color, and a color by its person then its job.
    #[must_use]
    pub const fn relations(self) -> [Relation; 2] {
        match self {
            Self::Person => [Relation::PersonJob, Relation::PersonColor],
            Self::Job => [Relation::PersonJob, Relation::JobColor],
            Self::Color => [Relation::PersonColor, Relation::JobColor],
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.placeholder_prefix())
    }
}

/// One of the three binary compatibility relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    /// Person ↔ job.
    PersonJob,
    /// Person ↔ color.
    PersonColor,
    /// Job ↔ color.
    JobColor,
}

impl Relation {
    /// All relations, in the order the solver stores them.
    pub const ALL: [Self; 3] = [Self::PersonJob, Self::PersonColor, Self::JobColor];

    /// The kind on the left (row) side of the relation.
    #[must_use]
    pub const fn left(self) -> Kind {
        match self {
            Self::PersonJob | Self::PersonColor => Kind::Person,
            Self::JobColor => Kind::Job,
        }
    }

    /// The kind on the right (column) side of the relation.
    #[must_use]
    pub const fn right(self) -> Kind {
        match self {
            Self::PersonJob => Kind::Job,
            Self::PersonColor | Self::JobColor => Kind::Color,
        }
    }

    /// The kind this relation does not mention.
    #[must_use]
    pub const fn third(self) -> Kind {
        match self {
            Self::PersonJob => Kind::Color,
            Self::PersonColor => Kind::Job,
            Self::JobColor => Kind::Person,
        }
    }

    /// The relation linking two distinct kinds, if any.
    #[must_use]
    pub const fn between(a: Kind, b: Kind) -> Option<Self> {
        match (a, b) {
            (Kind::Person, Kind::Job) | (Kind::Job, Kind::Person) => Some(Self::PersonJob),
            (Kind::Person, Kind::Color) | (Kind::Color, Kind::Person) => Some(Self::PersonColor),
            (Kind::Job, Kind::Color) | (Kind::Color, Kind::Job) => Some(Self::JobColor),
            _ => None,
        }
    }

    /// Position of the relation in [`Relation::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersonJob => f.write_str("personJob"),
            Self::PersonColor => f.write_str("personColor"),
            Self::JobColor => f.write_str("jobColor"),
        }
    }
}

/// An entity of the puzzle, addressed by kind and domain index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    pub kind: Kind,
    pub index: usize,
}

impl Entity {
    #[must_use]
    pub const fn new(kind: Kind, index: usize) -> Self {
        Self { kind, index }
    }
}

/// A (left, right) pair under one relation.
///
/// Used both for confirmed associations and confirmed disassociations.
/// The pair is always stored in the relation's own orientation, so
/// `(job, color)` is never written as `(color, job)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pairing {
    pub left: usize,
    pub right: usize,
    pub relation: Relation,
}

impl Pairing {
    #[must_use]
    pub const fn new(left: usize, right: usize, relation: Relation) -> Self {
        Self {
            left,
            right,
            relation,
        }
    }

    /// Builds the pairing between two entities of different kinds,
    /// orienting it to match the relation that links them.
    ///
    /// Returns `None` when both entities have the same kind.
    #[must_use]
    pub fn between(a: Entity, b: Entity) -> Option<Self> {
        let relation = Relation::between(a.kind, b.kind)?;
        if a.kind == relation.left() {
            Some(Self::new(a.index, b.index, relation))
        } else {
            Some(Self::new(b.index, a.index, relation))
        }
    }

    #[must_use]
    pub const fn left_entity(&self) -> Entity {
        Entity::new(self.relation.left(), self.left)
    }

    #[must_use]
    pub const fn right_entity(&self) -> Entity {
        Entity::new(self.relation.right(), self.right)
    }
}

/// The ordered names of one entity class, padded to the puzzle complexity.
///
/// Named entries keep first-seen order; padding entries follow and are
/// named `<kind>#<position>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    kind: Kind,
    names: Vec<String>,
    lookup: FxHashMap<String, usize>,
    named: usize,
}

impl Domain {
    /// Creates a domain from named entries, padded up to `size`.
    ///
    /// Duplicate names are collapsed onto their first occurrence.
    pub fn padded<I, S>(kind: Kind, named: I, size: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = named.into_iter().map(Into::into).unique().collect();
        let named = names.len();
        while names.len() < size {
            names.push(format!("{}#{}", kind.placeholder_prefix(), names.len()));
        }
        let lookup = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Self {
            kind,
            names,
            lookup,
            named,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    /// Number of entries that came from the puzzle text.
    #[must_use]
    pub const fn named(&self) -> usize {
        self.named
    }

    /// True for padding entries, which can never be named in a question.
    #[must_use]
    pub const fn is_anonymous(&self, index: usize) -> bool {
        index >= self.named
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
