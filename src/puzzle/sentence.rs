//! The sentence grammar: nine assertion forms and nine question forms.
//!
//! Each form is an anchored regular expression over a single normalised
//! sentence. Person names are capitalised words and are stored lowercased;
//! jobs and colors are lowercase words. Forms are tried in table order and
//! the first match wins.

use crate::solver::entity::Kind;
use regex::{Captures, Regex};
use smallvec::{SmallVec, smallvec};
use std::sync::LazyLock;

/// A name together with the class it was used as.
pub type Named<'a> = (Kind, &'a str);

type Build<T> = fn(&Captures<'_>) -> T;

/// A recognised declarative sentence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Assertion {
    /// `Name lives in the c house.`
    PersonWithColor { person: String, color: String },
    /// `The j lives in the c house.`
    JobWithColor { job: String, color: String },
    /// `Name does not live in the c house.`
    PersonNotWithColor { person: String, color: String },
    /// `The j does not live in the c house.`
    JobNotWithColor { job: String, color: String },
    /// `Name is the j.`
    PersonWithJob { person: String, job: String },
    /// `Name is not the j.`
    PersonNotWithJob { person: String, job: String },
    /// `Name lives around here.`
    PersonExists { person: String },
    /// `The j lives around here.`
    JobExists { job: String },
    /// `There is a c house.`
    ColorExists { color: String },
}

/// What an assertion does to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation<'a> {
    Associate(Named<'a>, Named<'a>),
    Disassociate(Named<'a>, Named<'a>),
}

const ASSERTION_GRAMMAR: [(&str, Build<Assertion>); 9] = [
    (r"^([A-Z][a-z]+) lives in the ([a-z]+) house\.$", |c| {
        Assertion::PersonWithColor {
            person: c[1].to_lowercase(),
            color: c[2].to_owned(),
        }
    }),
    (r"^The ([a-z]+) lives in the ([a-z]+) house\.$", |c| {
        Assertion::JobWithColor {
            job: c[1].to_owned(),
            color: c[2].to_owned(),
        }
    }),
    (r"^([A-Z][a-z]+) does not live in the ([a-z]+) house\.$", |c| {
        Assertion::PersonNotWithColor {
            person: c[1].to_lowercase(),
            color: c[2].to_owned(),
        }
    }),
    (r"^The ([a-z]+) does not live in the ([a-z]+) house\.$", |c| {
        Assertion::JobNotWithColor {
            job: c[1].to_owned(),
            color: c[2].to_owned(),
        }
    }),
    (r"^([A-Z][a-z]+) is the ([a-z]+)\.$", |c| Assertion::PersonWithJob {
        person: c[1].to_lowercase(),
        job: c[2].to_owned(),
    }),
    (r"^([A-Z][a-z]+) is not the ([a-z]+)\.$", |c| {
        Assertion::PersonNotWithJob {
            person: c[1].to_lowercase(),
            job: c[2].to_owned(),
        }
    }),
    (r"^([A-Z][a-z]+) lives around here\.$", |c| Assertion::PersonExists {
        person: c[1].to_lowercase(),
    }),
    (r"^The ([a-z]+) lives around here\.$", |c| Assertion::JobExists {
        job: c[1].to_owned(),
    }),
    (r"^There is a ([a-z]+) house\.$", |c| Assertion::ColorExists {
        color: c[1].to_owned(),
    }),
];

static ASSERTIONS: LazyLock<Vec<(Regex, Build<Assertion>)>> =
    LazyLock::new(|| compile(&ASSERTION_GRAMMAR));

impl Assertion {
    /// Classifies one normalised sentence, or `None` if no form matches.
    #[must_use]
    pub fn parse(sentence: &str) -> Option<Self> {
        recognise(&ASSERTIONS, sentence)
    }

    /// The names this assertion introduces, in sentence order.
    #[must_use]
    pub fn names(&self) -> SmallVec<[Named<'_>; 2]> {
        match self {
            Self::PersonWithColor { person, color } | Self::PersonNotWithColor { person, color } => {
                smallvec![(Kind::Person, person.as_str()), (Kind::Color, color.as_str())]
            }
            Self::JobWithColor { job, color } | Self::JobNotWithColor { job, color } => {
                smallvec![(Kind::Job, job.as_str()), (Kind::Color, color.as_str())]
            }
            Self::PersonWithJob { person, job } | Self::PersonNotWithJob { person, job } => {
                smallvec![(Kind::Person, person.as_str()), (Kind::Job, job.as_str())]
            }
            Self::PersonExists { person } => smallvec![(Kind::Person, person.as_str())],
            Self::JobExists { job } => smallvec![(Kind::Job, job.as_str())],
            Self::ColorExists { color } => smallvec![(Kind::Color, color.as_str())],
        }
    }

    /// The relation change this assertion asks for. Existence assertions
    /// only register names.
    #[must_use]
    pub fn mutation(&self) -> Option<Mutation<'_>> {
        let [a, b] = match self.names().as_slice() {
            &[a, b] => [a, b],
            _ => return None,
        };
        match self {
            Self::PersonWithColor { .. } | Self::JobWithColor { .. } | Self::PersonWithJob { .. } => {
                Some(Mutation::Associate(a, b))
            }
            Self::PersonNotWithColor { .. }
            | Self::JobNotWithColor { .. }
            | Self::PersonNotWithJob { .. } => Some(Mutation::Disassociate(a, b)),
            Self::PersonExists { .. } | Self::JobExists { .. } | Self::ColorExists { .. } => None,
        }
    }
}

/// How a question wants its topic described.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// Report everything known.
    Broad,
    /// Report a single attribute, by position (see [`Kind::relations`]).
    Specific(usize),
}

/// A recognised question. Each one names a single topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Question {
    /// `What do you know about Name?`
    AboutPerson(String),
    /// `What do you know about the j?`
    AboutJob(String),
    /// `What do you know about the c house?`
    AboutColor(String),
    /// `Who is the j?`
    PersonOfJob(String),
    /// `Who lives in the c house?`
    PersonOfColor(String),
    /// `What does Name do?`
    JobOfPerson(String),
    /// `What does the occupant of the c house do?`
    JobOfColor(String),
    /// `Where does Name live?`
    ColorOfPerson(String),
    /// `Where does the j live?`
    ColorOfJob(String),
}

const QUESTION_GRAMMAR: [(&str, Build<Question>); 9] = [
    (r"^What do you know about ([A-Z][a-z]+)\?$", |c| {
        Question::AboutPerson(c[1].to_lowercase())
    }),
    (r"^What do you know about the ([a-z]+)\?$", |c| {
        Question::AboutJob(c[1].to_owned())
    }),
    (r"^What do you know about the ([a-z]+) house\?$", |c| {
        Question::AboutColor(c[1].to_owned())
    }),
    (r"^Who is the ([a-z]+)\?$", |c| Question::PersonOfJob(c[1].to_owned())),
    (r"^Who lives in the ([a-z]+) house\?$", |c| {
        Question::PersonOfColor(c[1].to_owned())
    }),
    (r"^What does ([A-Z][a-z]+) do\?$", |c| {
        Question::JobOfPerson(c[1].to_lowercase())
    }),
    (r"^What does the occupant of the ([a-z]+) house do\?$", |c| {
        Question::JobOfColor(c[1].to_owned())
    }),
    (r"^Where does ([A-Z][a-z]+) live\?$", |c| {
        Question::ColorOfPerson(c[1].to_lowercase())
    }),
    (r"^Where does the ([a-z]+) live\?$", |c| {
        Question::ColorOfJob(c[1].to_owned())
    }),
];

static QUESTIONS: LazyLock<Vec<(Regex, Build<Question>)>> =
    LazyLock::new(|| compile(&QUESTION_GRAMMAR));

impl Question {
    #[must_use]
    pub fn parse(sentence: &str) -> Option<Self> {
        recognise(&QUESTIONS, sentence)
    }

    /// The entity the question is about.
    #[must_use]
    pub fn topic(&self) -> Named<'_> {
        match self {
            Self::AboutPerson(name) | Self::JobOfPerson(name) | Self::ColorOfPerson(name) => {
                (Kind::Person, name.as_str())
            }
            Self::AboutJob(name) | Self::PersonOfJob(name) | Self::ColorOfJob(name) => {
                (Kind::Job, name.as_str())
            }
            Self::AboutColor(name) | Self::PersonOfColor(name) | Self::JobOfColor(name) => {
                (Kind::Color, name.as_str())
            }
        }
    }

    #[must_use]
    pub const fn style(&self) -> Style {
        match self {
            Self::AboutPerson(_) | Self::AboutJob(_) | Self::AboutColor(_) => Style::Broad,
            Self::PersonOfJob(_) | Self::PersonOfColor(_) | Self::JobOfPerson(_) => {
                Style::Specific(0)
            }
            Self::JobOfColor(_) | Self::ColorOfPerson(_) | Self::ColorOfJob(_) => {
                Style::Specific(1)
            }
        }
    }
}

/// Restores the written form of a stored person name: `joe` -> `Joe`.
pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn compile<T>(grammar: &[(&str, Build<T>)]) -> Vec<(Regex, Build<T>)> {
    grammar
        .iter()
        .map(|&(pattern, build)| (Regex::new(pattern).unwrap(), build))
        .collect()
}

fn recognise<T>(forms: &[(Regex, Build<T>)], sentence: &str) -> Option<T> {
    forms
        .iter()
        .find_map(|(regex, build)| regex.captures(sentence).map(|c| build(&c)))
}
